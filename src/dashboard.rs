//! Dashboard widget table
//!
//! Which widgets each role may place on its dashboard and the layout it
//! starts with. The table is built once and only read afterwards.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Administrator,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Student, Role::Teacher, Role::Administrator];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
            Role::Administrator => "administrator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            "administrator" => Ok(Role::Administrator),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Dashboard widget identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WidgetId {
    Welcome,
    Courses,
    Progress,
    Events,
    TeacherStats,
    AdminStats,
    Ranking,
}

impl WidgetId {
    /// Display name and description
    pub fn describe(&self) -> (&'static str, &'static str) {
        match self {
            WidgetId::Welcome => ("Boas-vindas", "Uma mensagem de boas-vindas e motivação."),
            WidgetId::Courses => ("Meus Cursos", "Acesso rápido aos seus cursos em andamento."),
            WidgetId::Progress => (
                "Progresso Semanal",
                "Gráfico com suas horas de estudo na semana.",
            ),
            WidgetId::Events => ("Próximos Eventos", "Lista de aulas, provas e prazos futuros."),
            WidgetId::TeacherStats => (
                "Estatísticas do Professor",
                "Resumo de redações para corrigir e dúvidas no fórum.",
            ),
            WidgetId::AdminStats => (
                "Estatísticas da Plataforma",
                "Visão geral dos dados da plataforma.",
            ),
            WidgetId::Ranking => ("Ranking", "Sua posição no ranking e conquistas recentes."),
        }
    }
}

/// Widget metadata as served to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetInfo {
    pub id: WidgetId,
    pub name: &'static str,
    pub description: &'static str,
}

impl From<WidgetId> for WidgetInfo {
    fn from(id: WidgetId) -> Self {
        let (name, description) = id.describe();
        Self {
            id,
            name,
            description,
        }
    }
}

/// Widget order plus widgets the user switched off
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DashboardLayout {
    pub order: Vec<WidgetId>,
    #[serde(default)]
    pub hidden: Vec<WidgetId>,
}

impl DashboardLayout {
    fn new(order: &[WidgetId], hidden: &[WidgetId]) -> Self {
        Self {
            order: order.to_vec(),
            hidden: hidden.to_vec(),
        }
    }

    /// Widgets that end up on screen, in order
    pub fn visible(&self) -> impl Iterator<Item = WidgetId> + '_ {
        self.order
            .iter()
            .copied()
            .filter(|id| !self.hidden.contains(id))
    }
}

#[derive(Debug, Clone)]
struct RoleEntry {
    available: BTreeSet<WidgetId>,
    default_layout: DashboardLayout,
}

/// Role to widget mapping
#[derive(Debug, Clone)]
pub struct WidgetCatalog {
    roles: HashMap<Role, RoleEntry>,
}

impl Default for WidgetCatalog {
    fn default() -> Self {
        use WidgetId::*;

        let entry = |available: &[WidgetId], order: &[WidgetId], hidden: &[WidgetId]| RoleEntry {
            available: available.iter().copied().collect(),
            default_layout: DashboardLayout::new(order, hidden),
        };

        let roles = HashMap::from([
            (
                Role::Student,
                entry(
                    &[Welcome, Courses, Progress, Events, Ranking],
                    &[Welcome, Ranking, Progress, Events, Courses],
                    &[],
                ),
            ),
            (
                Role::Teacher,
                entry(
                    &[TeacherStats, Events, Ranking],
                    &[TeacherStats, Events],
                    &[Welcome, Courses, Progress],
                ),
            ),
            (
                Role::Administrator,
                entry(
                    &[AdminStats, Ranking],
                    &[AdminStats],
                    &[Welcome, Courses, Progress, Events, TeacherStats],
                ),
            ),
        ]);

        Self { roles }
    }
}

impl WidgetCatalog {
    /// Widgets a role may use, in a stable order
    pub fn available(&self, role: Role) -> Vec<WidgetId> {
        self.roles
            .get(&role)
            .map(|e| e.available.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn is_available(&self, role: Role, widget: WidgetId) -> bool {
        self.roles
            .get(&role)
            .is_some_and(|e| e.available.contains(&widget))
    }

    /// Layout a new dashboard starts with
    pub fn default_layout(&self, role: Role) -> DashboardLayout {
        self.roles
            .get(&role)
            .map(|e| e.default_layout.clone())
            .unwrap_or_default()
    }

    /// Drop widgets from a saved layout that the role may not show.
    ///
    /// Duplicate entries keep their first position. Hidden entries are kept
    /// as-is so switching roles back does not lose preferences.
    pub fn restrict(&self, role: Role, layout: &DashboardLayout) -> DashboardLayout {
        let mut order = Vec::new();
        for widget in &layout.order {
            if self.is_available(role, *widget) && !order.contains(widget) {
                order.push(*widget);
            }
        }

        DashboardLayout {
            order,
            hidden: layout.hidden.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layouts() {
        let catalog = WidgetCatalog::default();

        let student = catalog.default_layout(Role::Student);
        assert_eq!(
            student.visible().collect::<Vec<_>>(),
            vec![
                WidgetId::Welcome,
                WidgetId::Ranking,
                WidgetId::Progress,
                WidgetId::Events,
                WidgetId::Courses
            ]
        );

        let admin = catalog.default_layout(Role::Administrator);
        assert_eq!(admin.visible().collect::<Vec<_>>(), vec![WidgetId::AdminStats]);
        assert!(admin.hidden.contains(&WidgetId::TeacherStats));
    }

    #[test]
    fn test_availability_per_role() {
        let catalog = WidgetCatalog::default();

        assert!(catalog.is_available(Role::Teacher, WidgetId::TeacherStats));
        assert!(!catalog.is_available(Role::Student, WidgetId::TeacherStats));
        assert!(!catalog.is_available(Role::Teacher, WidgetId::AdminStats));

        for role in Role::ALL {
            assert!(catalog.is_available(role, WidgetId::Ranking));
            assert!(catalog
                .default_layout(role)
                .order
                .iter()
                .all(|w| catalog.is_available(role, *w)));
        }
    }

    #[test]
    fn test_restrict_saved_layout() {
        let catalog = WidgetCatalog::default();
        let saved = DashboardLayout {
            order: vec![
                WidgetId::AdminStats,
                WidgetId::Events,
                WidgetId::Events,
                WidgetId::TeacherStats,
            ],
            hidden: vec![WidgetId::Welcome],
        };

        let layout = catalog.restrict(Role::Teacher, &saved);
        assert_eq!(layout.order, vec![WidgetId::Events, WidgetId::TeacherStats]);
        assert_eq!(layout.hidden, vec![WidgetId::Welcome]);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&WidgetId::TeacherStats).unwrap(),
            "\"teacherStats\""
        );
        assert_eq!("administrator".parse::<Role>(), Ok(Role::Administrator));
        assert!("guest".parse::<Role>().is_err());
    }
}
