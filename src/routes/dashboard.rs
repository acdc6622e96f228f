//! Dashboard widget API routes

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::dashboard::{DashboardLayout, Role, WidgetInfo};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Widgets for one role
#[derive(Debug, Serialize)]
pub struct RoleDashboard {
    pub role: Role,
    pub available: Vec<WidgetInfo>,
    pub default_layout: DashboardLayout,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/:role", get(get_role_dashboard))
}

/// Widgets available to a role and its starting layout
async fn get_role_dashboard(
    State(state): State<AppState>,
    Path(role): Path<String>,
) -> Result<Json<RoleDashboard>> {
    let role: Role = role.parse().map_err(AppError::BadRequest)?;
    let catalog = state.widgets();

    Ok(Json(RoleDashboard {
        role,
        available: catalog.available(role).into_iter().map(WidgetInfo::from).collect(),
        default_layout: catalog.default_layout(role),
    }))
}
