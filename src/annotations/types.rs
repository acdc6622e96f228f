//! Essay annotation types
//!
//! An annotation is reviewer feedback attached to a half-open char range of
//! the submission text.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Unique identifier (UUID)
    pub id: String,
    /// The essay this annotation belongs to
    pub essay_id: String,
    /// First annotated char
    pub start_offset: usize,
    /// One past the last annotated char
    pub end_offset: usize,
    /// Reviewer commentary
    pub annotation_text: String,
    /// Replacement proposed by the reviewer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_correction: Option<String>,
    /// Error category reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_category_id: Option<String>,
    /// Reviewer that created the annotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Annotation {
    pub fn span(&self) -> TextSpan {
        TextSpan::new(self.start_offset, self.end_offset)
    }

    /// Whether the char at `offset` is covered
    pub fn contains(&self, offset: usize) -> bool {
        self.span().contains(offset)
    }

    pub fn label(&self) -> &str {
        &self.annotation_text
    }
}

/// A candidate annotation, not yet validated against a text.
///
/// Offsets are signed so that bad client input is rejected as out of bounds
/// instead of failing to deserialize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAnnotation {
    /// Kept when present, generated otherwise
    #[serde(default)]
    pub id: Option<String>,
    pub start_offset: i64,
    pub end_offset: i64,
    #[serde(default)]
    pub annotation_text: String,
    #[serde(default)]
    pub suggested_correction: Option<String>,
    #[serde(default)]
    pub error_category_id: Option<String>,
    #[serde(default)]
    pub teacher_id: Option<String>,
}

impl NewAnnotation {
    /// Create a draft for the range `[start_offset, end_offset)`
    pub fn new(start_offset: i64, end_offset: i64) -> Self {
        Self {
            start_offset,
            end_offset,
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Set the commentary
    pub fn with_text(mut self, text: &str) -> Self {
        self.annotation_text = text.to_string();
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.suggested_correction = Some(suggestion.to_string());
        self
    }

    pub fn with_category(mut self, category_id: &str) -> Self {
        self.error_category_id = Some(category_id.to_string());
        self
    }

    pub fn with_teacher(mut self, teacher_id: &str) -> Self {
        self.teacher_id = Some(teacher_id.to_string());
        self
    }

    /// Build the stored record once the range has been validated
    pub(crate) fn into_annotation(self, essay_id: &str, span: TextSpan) -> Annotation {
        Annotation {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            essay_id: essay_id.to_string(),
            start_offset: span.start,
            end_offset: span.end,
            annotation_text: self.annotation_text,
            suggested_correction: self.suggested_correction,
            error_category_id: self.error_category_id,
            teacher_id: self.teacher_id,
            created_at: Utc::now(),
        }
    }
}

impl From<Annotation> for NewAnnotation {
    fn from(annotation: Annotation) -> Self {
        Self {
            id: Some(annotation.id),
            start_offset: annotation.start_offset as i64,
            end_offset: annotation.end_offset as i64,
            annotation_text: annotation.annotation_text,
            suggested_correction: annotation.suggested_correction,
            error_category_id: annotation.error_category_id,
            teacher_id: annotation.teacher_id,
        }
    }
}

/// A validated half-open char range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

impl TextSpan {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "TextSpan start must be <= end");
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Whether the two ranges share at least one char
    pub fn overlaps(&self, other: TextSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// What the store does with a range that overlaps an existing one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Refuse the insert with `RangeError::Overlap`
    #[default]
    Reject,
    /// Accept it; rendering clips it to the remaining gap
    Allow,
}

impl FromStr for OverlapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(OverlapPolicy::Reject),
            "allow" => Ok(OverlapPolicy::Allow),
            other => Err(format!("unknown overlap policy: {}", other)),
        }
    }
}

impl fmt::Display for OverlapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlapPolicy::Reject => write!(f, "reject"),
            OverlapPolicy::Allow => write!(f, "allow"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_into_annotation() {
        let annotation = NewAnnotation::new(2, 5)
            .with_text("Concordância verbal")
            .with_suggestion("fizeram")
            .with_category("cat-grammar")
            .with_teacher("teacher-1")
            .into_annotation("essay-1", TextSpan::new(2, 5));

        assert_eq!(annotation.essay_id, "essay-1");
        assert_eq!(annotation.span(), TextSpan::new(2, 5));
        assert_eq!(annotation.label(), "Concordância verbal");
        assert_eq!(annotation.suggested_correction.as_deref(), Some("fizeram"));
        assert!(Uuid::parse_str(&annotation.id).is_ok());
    }

    #[test]
    fn test_draft_keeps_explicit_id() {
        let annotation = NewAnnotation::new(0, 1)
            .with_id("anno-1")
            .into_annotation("essay-1", TextSpan::new(0, 1));
        assert_eq!(annotation.id, "anno-1");
    }

    #[test]
    fn test_span_overlap() {
        let span = TextSpan::new(2, 4);
        assert!(span.overlaps(TextSpan::new(3, 6)));
        assert!(span.overlaps(TextSpan::new(0, 3)));
        assert!(!span.overlaps(TextSpan::new(4, 6)));
        assert!(!span.overlaps(TextSpan::new(0, 2)));
        assert!(span.contains(2));
        assert!(!span.contains(4));
    }

    #[test]
    fn test_overlap_policy_parse() {
        assert_eq!("reject".parse::<OverlapPolicy>(), Ok(OverlapPolicy::Reject));
        assert_eq!(" Allow ".parse::<OverlapPolicy>(), Ok(OverlapPolicy::Allow));
        assert!("merge".parse::<OverlapPolicy>().is_err());
    }

    #[test]
    fn test_serialization() {
        let annotation = NewAnnotation::new(0, 4)
            .with_text("Repetição")
            .into_annotation("essay-1", TextSpan::new(0, 4));

        let json = serde_json::to_string(&annotation).unwrap();
        assert!(json.contains("\"start_offset\":0"));
        assert!(json.contains("\"end_offset\":4"));
        assert!(!json.contains("suggested_correction"));

        let draft: NewAnnotation =
            serde_json::from_str(r#"{"start_offset": -1, "end_offset": 3}"#).unwrap();
        assert_eq!(draft.start_offset, -1);
        assert!(draft.id.is_none());
        assert!(draft.annotation_text.is_empty());
    }
}
