//! Highlight rendering
//!
//! Turns a segment sequence into HTML where every annotated run is wrapped
//! in a `<mark>` that carries its annotation id. Plain runs are emitted as
//! escaped text, so the text content of the output is exactly the base text.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::text::Segment;

/// Configuration for highlight rendering
#[derive(Debug, Clone)]
pub struct HighlightConfig {
    /// CSS class for annotation marks
    pub class_name: String,
    /// Data attribute for annotation ID
    pub id_attribute: String,
    /// Whether to expose the annotation text as a tooltip
    pub include_titles: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            class_name: "essay-annotation".to_string(),
            id_attribute: "data-annotation-id".to_string(),
            include_titles: true,
        }
    }
}

/// Render segments as an HTML fragment
pub fn render_html(segments: &[Segment<'_>], config: &HighlightConfig) -> String {
    let mut html = String::new();

    for segment in segments {
        match segment.mark {
            Some(mark) => {
                let title = if config.include_titles && !mark.label.is_empty() {
                    format!(" title=\"{}\"", encode_double_quoted_attribute(mark.label))
                } else {
                    String::new()
                };
                html.push_str(&format!(
                    "<mark class=\"{}\" {}=\"{}\"{}>{}</mark>",
                    encode_double_quoted_attribute(&config.class_name),
                    config.id_attribute,
                    encode_double_quoted_attribute(mark.annotation_id),
                    title,
                    encode_text(segment.text),
                ));
            }
            None => html.push_str(&encode_text(segment.text)),
        }
    }

    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{AnnotationSet, NewAnnotation, OverlapPolicy};
    use crate::text::{render, BaseText};

    #[test]
    fn test_render_marks() {
        let base = BaseText::new("ABCDE");
        let mut set = AnnotationSet::new("essay-1", &base, OverlapPolicy::Reject);
        set.insert(NewAnnotation::new(1, 2).with_id("x").with_text("Vírgula"))
            .unwrap();

        let html = render_html(&render(&base, &set), &HighlightConfig::default());
        assert_eq!(
            html,
            "A<mark class=\"essay-annotation\" data-annotation-id=\"x\" title=\"Vírgula\">B</mark>CDE"
        );
    }

    #[test]
    fn test_render_escapes_text_and_titles() {
        let base = BaseText::new("a < b & \"c\"");
        let mut set = AnnotationSet::new("essay-1", &base, OverlapPolicy::Reject);
        set.insert(NewAnnotation::new(0, 1).with_id("x").with_text("use \"quotes\""))
            .unwrap();

        let html = render_html(&render(&base, &set), &HighlightConfig::default());
        assert!(!html.contains(" < b"));
        assert!(html.contains("&lt; b &amp;"));
        assert!(html.contains("title=\"use &quot;quotes&quot;\""));
    }

    #[test]
    fn test_render_without_titles() {
        let base = BaseText::new("ABCDE");
        let mut set = AnnotationSet::new("essay-1", &base, OverlapPolicy::Reject);
        set.insert(NewAnnotation::new(0, 5).with_id("x").with_text("Tudo"))
            .unwrap();

        let config = HighlightConfig {
            include_titles: false,
            ..HighlightConfig::default()
        };
        let html = render_html(&render(&base, &set), &config);
        assert!(!html.contains("title="));
        assert!(html.starts_with("<mark"));
    }
}
