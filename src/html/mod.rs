//! HTML surface of the annotation engine
//!
//! [`render_html`] produces the highlighted fragment shown to reviewers and
//! [`RenderedHtml`] reads such a fragment back so browser selections can be
//! resolved to base text offsets.

mod highlight_renderer;
mod rendered;

pub use highlight_renderer::{render_html, HighlightConfig};
pub use rendered::{DomPoint, RenderedHtml};

/// HTML processing errors
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("HTML rewrite failed: {0}")]
    Rewrite(String),
}
