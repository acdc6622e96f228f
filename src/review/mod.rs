//! Review sessions
//!
//! Composes the text, annotation and HTML modules into the workflow a
//! reviewer goes through: render, select, annotate, click, save.

mod session;

pub use session::ReviewSession;
