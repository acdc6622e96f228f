//! Text module
//!
//! Everything that maps between positions in a rendered, annotated view and
//! char offsets in the original submission text.
//!
//! # Coordinate spaces
//!
//! - [`BaseText`] offsets: Unicode scalar values (Rust `char`s) from the
//!   start of the submission. Annotations are stored in this space.
//! - [`ViewPosition`]: a segment index plus a char offset inside that
//!   segment, as produced by [`render`].
//! - DOM points (see [`crate::html`]): a text node index plus a UTF-16
//!   offset, the way browser selection ranges report positions.
//!
//! Rendering is lossless, so the concatenated rendered text always equals the
//! base text and "chars rendered before the selection start" is the offset
//! into the base text.

mod base;
mod segments;
mod selection;

pub use base::{utf16_len, utf16_to_char_offset, BaseText};
pub use segments::{flatten, render, FlatText, Segment, SegmentMark, ViewPosition};
pub use selection::{resolve_selection, RenderedView, ResolvedSelection, SegmentView, Selection};
