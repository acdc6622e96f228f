//! Annotation module
//!
//! Reviewer feedback attached to char ranges of an essay.
//!
//! # Features
//!
//! - Range validation against the submission text (`RangeError`)
//! - Insertion-ordered store with a stable sorted view
//! - Configurable overlap policy
//! - Click routing from a rendered mark back to its annotation
//! - Async persistence boundary (`AnnotationPersistence`)

mod click;
mod error;
mod persistence;
mod store;
mod types;

pub use click::{route_click, AnnotationClickHandler};
pub use error::RangeError;
pub use persistence::{AnnotationPersistence, PersistenceError};
pub use store::{AnnotationSet, SortedIter};
pub use types::{Annotation, NewAnnotation, OverlapPolicy, TextSpan};
