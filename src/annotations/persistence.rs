//! Persistence boundary for annotation sets
//!
//! The engine only needs "load the set for an essay" and "replace the set
//! for an essay". The SQLite implementation lives in `crate::db`.

use async_trait::async_trait;
use thiserror::Error;

use super::types::Annotation;

/// Errors reported by a persistence backend
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt record {id}: {reason}")]
    Corrupt { id: String, reason: String },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Durable store for the annotations of each essay
#[async_trait]
pub trait AnnotationPersistence: Send + Sync {
    /// Annotations stored for an essay, ascending by start offset
    async fn load_annotations(&self, essay_id: &str) -> Result<Vec<Annotation>, PersistenceError>;

    /// Replace everything stored for an essay with `annotations`
    async fn save_annotations(
        &self,
        essay_id: &str,
        annotations: &[Annotation],
    ) -> Result<(), PersistenceError>;
}
