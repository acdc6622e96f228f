//! SQLite storage for essay annotations

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::Result;
use crate::annotations::{Annotation, AnnotationPersistence, PersistenceError};

/// Repository for annotation persistence
pub struct AnnotationRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AnnotationRepository<'a> {
    /// Create a new repository
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List annotations for an essay, ascending by start offset
    pub async fn list_for_essay(&self, essay_id: &str) -> Result<Vec<Annotation>> {
        let rows = sqlx::query_as::<_, AnnotationRow>(
            r#"
            SELECT id, essay_id, start_offset, end_offset, annotation_text,
                   suggested_correction, error_category_id, teacher_id, created_at
            FROM essay_annotations
            WHERE essay_id = ?
            ORDER BY start_offset ASC, rowid ASC
            "#,
        )
        .bind(essay_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_annotation()).collect()
    }

    /// Replace every annotation of an essay in one transaction
    pub async fn replace_for_essay(
        &self,
        essay_id: &str,
        annotations: &[Annotation],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM essay_annotations WHERE essay_id = ?")
            .bind(essay_id)
            .execute(&mut *tx)
            .await?;

        for annotation in annotations {
            sqlx::query(
                r#"
                INSERT INTO essay_annotations (
                    id, essay_id, start_offset, end_offset, annotation_text,
                    suggested_correction, error_category_id, teacher_id, created_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&annotation.id)
            .bind(essay_id)
            .bind(annotation.start_offset as i64)
            .bind(annotation.end_offset as i64)
            .bind(&annotation.annotation_text)
            .bind(&annotation.suggested_correction)
            .bind(&annotation.error_category_id)
            .bind(&annotation.teacher_id)
            .bind(annotation.created_at.to_rfc3339())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!(essay_id, count = annotations.len(), "Annotations saved");

        Ok(())
    }

    /// Count annotations for an essay
    pub async fn count_for_essay(&self, essay_id: &str) -> Result<i64> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM essay_annotations WHERE essay_id = ?")
                .bind(essay_id)
                .fetch_one(self.pool)
                .await?;

        Ok(row.0)
    }
}

#[async_trait]
impl<'a> AnnotationPersistence for AnnotationRepository<'a> {
    async fn load_annotations(&self, essay_id: &str) -> Result<Vec<Annotation>> {
        self.list_for_essay(essay_id).await
    }

    async fn save_annotations(&self, essay_id: &str, annotations: &[Annotation]) -> Result<()> {
        self.replace_for_essay(essay_id, annotations).await
    }
}

/// Internal row type for SQLite queries
#[derive(sqlx::FromRow)]
struct AnnotationRow {
    id: String,
    essay_id: String,
    start_offset: i64,
    end_offset: i64,
    annotation_text: String,
    suggested_correction: Option<String>,
    error_category_id: Option<String>,
    teacher_id: Option<String>,
    created_at: String,
}

impl AnnotationRow {
    fn into_annotation(self) -> Result<Annotation> {
        let corrupt = |reason: String| PersistenceError::Corrupt {
            id: self.id.clone(),
            reason,
        };

        let start_offset = usize::try_from(self.start_offset)
            .map_err(|_| corrupt(format!("negative start offset {}", self.start_offset)))?;
        let end_offset = usize::try_from(self.end_offset)
            .map_err(|_| corrupt(format!("negative end offset {}", self.end_offset)))?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| corrupt(e.to_string()))?
            .with_timezone(&Utc);

        Ok(Annotation {
            id: self.id,
            essay_id: self.essay_id,
            start_offset,
            end_offset,
            annotation_text: self.annotation_text,
            suggested_correction: self.suggested_correction,
            error_category_id: self.error_category_id,
            teacher_id: self.teacher_id,
            created_at,
        })
    }
}
