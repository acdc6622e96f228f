//! Essay submission storage

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::Result;

/// Essay submission record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Essay {
    pub id: String,
    pub submission_text: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Essay repository
pub struct EssayRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> EssayRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get an essay by ID
    pub async fn get(&self, id: &str) -> Result<Option<Essay>> {
        let essay = sqlx::query_as::<_, Essay>(
            r#"
            SELECT id, submission_text, created_at, updated_at
            FROM essays
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(essay)
    }

    /// Create an essay or replace its submission text
    pub async fn upsert(&self, id: &str, submission_text: &str) -> Result<Essay> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO essays (id, submission_text, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                submission_text = excluded.submission_text,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(id)
        .bind(submission_text)
        .bind(&now)
        .bind(&now)
        .execute(self.pool)
        .await?;

        self.get(id).await?.ok_or_else(|| crate::annotations::PersistenceError::Corrupt {
            id: id.to_string(),
            reason: "essay missing after upsert".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;

    #[tokio::test]
    async fn test_upsert_and_get() {
        let pool = create_memory_pool().await.unwrap();
        let repo = EssayRepository::new(&pool);

        let created = repo.upsert("essay-1", "Primeira versão").await.unwrap();
        assert_eq!(created.submission_text, "Primeira versão");

        let updated = repo.upsert("essay-1", "Segunda versão").await.unwrap();
        assert_eq!(updated.submission_text, "Segunda versão");
        assert_eq!(updated.created_at, created.created_at);

        assert!(repo.get("missing").await.unwrap().is_none());
    }
}
