//! Database schema initialization

use sqlx::SqlitePool;

use super::Result;

/// Initialize the database schema
pub async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(SCHEMA_SQL).execute(pool).await?;

    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Essay submissions
CREATE TABLE IF NOT EXISTS essays (
    id TEXT PRIMARY KEY,
    submission_text TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Reviewer annotations over char ranges of a submission
CREATE TABLE IF NOT EXISTS essay_annotations (
    id TEXT NOT NULL,
    essay_id TEXT NOT NULL,
    start_offset INTEGER NOT NULL,
    end_offset INTEGER NOT NULL,
    annotation_text TEXT NOT NULL,
    suggested_correction TEXT,
    error_category_id TEXT,
    teacher_id TEXT,
    created_at TEXT NOT NULL,
    PRIMARY KEY (essay_id, id)
);
"#;
