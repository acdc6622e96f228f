//! Application state management

use std::collections::HashMap;
use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::config::Config;
use crate::dashboard::WidgetCatalog;
use crate::html::HighlightConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    db: SqlitePool,
    highlight: HighlightConfig,
    widgets: WidgetCatalog,
    essay_locks: EssayLocks,
}

/// One write lock per essay.
///
/// Annotation writes load the whole set, change it and replace it, so two
/// writers on the same essay must not interleave.
#[derive(Default)]
struct EssayLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl EssayLocks {
    async fn acquire(&self, essay_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            // Drop entries nobody holds or waits on
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(essay_id.to_string()).or_default())
        };
        lock.lock_owned().await
    }
}

impl AppState {
    pub fn new(config: Config, db: SqlitePool) -> Self {
        let highlight = config.annotations.highlight();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                db,
                highlight,
                widgets: WidgetCatalog::default(),
                essay_locks: EssayLocks::default(),
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the database pool
    pub fn db(&self) -> &SqlitePool {
        &self.inner.db
    }

    /// Highlight settings for rendered essays
    pub fn highlight(&self) -> &HighlightConfig {
        &self.inner.highlight
    }

    /// Role to widget table
    pub fn widgets(&self) -> &WidgetCatalog {
        &self.inner.widgets
    }

    /// Exclusive write access to one essay until the guard is dropped
    pub async fn lock_essay(&self, essay_id: &str) -> OwnedMutexGuard<()> {
        self.inner.essay_locks.acquire(essay_id).await
    }
}
