//! Application state shared across handlers.

use std::sync::Arc;

use framecraft_core::storage::{ObjectStore, StorageError};
use sqlx::PgPool;

use crate::config::AdminConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    store: ObjectStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the storage backend cannot be built.
    pub fn new(config: AdminConfig, pool: PgPool) -> Result<Self, StorageError> {
        let store = ObjectStore::from_config(&config.storage)?;
        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                store,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn store(&self) -> &ObjectStore {
        &self.inner.store
    }
}
