//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use framecraft_core::catalog::CatalogOptions;
use framecraft_core::preview::RgbaImage;
use framecraft_core::storage::{ObjectStore, StorageError};
use moka::future::Cache;
use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::db::{CatalogRepository, RepositoryError};

/// How long catalog options are served from memory.
const OPTIONS_TTL: Duration = Duration::from_secs(300);

/// Budget for decoded images held for the preview renderer.
const IMAGE_CACHE_BYTES: u64 = 256 * 1024 * 1024;

/// Decoded images are dropped after this long without a render.
const IMAGE_IDLE: Duration = Duration::from_secs(30 * 60);

/// Key for the decoded image cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageKey {
    /// A customer photo, by storage path.
    Photo(String),
    /// A frame texture, by storage path.
    Texture(String),
}

impl ImageKey {
    /// Storage path of the encoded image.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Photo(path) | Self::Texture(path) => path,
        }
    }
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    store: ObjectStore,
    options: Cache<(), Arc<CatalogOptions>>,
    images: Cache<ImageKey, Arc<RgbaImage>>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the configured storage backend cannot be
    /// built.
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Result<Self, StorageError> {
        let store = ObjectStore::from_config(&config.storage)?;

        let options = Cache::builder()
            .max_capacity(1)
            .time_to_live(OPTIONS_TTL)
            .build();

        let images = Cache::builder()
            .weigher(|_key: &ImageKey, image: &Arc<RgbaImage>| {
                u32::try_from(image.as_raw().len()).unwrap_or(u32::MAX)
            })
            .max_capacity(IMAGE_CACHE_BYTES)
            .time_to_idle(IMAGE_IDLE)
            .build();

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                store,
                options,
                images,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the object store.
    #[must_use]
    pub fn store(&self) -> &ObjectStore {
        &self.inner.store
    }

    /// Active catalog options, cached for five minutes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the options must be loaded and the
    /// query fails.
    pub async fn catalog_options(&self) -> Result<Arc<CatalogOptions>, RepositoryError> {
        if let Some(options) = self.inner.options.get(&()).await {
            return Ok(options);
        }
        let options = Arc::new(
            CatalogRepository::new(self.pool())
                .options()
                .await?
                .active_only(),
        );
        self.inner.options.insert((), Arc::clone(&options)).await;
        tracing::debug!(
            sizes = options.sizes.len(),
            colors = options.colors.len(),
            "Catalog options loaded"
        );
        Ok(options)
    }

    /// The decoded image cache.
    #[must_use]
    pub fn images(&self) -> &Cache<ImageKey, Arc<RgbaImage>> {
        &self.inner.images
    }
}
