//! Object storage for product images, frame assets, and customer photos.
//!
//! Two backends share one interface:
//!
//! - `Local` writes under a directory and serves through the app's `/media`
//!   route (development and single-machine deploys)
//! - `Supabase` talks to the Supabase Storage REST API with a service key
//!
//! Object paths are relative, `/`-separated, and may not escape the bucket.

use std::path::{Path, PathBuf};

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid object path: {0}")]
    InvalidPath(String),

    #[error("object not found: {0}")]
    NotFound(String),

    #[error("storage configuration error: {0}")]
    Config(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("storage API error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// Reject empty, absolute, backslashed, or `..`/`.` paths.
///
/// # Errors
///
/// Returns `StorageError::InvalidPath` for anything that could escape the
/// bucket root.
pub fn validate_path(path: &str) -> Result<&str, StorageError> {
    let invalid = || StorageError::InvalidPath(path.to_string());
    if path.is_empty() || path.starts_with('/') || path.contains('\\') || path.contains('\0') {
        return Err(invalid());
    }
    if path
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(invalid());
    }
    Ok(path)
}

/// Where an uploaded object ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub path: String,
    pub public_url: String,
    pub size: u64,
}

/// Storage backend settings.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    Local {
        root: PathBuf,
        /// URL prefix the files are served under, e.g. `/media`.
        public_url: String,
    },
    Supabase {
        url: Url,
        service_key: SecretString,
        bucket: String,
    },
}

impl StorageConfig {
    /// Read the `STORAGE_*` / `SUPABASE_*` settings through `lookup`.
    ///
    /// `STORAGE_BACKEND` selects `local` (default) or `supabase`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Config` for an unknown backend, a missing
    /// Supabase setting, or an unparseable `SUPABASE_URL`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, StorageError> {
        let backend = lookup("STORAGE_BACKEND").unwrap_or_else(|| "local".to_string());
        match backend.as_str() {
            "local" => Ok(Self::Local {
                root: PathBuf::from(
                    lookup("STORAGE_LOCAL_ROOT").unwrap_or_else(|| "./var/storage".to_string()),
                ),
                public_url: lookup("STORAGE_PUBLIC_URL").unwrap_or_else(|| "/media".to_string()),
            }),
            "supabase" => {
                let missing = |key: &str| StorageError::Config(format!("{key} is required"));
                let raw_url = lookup("SUPABASE_URL").ok_or_else(|| missing("SUPABASE_URL"))?;
                let url = Url::parse(&raw_url)
                    .map_err(|e| StorageError::Config(format!("SUPABASE_URL: {e}")))?;
                let service_key = lookup("SUPABASE_SERVICE_KEY")
                    .ok_or_else(|| missing("SUPABASE_SERVICE_KEY"))?;
                Ok(Self::Supabase {
                    url,
                    service_key: SecretString::from(service_key),
                    bucket: lookup("STORAGE_BUCKET")
                        .unwrap_or_else(|| crate::assets::DEFAULT_BUCKET.to_string()),
                })
            }
            other => Err(StorageError::Config(format!(
                "unknown STORAGE_BACKEND '{other}' (expected local or supabase)"
            ))),
        }
    }
}

/// Files under a local directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
    public_url: String,
}

impl LocalStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, public_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_url: public_url.into(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        Ok(self.root.join(validate_path(path)?))
    }

    async fn upload(&self, path: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, bytes).await?;
        Ok(())
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let target = self.resolve(path)?;
        match tokio::fs::read(&target).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn remove(&self, paths: &[String]) -> Result<(), StorageError> {
        for path in paths {
            let target = self.resolve(path)?;
            match tokio::fs::remove_file(&target).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!(path = %path, "Object already gone");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{path}", self.public_url.trim_end_matches('/'))
    }
}

/// Supabase Storage REST client.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    client: reqwest::Client,
    base: String,
    bucket: String,
}

impl SupabaseStore {
    /// Build a client authenticated with the service key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Config` if the key is not a valid header value,
    /// or `StorageError::Http` if the HTTP client fails to build.
    pub fn new(url: &Url, service_key: &SecretString, bucket: &str) -> Result<Self, StorageError> {
        let key = service_key.expose_secret();
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|e| StorageError::Config(format!("Invalid service key: {e}")))?,
        );
        headers.insert(
            "apikey",
            HeaderValue::from_str(key)
                .map_err(|e| StorageError::Config(format!("Invalid service key: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base: url.as_str().trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
        })
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{path}", self.base, self.bucket)
    }

    async fn check(
        response: reqwest::Response,
        path: &str,
    ) -> Result<reqwest::Response, StorageError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(path.to_string()));
        }
        let message = response.text().await.unwrap_or_default();
        Err(StorageError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let response = self
            .client
            .post(self.object_url(validate_path(path)?))
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await?;
        Self::check(response, path).await?;
        Ok(())
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let response = self
            .client
            .get(self.object_url(validate_path(path)?))
            .send()
            .await?;
        let response = Self::check(response, path).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn remove(&self, paths: &[String]) -> Result<(), StorageError> {
        for path in paths {
            validate_path(path)?;
        }
        let url = format!("{}/storage/v1/object/{}", self.base, self.bucket);
        let response = self
            .client
            .delete(url)
            .json(&serde_json::json!({ "prefixes": paths }))
            .send()
            .await?;
        Self::check(response, &paths.join(",")).await?;
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{path}",
            self.base, self.bucket
        )
    }
}

/// The configured object store.
#[derive(Debug, Clone)]
pub enum ObjectStore {
    Local(LocalStore),
    Supabase(SupabaseStore),
}

impl ObjectStore {
    /// Build the backend named by `config`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the Supabase client cannot be built.
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        match config {
            StorageConfig::Local { root, public_url } => {
                Ok(Self::Local(LocalStore::new(root.clone(), public_url.clone())))
            }
            StorageConfig::Supabase {
                url,
                service_key,
                bucket,
            } => Ok(Self::Supabase(SupabaseStore::new(url, service_key, bucket)?)),
        }
    }

    #[must_use]
    pub const fn backend_name(&self) -> &'static str {
        match self {
            Self::Local(_) => "local",
            Self::Supabase(_) => "supabase",
        }
    }

    /// Store `bytes` at `path`, replacing any existing object.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the path is invalid or the write fails.
    #[instrument(skip(self, bytes), fields(backend = self.backend_name(), size = bytes.len()))]
    pub async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        let size = bytes.len() as u64;
        match self {
            Self::Local(store) => store.upload(path, &bytes).await?,
            Self::Supabase(store) => store.upload(path, bytes, content_type).await?,
        }
        debug!("Object stored");
        Ok(StoredObject {
            path: path.to_string(),
            public_url: self.public_url(path),
            size,
        })
    }

    /// Read an object.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if there is no object at `path`.
    #[instrument(skip(self), fields(backend = self.backend_name()))]
    pub async fn download(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        match self {
            Self::Local(store) => store.download(path).await,
            Self::Supabase(store) => store.download(path).await,
        }
    }

    /// Delete objects. Missing objects are not an error for the local backend.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if a path is invalid or the delete fails.
    #[instrument(skip(self), fields(backend = self.backend_name()))]
    pub async fn remove(&self, paths: &[String]) -> Result<(), StorageError> {
        if paths.is_empty() {
            return Ok(());
        }
        match self {
            Self::Local(store) => store.remove(paths).await,
            Self::Supabase(store) => store.remove(paths).await,
        }
    }

    /// URL the object can be fetched from by a browser.
    #[must_use]
    pub fn public_url(&self, path: &str) -> String {
        match self {
            Self::Local(store) => store.public_url(path),
            Self::Supabase(store) => store.public_url(path),
        }
    }

    /// Map a public URL produced by this store back to its object path.
    #[must_use]
    pub fn path_from_public_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        let prefix = self.public_url("");
        url.strip_prefix(prefix.as_str())
            .filter(|path| validate_path(path).is_ok())
    }
}
