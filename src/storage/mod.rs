//! Object storage for page images.
//!
//! Page discovery only needs two things from storage: whether an object
//! exists, and the URL a reader should load it from.

mod http;
mod local;

pub use http::{HttpObjectStore, UrlStyle};
pub use local::LocalObjectStore;

use crate::config::{StorageBackend, StorageConfig};
use crate::error::StorageError;
use async_trait::async_trait;
use std::sync::Arc;

/// Read-only view of the object store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Checks whether an object exists at `path`.
    async fn exists(&self, path: &str) -> Result<bool, StorageError>;

    /// Public URL for the object at `path`.
    fn public_url(&self, path: &str) -> String;
}

/// Opens the object store described by the configuration.
pub fn open_storage(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>, StorageError> {
    match config.backend {
        StorageBackend::Http => {
            let base_url = config.base_url.as_deref().ok_or_else(|| {
                StorageError::InvalidUrl("storage.base_url is not set".to_string())
            })?;
            Ok(Arc::new(HttpObjectStore::new(UrlStyle::path(base_url)?)?))
        }
        StorageBackend::Firebase => {
            let bucket = config
                .bucket
                .as_deref()
                .ok_or_else(|| StorageError::InvalidUrl("storage.bucket is not set".to_string()))?;
            Ok(Arc::new(HttpObjectStore::new(UrlStyle::firebase(bucket))?))
        }
        StorageBackend::Local => {
            let public_base = config.base_url.clone().unwrap_or_default();
            Ok(Arc::new(LocalObjectStore::new(&config.root, public_base)))
        }
    }
}
