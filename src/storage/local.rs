//! Local directory object storage.

use super::ObjectStore;
use crate::error::StorageError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Serves page images from a directory, e.g. a site's `public/` folder.
pub struct LocalObjectStore {
    root: PathBuf,
    public_base: String,
}

impl LocalObjectStore {
    /// Creates a store rooted at `root`; URLs are prefixed with `public_base`.
    pub fn new(root: impl AsRef<Path>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            public_base: public_base.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let path = self.root.join(path.trim_start_matches('/'));
        Ok(tokio::fs::try_exists(path).await?)
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base, path.trim_start_matches('/'))
    }
}
