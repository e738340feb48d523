//! HTTP object storage, probed with `HEAD` requests.

use super::ObjectStore;
use crate::error::StorageError;
use crate::utils::encode_component;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// Firebase storage download endpoint.
const FIREBASE_ENDPOINT: &str = "https://firebasestorage.googleapis.com/v0/b";

/// How object paths map onto URLs.
#[derive(Debug, Clone)]
pub enum UrlStyle {
    /// `{base}/{path}`
    Path(Url),
    /// Firebase storage: the object name is one encoded component.
    Firebase { bucket: String },
}

impl UrlStyle {
    /// Path-style URLs under `base_url`.
    pub fn path(base_url: &str) -> Result<Self, StorageError> {
        let mut base = Url::parse(base_url).map_err(|e| StorageError::InvalidUrl(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(StorageError::InvalidUrl(base_url.to_string()));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self::Path(base))
    }

    /// Firebase download URLs for `bucket`.
    pub fn firebase(bucket: &str) -> Self {
        Self::Firebase {
            bucket: bucket.to_string(),
        }
    }

    fn url_for(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        match self {
            UrlStyle::Path(base) => base
                .join(path)
                .map(String::from)
                .unwrap_or_else(|_| format!("{}{}", base, path)),
            UrlStyle::Firebase { bucket } => format!(
                "{}/{}/o/{}?alt=media",
                FIREBASE_ENDPOINT,
                bucket,
                encode_component(path)
            ),
        }
    }
}

/// Object store reached over HTTP.
pub struct HttpObjectStore {
    client: reqwest::Client,
    style: UrlStyle,
}

impl HttpObjectStore {
    /// Creates a store with a dedicated client for existence checks.
    pub fn new(style: UrlStyle) -> Result<Self, StorageError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, style })
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let url = self.style.url_for(path);
        let response = self.client.head(&url).send().await?;
        Ok(response.status().is_success())
    }

    fn public_url(&self, path: &str) -> String {
        self.style.url_for(path)
    }
}
