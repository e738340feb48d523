//! Content store trait and backends.
//!
//! The content store owns series and episodes. This crate only reads from it;
//! writes belong to the admin tooling.

mod file;
mod rest;

pub use file::FileStore;
pub use rest::RestStore;

use crate::catalog::{Episode, EpisodeLabel, Series};
use crate::config::{StoreBackend, StoreConfig};
use crate::error::StoreError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Read access to series and episodes.
///
/// Absence is `Ok(None)` or an empty list; `Err` always means the backend
/// could not be reached or returned garbage.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Returns the human-readable name of this backend.
    fn name(&self) -> &'static str;

    /// Lists every series.
    async fn list_series(&self) -> Result<Vec<Series>, StoreError>;

    /// Looks up one series by slug.
    async fn get_series(&self, slug: &str) -> Result<Option<Series>, StoreError> {
        let series = self.list_series().await?;
        Ok(series.into_iter().find(|s| s.matches_slug(slug)))
    }

    /// Lists the episodes of a series (empty when the series is unknown).
    async fn list_episodes(&self, slug: &str) -> Result<Vec<Episode>, StoreError> {
        Ok(self
            .get_series(slug)
            .await?
            .map(|s| s.episodes)
            .unwrap_or_default())
    }

    /// Returns the explicit page list of an episode, if the backend has one.
    async fn episode_manifest(
        &self,
        slug: &str,
        episode: &EpisodeLabel,
    ) -> Result<Option<Vec<String>>, StoreError>;
}

/// Opens the content store described by the configuration.
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn ContentStore>, StoreError> {
    match config.backend {
        StoreBackend::File => Ok(Arc::new(FileStore::new(&config.path))),
        StoreBackend::Rest => {
            let api_url = config
                .api_url
                .as_deref()
                .ok_or_else(|| StoreError::InvalidUrl("store.api_url is not set".to_string()))?;
            Ok(Arc::new(RestStore::new(api_url)?))
        }
    }
}

/// Common HTTP client configuration for remote backends.
pub fn create_http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(concat!("koma/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryContentStore;

    #[tokio::test]
    async fn test_default_lookups() {
        let store = MemoryContentStore::new().with_series("/demo-series", &[("1", Some(3))]);

        let series = store.get_series("demo-series").await.unwrap();
        assert_eq!(series.unwrap().name, "demo-series");

        let episodes = store.list_episodes("demo-series").await.unwrap();
        assert_eq!(episodes.len(), 1);

        assert!(store.get_series("missing").await.unwrap().is_none());
        assert!(store.list_episodes("missing").await.unwrap().is_empty());
    }

    #[test]
    fn test_open_rest_requires_url() {
        let config = StoreConfig {
            backend: StoreBackend::Rest,
            ..Default::default()
        };
        assert!(open_store(&config).is_err());
    }

    #[test]
    fn test_open_file_store() {
        let store = open_store(&StoreConfig::default()).unwrap();
        assert_eq!(store.name(), "file");
    }
}
