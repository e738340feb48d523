//! Remote REST API backend.
//!
//! The remote API uses its own field names (`manga_slug`, `manga_disc`, ...)
//! which are mapped onto [`Series`] here.

use super::{ContentStore, create_http_client};
use crate::catalog::{Episode, EpisodeLabel, Series};
use crate::error::StoreError;
use crate::utils::{check_response_status, normalize_slug};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

/// Series as returned by the remote API.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSeries {
    manga_name: String,
    manga_slug: String,
    manga_disc: String,
    manga_bg_img: Option<String>,
    tag_id: Option<RawTags>,
    view: Option<u64>,
    created_at: Option<String>,
    updated_at: Option<String>,
    ep: Vec<Episode>,
}

/// Tags arrive either as a list or as one comma-separated string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTags {
    List(Vec<String>),
    Text(String),
}

impl From<RawTags> for Vec<String> {
    fn from(raw: RawTags) -> Self {
        match raw {
            RawTags::List(tags) => tags,
            RawTags::Text(text) => text
                .split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

impl From<RawSeries> for Series {
    fn from(raw: RawSeries) -> Self {
        Self {
            slug: raw.manga_slug,
            name: raw.manga_name,
            synopsis: raw.manga_disc,
            cover_image: raw.manga_bg_img,
            tags: raw.tag_id.map(Into::into).unwrap_or_default(),
            views: raw.view.unwrap_or(0),
            episodes: raw.ep,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        }
    }
}

/// Episode manifest response.
#[derive(Debug, Deserialize)]
struct ManifestResponse {
    #[serde(default)]
    images: Vec<String>,
}

/// Content store backed by the remote catalog API.
pub struct RestStore {
    client: reqwest::Client,
    base: Url,
}

impl RestStore {
    /// Creates a store for the API rooted at `api_url`.
    pub fn new(api_url: &str) -> Result<Self, StoreError> {
        let base = Url::parse(api_url).map_err(|e| StoreError::InvalidUrl(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(StoreError::InvalidUrl(api_url.to_string()));
        }

        Ok(Self {
            client: create_http_client()?,
            base,
        })
    }

    /// Builds an endpoint URL below the API root, encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl ContentStore for RestStore {
    fn name(&self) -> &'static str {
        "rest"
    }

    async fn list_series(&self) -> Result<Vec<Series>, StoreError> {
        let url = self.endpoint(&["mangas"])?;
        tracing::debug!(%url, "listing series");

        let response = self.client.get(url).send().await?;
        let raw: Vec<RawSeries> = check_response_status(response).await?.json().await?;
        Ok(raw.into_iter().map(Series::from).collect())
    }

    async fn episode_manifest(
        &self,
        slug: &str,
        episode: &EpisodeLabel,
    ) -> Result<Option<Vec<String>>, StoreError> {
        let url = self.endpoint(&[normalize_slug(slug), episode.as_str()])?;
        tracing::debug!(%url, "fetching episode manifest");

        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let manifest: ManifestResponse = check_response_status(response).await?.json().await?;
        Ok(Some(manifest.images).filter(|images| !images.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_series_mapping() {
        let json = r#"{
            "manga_id": 7,
            "manga_name": "Demo",
            "manga_slug": "demo-series",
            "manga_disc": "Synopsis",
            "manga_bg_img": "https://cdn.example.com/bg.webp",
            "tag_id": ["action", "comedy"],
            "view": 42,
            "created_at": "2025-01-01",
            "updated_at": "2025-01-03"
        }"#;

        let series: Series = serde_json::from_str::<RawSeries>(json).unwrap().into();
        assert_eq!(series.slug, "demo-series");
        assert_eq!(series.synopsis, "Synopsis");
        assert_eq!(series.tags, vec!["action", "comedy"]);
        assert_eq!(series.views, 42);
        assert!(series.episodes.is_empty());
    }

    #[test]
    fn test_raw_series_tolerates_nulls() {
        let json = r#"{"manga_slug": "demo", "tag_id": "action, drama", "view": null}"#;
        let series: Series = serde_json::from_str::<RawSeries>(json).unwrap().into();
        assert_eq!(series.tags, vec!["action", "drama"]);
        assert_eq!(series.views, 0);
    }

    #[test]
    fn test_endpoint_building() {
        let store = RestStore::new("https://example.com/api/").unwrap();
        let url = store.endpoint(&["mangas"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/mangas");

        let store = RestStore::new("https://example.com/api").unwrap();
        let url = store.endpoint(&["demo series", "3"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/demo%20series/3");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(RestStore::new("not a url").is_err());
        assert!(RestStore::new("mailto:someone@example.com").is_err());
    }
}
