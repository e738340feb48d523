//! Flat JSON catalog file backend.

use super::ContentStore;
use crate::catalog::{EpisodeLabel, Series};
use crate::error::StoreError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Reads series from a JSON array on disk.
///
/// The file is re-read on every call so edits show up immediately.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store backed by the given catalog file.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl ContentStore for FileStore {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn list_series(&self) -> Result<Vec<Series>, StoreError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    // Reads and parses the whole catalog once per call, so a fallback walk
    // costs one file read per episode it tries.
    async fn episode_manifest(
        &self,
        slug: &str,
        episode: &EpisodeLabel,
    ) -> Result<Option<Vec<String>>, StoreError> {
        let Some(series) = self.get_series(slug).await? else {
            return Ok(None);
        };

        Ok(series
            .episode(episode.number())
            .and_then(|ep| ep.manifest())
            .map(<[String]>::to_vec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    const CATALOG: &str = r#"[
        {
            "id": 1,
            "name": "Demo Series",
            "description": "A demo.",
            "ep": [
                { "episode": "1", "totalPage": 3, "created_date": "2025-01-01" },
                { "episode": 2, "images": ["x/page2.jpg", "x/page1.jpg"] }
            ],
            "tag": ["action"],
            "view": 100,
            "backgroundImage": "/images/demo-series/bg.webp",
            "slug": "/demo-series",
            "created_date": "2025-01-01",
            "updated_date": "2025-01-02"
        }
    ]"#;

    fn catalog_file(content: &str) -> NamedTempFile {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), content).unwrap();
        file
    }

    #[tokio::test]
    async fn test_list_series() {
        let file = catalog_file(CATALOG);
        let store = FileStore::new(file.path());

        let series = store.list_series().await.unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].name, "Demo Series");
        assert_eq!(series[0].tags, vec!["action"]);
        assert_eq!(series[0].episodes[0].declared_pages(), Some(3));
        assert_eq!(series[0].updated_at.as_deref(), Some("2025-01-02"));
    }

    #[tokio::test]
    async fn test_episode_manifest() {
        let file = catalog_file(CATALOG);
        let store = FileStore::new(file.path());

        let manifest = store
            .episode_manifest("demo-series", &EpisodeLabel::parse("2"))
            .await
            .unwrap();
        assert_eq!(manifest.unwrap().len(), 2);

        let none = store
            .episode_manifest("demo-series", &EpisodeLabel::parse("1"))
            .await
            .unwrap();
        assert!(none.is_none());

        let missing = store
            .episode_manifest("other", &EpisodeLabel::parse("1"))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_missing_file_is_error() {
        let store = FileStore::new("/nonexistent/koma/mangas.json");
        assert!(matches!(
            store.list_series().await,
            Err(StoreError::ReadError(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_file_is_error() {
        let file = catalog_file("{ not json");
        let store = FileStore::new(file.path());
        assert!(matches!(
            store.list_series().await,
            Err(StoreError::ParseError(_))
        ));
    }
}
