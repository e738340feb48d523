//! In-memory collaborators for tests.

use crate::catalog::{Episode, EpisodeLabel, Series};
use crate::error::{StorageError, StoreError};
use crate::storage::ObjectStore;
use crate::store::ContentStore;
use crate::utils::normalize_slug;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Content store holding series in memory.
#[derive(Default)]
pub struct MemoryContentStore {
    series: Vec<Series>,
    manifests: HashMap<(String, u32), Vec<String>>,
    offline: AtomicBool,
    manifest_calls: Mutex<Vec<u32>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a series with `(label, declared page count)` episodes.
    pub fn with_series(mut self, slug: &str, episodes: &[(&str, Option<u32>)]) -> Self {
        self.series.push(Series {
            slug: slug.to_string(),
            name: normalize_slug(slug).to_string(),
            episodes: episodes
                .iter()
                .map(|&(label, page_count)| Episode {
                    label: EpisodeLabel::parse(label),
                    page_count,
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        });
        self
    }

    /// Registers an explicit manifest for an episode number.
    pub fn with_manifest(mut self, slug: &str, episode: u32, pages: &[&str]) -> Self {
        self.manifests.insert(
            (normalize_slug(slug).to_string(), episode),
            pages.iter().map(|p| p.to_string()).collect(),
        );
        self
    }

    /// Makes every call fail as if the backend were down.
    pub fn offline(self) -> Self {
        self.go_offline();
        self
    }

    /// Takes the backend down for all later calls.
    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    /// Episode numbers whose manifest was requested, in call order.
    pub fn manifest_calls(&self) -> Vec<u32> {
        self.manifest_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn list_series(&self) -> Result<Vec<Series>, StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::ApiError("HTTP 503: offline".to_string()));
        }
        Ok(self.series.clone())
    }

    async fn episode_manifest(
        &self,
        slug: &str,
        episode: &EpisodeLabel,
    ) -> Result<Option<Vec<String>>, StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::ApiError("HTTP 503: offline".to_string()));
        }
        self.manifest_calls.lock().unwrap().push(episode.number());
        Ok(self
            .manifests
            .get(&(normalize_slug(slug).to_string(), episode.number()))
            .cloned())
    }
}

/// Object store holding a set of existing paths.
#[derive(Default)]
pub struct MemoryObjectStore {
    existing: HashSet<String>,
    delays: HashMap<String, Duration>,
    failing: HashSet<String>,
    hanging: HashSet<String>,
    checks: Mutex<Vec<String>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(mut self, path: &str) -> Self {
        self.existing.insert(path.to_string());
        self
    }

    /// Delays the existence check for `path`.
    pub fn with_delay(mut self, path: &str, delay: Duration) -> Self {
        self.delays.insert(path.to_string(), delay);
        self
    }

    /// Makes the existence check for `path` fail.
    pub fn with_failure(mut self, path: &str) -> Self {
        self.failing.insert(path.to_string());
        self
    }

    /// Makes the existence check for `path` never complete.
    pub fn with_hang(mut self, path: &str) -> Self {
        self.hanging.insert(path.to_string());
        self
    }

    /// Paths checked so far, in call order.
    pub fn checks(&self) -> Vec<String> {
        self.checks.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        self.checks.lock().unwrap().push(path.to_string());

        if self.hanging.contains(path) {
            std::future::pending::<()>().await;
        }
        if let Some(delay) = self.delays.get(path) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(path) {
            return Err(StorageError::IoError(std::io::Error::other("probe failed")));
        }
        Ok(self.existing.contains(path))
    }

    fn public_url(&self, path: &str) -> String {
        format!("https://cdn.test/{}", path)
    }
}
