//! Page format prober.
//!
//! Pages are uploaded in whatever encoding the uploader had at hand, so the
//! file extension of a page is discovered by asking the object store for each
//! candidate in priority order.

use crate::config::ProbeConfig;
use crate::storage::ObjectStore;
use std::sync::Arc;

/// Finds the first existing encoding of a page.
///
/// Holds no mutable state; clones share the store and configuration and can
/// probe concurrently.
#[derive(Clone)]
pub struct PageProber {
    store: Arc<dyn ObjectStore>,
    config: Arc<ProbeConfig>,
}

impl PageProber {
    /// Creates a prober over `store` with fixed priorities and placeholder.
    pub fn new(store: Arc<dyn ObjectStore>, config: ProbeConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// Returns the probe configuration.
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Resolves a page stem to the URL of its first existing variant.
    ///
    /// Falls back to the placeholder URL when no candidate exists. Failed or
    /// timed-out checks count as "does not exist" for that candidate.
    pub async fn probe(&self, stem: &str) -> String {
        for ext in &self.config.extensions {
            let path = format!("{}.{}", stem, ext);

            match tokio::time::timeout(self.config.timeout(), self.store.exists(&path)).await {
                Ok(Ok(true)) => return self.store.public_url(&path),
                Ok(Ok(false)) => {}
                Ok(Err(err)) => tracing::debug!(%path, error = %err, "existence check failed"),
                Err(_) => tracing::debug!(%path, "existence check timed out"),
            }
        }

        tracing::debug!(%stem, "no variant found, using placeholder");
        self.config.placeholder_url.clone()
    }
}
