//! Episode resolution.
//!
//! [`EpisodeImageResolver`] turns one episode into an ordered page list,
//! either from the store's manifest or by probing every declared page.
//! [`EpisodeFallbackResolver`] walks backwards from the requested episode
//! until one of them yields pages.

use crate::catalog::{Episode, EpisodeLabel, find_episode, latest_episode, listed_below};
use crate::config::FallbackConfig;
use crate::error::{ResolveError, StoreError};
use crate::prober::PageProber;
use crate::sorter::sort_pages;
use crate::store::ContentStore;
use crate::utils::normalize_slug;
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use std::sync::Arc;

/// Builds the ordered page list of a single episode.
#[derive(Clone)]
pub struct EpisodeImageResolver {
    store: Arc<dyn ContentStore>,
    prober: PageProber,
}

impl EpisodeImageResolver {
    pub fn new(store: Arc<dyn ContentStore>, prober: PageProber) -> Self {
        Self { store, prober }
    }

    /// Resolves the pages of one episode.
    ///
    /// A non-empty manifest wins and is only sorted. Otherwise every declared
    /// page is probed and the result has exactly `declared_pages` entries,
    /// placeholders included. Returns `None` when there is neither a manifest
    /// nor a declared page count.
    pub async fn resolve(
        &self,
        slug: &str,
        episode: &EpisodeLabel,
        declared_pages: Option<u32>,
    ) -> Result<Option<Vec<String>>, StoreError> {
        if let Some(manifest) = self.store.episode_manifest(slug, episode).await?
            && !manifest.is_empty()
        {
            return Ok(Some(sort_pages(manifest)));
        }

        match declared_pages.filter(|&n| n > 0) {
            Some(count) => Ok(Some(self.probe_pages(slug, episode, count).await)),
            None => Ok(None),
        }
    }

    /// Probes pages `1..=count` concurrently.
    ///
    /// Each result lands in the slot of its page number, so completion order
    /// never affects the final order.
    async fn probe_pages(&self, slug: &str, episode: &EpisodeLabel, count: u32) -> Vec<String> {
        let slug = normalize_slug(slug);
        let config = self.prober.config();
        let mut slots: Vec<Option<String>> = vec![None; count as usize];

        let mut probes: FuturesUnordered<_> = (1..=count)
            .map(|page| {
                let stem = config.page_stem(slug, episode.as_str(), page);
                let prober = &self.prober;
                async move { (page, prober.probe(&stem).await) }
            })
            .collect();

        while let Some((page, url)) = probes.next().await {
            slots[(page - 1) as usize] = Some(url);
        }

        slots
            .into_iter()
            .map(|slot| slot.unwrap_or_else(|| config.placeholder_url.clone()))
            .collect()
    }
}

/// A successfully resolved episode.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEpisode {
    /// Series slug as requested.
    pub slug: String,

    /// Series display name.
    pub series_name: String,

    /// Episode the reader asked for.
    pub requested: EpisodeLabel,

    /// Episode actually served; differs from `requested` after a fallback.
    pub served: EpisodeLabel,

    /// Page URLs in reading order.
    pub pages: Vec<String>,

    /// Highest episode number the store lists for the series.
    pub latest_episode: Option<u32>,
}

impl ResolvedEpisode {
    /// Whether an earlier episode was served instead of the requested one.
    pub fn fell_back(&self) -> bool {
        self.served.number() != self.requested.number()
    }
}

/// Result of resolving a series + episode request.
#[derive(Debug, Clone, PartialEq)]
pub enum EpisodeOutcome {
    /// Content was found, possibly for an earlier episode.
    Found(ResolvedEpisode),

    /// The store does not know the series.
    SeriesNotFound,

    /// No episode at or below the request has content.
    Exhausted { requested: EpisodeLabel },
}

impl EpisodeOutcome {
    /// Returns the resolved episode, if any.
    pub fn found(&self) -> Option<&ResolvedEpisode> {
        match self {
            EpisodeOutcome::Found(resolved) => Some(resolved),
            _ => None,
        }
    }
}

/// Serves the nearest episode at or below the requested one that has pages.
#[derive(Clone)]
pub struct EpisodeFallbackResolver {
    store: Arc<dyn ContentStore>,
    images: EpisodeImageResolver,
    max_steps: u32,
}

impl EpisodeFallbackResolver {
    pub fn new(
        store: Arc<dyn ContentStore>,
        prober: PageProber,
        config: &FallbackConfig,
    ) -> Self {
        Self {
            images: EpisodeImageResolver::new(store.clone(), prober),
            store,
            max_steps: config.max_steps,
        }
    }

    /// Resolves `requested` for the series, stepping back one episode at a
    /// time while an episode yields no pages.
    ///
    /// Never moves forward from the request. Every listed episode at or
    /// below the request is tried; at most `max_steps` unlisted numbers are,
    /// after which the walk jumps to the next listed episode. Only content
    /// store failures are errors; missing content ends in
    /// [`EpisodeOutcome::Exhausted`].
    pub async fn resolve_episode(
        &self,
        slug: &str,
        requested: &str,
    ) -> Result<EpisodeOutcome, ResolveError> {
        let requested = EpisodeLabel::parse(requested);

        let Some(series) = self.store.get_series(slug).await.inspect_err(|err| {
            tracing::warn!(%slug, error = %err, "series lookup failed");
        })?
        else {
            return Ok(EpisodeOutcome::SeriesNotFound);
        };

        let episodes = self.store.list_episodes(slug).await?;
        let latest = latest_episode(&episodes);
        let mut unlisted_budget = self.max_steps;
        let mut number = requested.number();

        loop {
            let listed = find_episode(&episodes, number);
            if listed.is_none() {
                if unlisted_budget == 0 {
                    // Skip the rest of the unlisted run; listed episodes are always tried.
                    match listed_below(&episodes, number) {
                        Some(below) => {
                            number = below;
                            continue;
                        }
                        None => break,
                    }
                }
                unlisted_budget -= 1;
            }

            let label = listed
                .map(|ep| ep.label.clone())
                .unwrap_or_else(|| EpisodeLabel::from_number(number));

            let pages = self
                .images
                .resolve(slug, &label, listed.and_then(Episode::declared_pages))
                .await?;

            if let Some(pages) = pages.filter(|pages| !pages.is_empty()) {
                if number != requested.number() {
                    tracing::info!(
                        %slug,
                        requested = %requested,
                        served = %label,
                        "requested episode unavailable, serving earlier episode"
                    );
                }

                return Ok(EpisodeOutcome::Found(ResolvedEpisode {
                    slug: slug.to_string(),
                    series_name: series.name,
                    requested,
                    served: label,
                    pages,
                    latest_episode: latest,
                }));
            }

            if number <= 1 {
                break;
            }

            number -= 1;
        }

        tracing::info!(%slug, requested = %requested, "no episode with content found");
        Ok(EpisodeOutcome::Exhausted { requested })
    }
}
