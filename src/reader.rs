//! Reader facade.
//!
//! Ties the fallback resolver to a [`ReaderSession`] and exposes the
//! operations a reading UI needs: open an episode, switch view mode, turn
//! pages, and move between episodes.

use crate::config::Config;
use crate::error::ResolveError;
use crate::prober::PageProber;
use crate::resolver::{EpisodeFallbackResolver, EpisodeOutcome};
use crate::session::{Direction, ReaderSession, ViewMode};
use crate::storage::open_storage;
use crate::store::open_store;
use anyhow::Context;

/// A reader with one active session.
pub struct Reader {
    resolver: EpisodeFallbackResolver,
    session: ReaderSession,
}

impl Reader {
    pub fn new(resolver: EpisodeFallbackResolver, mode: ViewMode) -> Self {
        Self {
            resolver,
            session: ReaderSession::new(mode),
        }
    }

    /// Builds a reader from configuration, opening both backends.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let store = open_store(&config.store).context("Failed to open content store")?;
        let storage = open_storage(&config.storage).context("Failed to open object storage")?;
        let prober = PageProber::new(storage, config.probe.clone());
        let resolver = EpisodeFallbackResolver::new(store, prober, &config.fallback);

        Ok(Self::new(resolver, config.reader.default_mode.into()))
    }

    /// The resolver, for callers that run resolutions themselves.
    pub fn resolver(&self) -> &EpisodeFallbackResolver {
        &self.resolver
    }

    pub fn session(&self) -> &ReaderSession {
        &self.session
    }

    /// Opens `requested` of the series, falling back to earlier episodes.
    ///
    /// The session only changes if this is still the latest load when the
    /// resolution completes. A backend failure leaves no episode loaded.
    pub async fn open_episode(
        &mut self,
        slug: &str,
        requested: &str,
    ) -> Result<EpisodeOutcome, ResolveError> {
        let ticket = self.session.begin_load();
        match self.resolver.resolve_episode(slug, requested).await {
            Ok(outcome) => {
                self.session.finish_load(ticket, &outcome);
                Ok(outcome)
            }
            Err(err) => {
                self.session.fail_load(ticket);
                Err(err)
            }
        }
    }

    /// Opens the adjacent episode; `None` when that link is not offered.
    pub async fn navigate_episode(
        &mut self,
        direction: Direction,
    ) -> Result<Option<EpisodeOutcome>, ResolveError> {
        let Some(label) = self.session.adjacent_episode(direction) else {
            return Ok(None);
        };
        let Some(slug) = self.session.episode().map(|ep| ep.slug.clone()) else {
            return Ok(None);
        };

        self.open_episode(&slug, label.as_str()).await.map(Some)
    }

    pub async fn next_episode(&mut self) -> Result<Option<EpisodeOutcome>, ResolveError> {
        self.navigate_episode(Direction::Next).await
    }

    pub async fn prev_episode(&mut self) -> Result<Option<EpisodeOutcome>, ResolveError> {
        self.navigate_episode(Direction::Previous).await
    }

    pub fn switch_view_mode(&mut self, mode: ViewMode) {
        self.session.switch_view_mode(mode);
    }

    pub fn next_page(&mut self) {
        self.session.next_page();
    }

    pub fn prev_page(&mut self) {
        self.session.prev_page();
    }
}
