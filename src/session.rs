//! Reader session state.
//!
//! A session holds the episode being read, the view mode, and the current
//! page in paginated mode. Every load is tagged with a [`LoadTicket`]; a
//! result carrying an outdated ticket is dropped so a slow resolution can
//! never overwrite the episode the reader navigated to afterwards.

use crate::catalog::EpisodeLabel;
use crate::resolver::{EpisodeOutcome, ResolvedEpisode};

/// How pages are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// All pages stacked vertically.
    #[default]
    Continuous,
    /// One page at a time.
    Paginated { page: usize },
}

/// Episode navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Keys the reader reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowLeft,
    ArrowRight,
}

/// Token identifying one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Client-side state of one reading session.
#[derive(Debug, Clone, Default)]
pub struct ReaderSession {
    mode: ViewMode,
    episode: Option<ResolvedEpisode>,
    generation: u64,
}

impl ReaderSession {
    /// Creates an empty session in the given view mode.
    pub fn new(mode: ViewMode) -> Self {
        Self {
            mode: match mode {
                ViewMode::Continuous => ViewMode::Continuous,
                ViewMode::Paginated { .. } => ViewMode::Paginated { page: 0 },
            },
            ..Default::default()
        }
    }

    /// Starts a new load; any earlier ticket becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket(self.generation)
    }

    /// Checks whether `ticket` belongs to the latest load.
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Applies the result of a load.
    ///
    /// Returns `false` and leaves the session untouched when the ticket is
    /// stale. A found episode replaces the current one and rewinds paginated
    /// mode to the first page; any other outcome clears the session.
    pub fn finish_load(&mut self, ticket: LoadTicket, outcome: &EpisodeOutcome) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(ticket = ticket.0, current = self.generation, "dropping stale load");
            return false;
        }

        self.episode = outcome.found().cloned();
        if let ViewMode::Paginated { .. } = self.mode {
            self.mode = ViewMode::Paginated { page: 0 };
        }
        true
    }

    /// Records a failed load; the session no longer shows any episode.
    ///
    /// Stale tickets are ignored, like in [`ReaderSession::finish_load`].
    pub fn fail_load(&mut self, ticket: LoadTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }

        self.episode = None;
        true
    }

    /// Current view mode.
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// The episode being read.
    pub fn episode(&self) -> Option<&ResolvedEpisode> {
        self.episode.as_ref()
    }

    /// Page URLs of the current episode.
    pub fn pages(&self) -> &[String] {
        self.episode
            .as_ref()
            .map(|ep| ep.pages.as_slice())
            .unwrap_or(&[])
    }

    /// Current page index in paginated mode.
    pub fn current_page(&self) -> Option<usize> {
        match self.mode {
            ViewMode::Paginated { page } => Some(page),
            ViewMode::Continuous => None,
        }
    }

    fn last_index(&self) -> usize {
        self.pages().len().saturating_sub(1)
    }

    pub fn switch_to_paginated(&mut self) {
        self.mode = ViewMode::Paginated { page: 0 };
    }

    pub fn switch_to_continuous(&mut self) {
        self.mode = ViewMode::Continuous;
    }

    /// Switches mode; entering paginated mode always starts at page 0.
    pub fn switch_view_mode(&mut self, mode: ViewMode) {
        match mode {
            ViewMode::Continuous => self.switch_to_continuous(),
            ViewMode::Paginated { .. } => self.switch_to_paginated(),
        }
    }

    /// Moves to the next page; stays put on the last page.
    pub fn next_page(&mut self) {
        if let ViewMode::Paginated { page } = self.mode {
            self.mode = ViewMode::Paginated {
                page: (page + 1).min(self.last_index()),
            };
        }
    }

    /// Moves to the previous page; stays put on the first page.
    pub fn prev_page(&mut self) {
        if let ViewMode::Paginated { page } = self.mode {
            self.mode = ViewMode::Paginated {
                page: page.saturating_sub(1),
            };
        }
    }

    /// Arrow keys turn pages.
    pub fn handle_key(&mut self, key: NavKey) {
        match key {
            NavKey::ArrowLeft => self.prev_page(),
            NavKey::ArrowRight => self.next_page(),
        }
    }

    /// A tap on the left half of the page goes back, the right half forward.
    pub fn handle_tap(&mut self, x: f32, page_width: f32) {
        if x < page_width / 2.0 {
            self.prev_page();
        } else {
            self.next_page();
        }
    }

    /// The episode a prev/next link should point to, if one is offered.
    ///
    /// "Previous" needs a served episode above 1; "next" needs the following
    /// number to be within the latest episode the store lists.
    pub fn adjacent_episode(&self, direction: Direction) -> Option<EpisodeLabel> {
        let episode = self.episode.as_ref()?;
        let served = episode.served.number();

        match direction {
            Direction::Previous => (served > 1).then(|| EpisodeLabel::from_number(served - 1)),
            Direction::Next => {
                let next = served.checked_add(1)?;
                (next <= episode.latest_episode?).then(|| EpisodeLabel::from_number(next))
            }
        }
    }
}
