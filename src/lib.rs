//! Koma - episode resolution and page discovery for a manga reading site.
//!
//! This library provides functionality for:
//! - Reading series and episodes from a JSON catalog or a remote REST API
//! - Discovering page images by probing object storage for known encodings
//! - Falling back to the nearest earlier episode when one has no pages
//! - Driving a continuous or paginated reading session

pub mod catalog;
pub mod config;
pub mod console;
pub mod error;
pub mod prober;
pub mod reader;
pub mod resolver;
pub mod session;
pub mod sorter;
pub mod storage;
pub mod store;
pub mod utils;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use catalog::{Episode, EpisodeLabel, Series};
pub use config::Config;
pub use console::Console;
pub use error::{ConfigError, ResolveError, StorageError, StoreError};
pub use prober::PageProber;
pub use reader::Reader;
pub use resolver::{EpisodeFallbackResolver, EpisodeImageResolver, EpisodeOutcome, ResolvedEpisode};
pub use session::{Direction, NavKey, ReaderSession, ViewMode};
pub use storage::ObjectStore;
pub use store::ContentStore;
