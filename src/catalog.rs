//! Catalog data model: series, episodes and episode labels.
//!
//! Field names on the wire follow the flat catalog file (`ep`, `totalPage`,
//! `backgroundImage`, ...); the Rust names describe what the fields mean.

use crate::utils::{leading_integer, normalize_slug};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// Episode range filter such as `1-12`.
static EPISODE_RANGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)-(\d+)$").expect("Invalid EPISODE_RANGE_REGEX"));

/// An episode label as stored, plus its normalized episode number.
///
/// Stores hold labels either as text (`"3"`) or as numbers (`3`). All ordering
/// and arithmetic use [`EpisodeLabel::number`]; the display text is kept for
/// routing and rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawLabel", into = "String")]
pub struct EpisodeLabel {
    number: u32,
    display: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLabel {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl From<RawLabel> for EpisodeLabel {
    fn from(raw: RawLabel) -> Self {
        match raw {
            RawLabel::Integer(n) => Self::parse(&n.to_string()),
            RawLabel::Float(f) => Self::parse(&f.to_string()),
            RawLabel::Text(text) => Self::parse(&text),
        }
    }
}

impl From<EpisodeLabel> for String {
    fn from(label: EpisodeLabel) -> Self {
        label.display
    }
}

impl EpisodeLabel {
    /// Parses a label leniently.
    ///
    /// The leading integer is the episode number. Labels without one
    /// (`"abc"`) resolve as episode 1, and numbers below 1 are clamped to 1.
    pub fn parse(text: &str) -> Self {
        let number = leading_integer(text)
            .map(|n| n.clamp(1, i64::from(u32::MAX)) as u32)
            .unwrap_or(1);

        Self {
            number,
            display: text.trim().to_string(),
        }
    }

    /// Creates a label whose display text is the number itself.
    pub fn from_number(number: u32) -> Self {
        let number = number.max(1);
        Self {
            number,
            display: number.to_string(),
        }
    }

    /// Normalized episode number (always at least 1).
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Label text as stored or requested.
    pub fn as_str(&self) -> &str {
        &self.display
    }
}

impl Default for EpisodeLabel {
    fn default() -> Self {
        Self::from_number(1)
    }
}

impl fmt::Display for EpisodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

impl From<&str> for EpisodeLabel {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

/// One chapter of a series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Episode {
    /// Episode label (`"3"` or `3`).
    #[serde(rename = "episode", alias = "episode_no")]
    pub label: EpisodeLabel,

    /// Optional episode title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Declared number of pages; absent or zero when unknown.
    #[serde(rename = "totalPage", alias = "total_page")]
    pub page_count: Option<u32>,

    /// Explicit page manifest, when the store knows it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,

    /// Per-episode view counter.
    #[serde(rename = "view")]
    pub views: u64,

    /// Creation timestamp as stored.
    #[serde(rename = "created_date", alias = "createdAt")]
    pub created_at: Option<String>,
}

impl Episode {
    /// Returns the declared page count if it is usable (greater than zero).
    pub fn declared_pages(&self) -> Option<u32> {
        self.page_count.filter(|&n| n > 0)
    }

    /// Returns the explicit manifest if it lists at least one page.
    pub fn manifest(&self) -> Option<&[String]> {
        self.images.as_deref().filter(|images| !images.is_empty())
    }
}

/// A manga title and its episodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Series {
    /// URL-safe identifier; the flat file stores it with a leading `/`.
    pub slug: String,

    /// Display name.
    pub name: String,

    /// Synopsis.
    #[serde(rename = "description")]
    pub synopsis: String,

    /// Cover image reference.
    #[serde(rename = "backgroundImage")]
    pub cover_image: Option<String>,

    /// Tag labels.
    #[serde(rename = "tag")]
    pub tags: Vec<String>,

    /// Aggregate view counter.
    #[serde(rename = "view")]
    pub views: u64,

    /// Episodes owned by this series.
    #[serde(rename = "ep")]
    pub episodes: Vec<Episode>,

    #[serde(rename = "created_date", alias = "createdAt")]
    pub created_at: Option<String>,

    #[serde(rename = "updated_date", alias = "updatedAt")]
    pub updated_at: Option<String>,
}

impl Series {
    /// Checks whether this series is addressed by `slug`.
    pub fn matches_slug(&self, slug: &str) -> bool {
        normalize_slug(&self.slug) == normalize_slug(slug)
    }

    /// Finds the episode with the given normalized number.
    pub fn episode(&self, number: u32) -> Option<&Episode> {
        find_episode(&self.episodes, number)
    }
}

/// Finds the first episode whose normalized number is `number`.
pub fn find_episode(episodes: &[Episode], number: u32) -> Option<&Episode> {
    episodes.iter().find(|ep| ep.label.number() == number)
}

/// Highest normalized episode number, if there are any episodes.
pub fn latest_episode(episodes: &[Episode]) -> Option<u32> {
    episodes.iter().map(|ep| ep.label.number()).max()
}

/// Highest listed episode number strictly below `number`.
pub fn listed_below(episodes: &[Episode], number: u32) -> Option<u32> {
    episodes
        .iter()
        .map(|ep| ep.label.number())
        .filter(|&n| n < number)
        .max()
}

/// Filters episodes by a search input.
///
/// An empty input keeps everything. `"a-b"` keeps episodes numbered within
/// the inclusive range; anything else keeps labels containing the input.
pub fn filter_episodes<'a>(episodes: &'a [Episode], input: &str) -> Vec<&'a Episode> {
    let input = input.trim();
    if input.is_empty() {
        return episodes.iter().collect();
    }

    if let Some(caps) = EPISODE_RANGE_REGEX.captures(input) {
        let start: u64 = caps[1].parse().unwrap_or(u64::MAX);
        let end: u64 = caps[2].parse().unwrap_or(u64::MAX);
        return episodes
            .iter()
            .filter(|ep| (start..=end).contains(&u64::from(ep.label.number())))
            .collect();
    }

    episodes
        .iter()
        .filter(|ep| ep.label.as_str().contains(input))
        .collect()
}

/// Filters series for tag and listing pages.
///
/// Series are kept if they carry any of `tags` (all series when `tags` is
/// empty) and, when `updated_date` is given, were updated on that date.
/// A `limit` of zero means no limit.
pub fn filter_series<'a>(
    series: &'a [Series],
    tags: &[String],
    updated_date: Option<&str>,
    limit: usize,
) -> Vec<&'a Series> {
    let filtered = series
        .iter()
        .filter(|s| tags.is_empty() || tags.iter().any(|tag| s.tags.contains(tag)))
        .filter(|s| updated_date.is_none_or(|date| s.updated_at.as_deref() == Some(date)));

    if limit > 0 {
        filtered.take(limit).collect()
    } else {
        filtered.collect()
    }
}

/// Counts how many series carry each tag, ordered by tag name.
pub fn tag_counts(series: &[Series]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for s in series {
        for tag in &s.tags {
            *counts.entry(tag.clone()).or_insert(0) += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(label: &str) -> Episode {
        Episode {
            label: EpisodeLabel::parse(label),
            ..Default::default()
        }
    }

    fn series(slug: &str, tags: &[&str], updated: Option<&str>) -> Series {
        Series {
            slug: slug.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            updated_at: updated.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_label_parse() {
        assert_eq!(EpisodeLabel::parse("3").number(), 3);
        assert_eq!(EpisodeLabel::parse(" 12 ").as_str(), "12");
        assert_eq!(EpisodeLabel::parse("abc").number(), 1);
        assert_eq!(EpisodeLabel::parse("abc").as_str(), "abc");
        assert_eq!(EpisodeLabel::parse("0").number(), 1);
        assert_eq!(EpisodeLabel::parse("-4").number(), 1);
        assert_eq!(EpisodeLabel::from_number(0).number(), 1);
    }

    #[test]
    fn test_label_from_string_or_number() {
        let text: EpisodeLabel = serde_json::from_str("\"3\"").unwrap();
        let number: EpisodeLabel = serde_json::from_str("3").unwrap();
        assert_eq!(text, number);
        assert_eq!(serde_json::to_string(&number).unwrap(), "\"3\"");
    }

    #[test]
    fn test_episode_from_catalog_json() {
        let json = r#"{"episode": "2", "totalPage": 41, "created_date": "2025-01-02"}"#;
        let ep: Episode = serde_json::from_str(json).unwrap();
        assert_eq!(ep.label.number(), 2);
        assert_eq!(ep.declared_pages(), Some(41));
        assert!(ep.manifest().is_none());

        let json = r#"{"episode_no": 1, "images": ["a/page1.jpg"], "totalPage": 0}"#;
        let ep: Episode = serde_json::from_str(json).unwrap();
        assert_eq!(ep.label.number(), 1);
        assert_eq!(ep.declared_pages(), None);
        assert_eq!(ep.manifest().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_manifest_is_absent() {
        let ep = Episode {
            images: Some(Vec::new()),
            ..Default::default()
        };
        assert!(ep.manifest().is_none());
    }

    #[test]
    fn test_matches_slug() {
        let s = series("/demo-series", &[], None);
        assert!(s.matches_slug("demo-series"));
        assert!(!s.matches_slug("demo"));
    }

    #[test]
    fn test_latest_episode() {
        let eps = vec![episode("2"), episode("10"), episode("3")];
        assert_eq!(latest_episode(&eps), Some(10));
        assert_eq!(latest_episode(&[]), None);
    }

    #[test]
    fn test_listed_below() {
        let eps = vec![episode("2"), episode("10"), episode("3")];
        assert_eq!(listed_below(&eps, 150), Some(10));
        assert_eq!(listed_below(&eps, 10), Some(3));
        assert_eq!(listed_below(&eps, 2), None);
    }

    #[test]
    fn test_filter_episodes_range() {
        let eps: Vec<Episode> = (1..=15).map(|n| episode(&n.to_string())).collect();
        let found = filter_episodes(&eps, "3-5");
        let numbers: Vec<u32> = found.iter().map(|ep| ep.label.number()).collect();
        assert_eq!(numbers, vec![3, 4, 5]);
    }

    #[test]
    fn test_filter_episodes_substring() {
        let eps: Vec<Episode> = (1..=12).map(|n| episode(&n.to_string())).collect();
        let found = filter_episodes(&eps, "1");
        let labels: Vec<&str> = found.iter().map(|ep| ep.label.as_str()).collect();
        assert_eq!(labels, vec!["1", "10", "11", "12"]);
        assert_eq!(filter_episodes(&eps, "").len(), 12);
    }

    #[test]
    fn test_filter_series() {
        let all = vec![
            series("a", &["action"], Some("2025-01-01")),
            series("b", &["romance"], Some("2025-01-02")),
            series("c", &["action", "comedy"], Some("2025-01-02")),
        ];

        let action = filter_series(&all, &["action".to_string()], None, 0);
        assert_eq!(action.len(), 2);

        let dated = filter_series(&all, &[], Some("2025-01-02"), 0);
        assert_eq!(dated.len(), 2);

        let limited = filter_series(&all, &[], None, 1);
        assert_eq!(limited[0].slug, "a");
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn test_tag_counts() {
        let all = vec![
            series("a", &["action"], None),
            series("c", &["action", "comedy"], None),
        ];
        let counts = tag_counts(&all);
        assert_eq!(counts.get("action"), Some(&2));
        assert_eq!(counts.get("comedy"), Some(&1));
    }
}
