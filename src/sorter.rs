//! Numeric page ordering.
//!
//! Page files are named `page1`, `page2`, ..., `page10`; sorting them as
//! strings puts `page10` before `page2`, so pages are ordered by the number
//! embedded in their name instead.

use regex::Regex;
use std::sync::LazyLock;

/// `page12`, `page_12`, `Page-12` anywhere in the file name.
static PAGE_NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)page[\s_-]*(\d+)").expect("Invalid PAGE_NUMBER_REGEX"));

/// Trailing number right before the extension (`012.jpg`).
static TRAILING_NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)(?:\.[A-Za-z0-9]+)?$").expect("Invalid TRAILING_NUMBER_REGEX")
});

/// Extracts the page index embedded in a URL or file name.
///
/// Query strings and fragments are ignored. Returns 0 when no index can be
/// found, so malformed names sort first.
pub fn page_index(name: &str) -> u64 {
    let name = name.split(['?', '#']).next().unwrap_or(name);
    let file = name.rsplit('/').next().unwrap_or(name);

    PAGE_NUMBER_REGEX
        .captures(file)
        .or_else(|| TRAILING_NUMBER_REGEX.captures(file))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Sorts pages by ascending embedded index.
///
/// The sort is stable: pages with the same index keep their input order.
pub fn sort_pages<S: AsRef<str>>(pages: Vec<S>) -> Vec<S> {
    let mut keyed: Vec<(u64, S)> = pages
        .into_iter()
        .map(|page| (page_index(page.as_ref()), page))
        .collect();
    keyed.sort_by_key(|(index, _)| *index);
    keyed.into_iter().map(|(_, page)| page).collect()
}
