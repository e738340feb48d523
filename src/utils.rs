//! Utility functions for common operations.

use crate::error::StoreError;
use regex::Regex;
use std::sync::LazyLock;

/// Leading signed integer of a label, ignoring surrounding whitespace.
static LEADING_INTEGER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("Invalid LEADING_INTEGER_REGEX"));

/// Parses the leading integer of a string, the way lenient label parsing does.
///
/// `"12"` and `"12abc"` both give `Some(12)`; `"abc"` gives `None`.
/// Values outside the `i64` range are treated as unparseable.
pub fn leading_integer(text: &str) -> Option<i64> {
    LEADING_INTEGER_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Normalizes a series slug for comparison (`"/demo/"` -> `"demo"`).
pub fn normalize_slug(slug: &str) -> &str {
    slug.trim().trim_matches('/')
}

/// Percent-encodes a whole path as a single URL component.
///
/// Slashes are encoded too, which is what object stores addressed by
/// object name (Firebase) expect.
pub fn encode_component(text: &str) -> String {
    url::form_urlencoded::byte_serialize(text.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Checks if an HTTP response is successful, and if not, returns a detailed error.
///
/// This helper extracts both the status code and response body for better error messages.
pub async fn check_response_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, StoreError> {
    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        return Err(StoreError::ApiError(format!("HTTP {}: {}", status, text)));
    }
    Ok(response)
}
