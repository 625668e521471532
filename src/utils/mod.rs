//! Common utilities and helper functions
//!
//! This module provides shared utilities used across the application.

pub mod error;

use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// Replace every character outside `[A-Za-z0-9._-]` with `_` and keep at
/// most `max_len` characters
pub fn sanitize_filename(text: &str, max_len: usize) -> String {
    static INVALID_CHARS: OnceLock<Regex> = OnceLock::new();

    let re =
        INVALID_CHARS.get_or_init(|| Regex::new(r"[^A-Za-z0-9._-]").expect("Invalid regex pattern"));

    re.replace_all(text, "_").chars().take(max_len).collect()
}

/// Truncate text to a maximum number of characters, marking the cut
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}

/// Render a timestamp as RFC 3339 in UTC with millisecond precision
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time as milliseconds since the Unix epoch
pub fn epoch_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("simple-guid_1.2", 50), "simple-guid_1.2");
        assert_eq!(sanitize_filename("a/b?c=d", 50), "a_b_c_d");
        assert_eq!(sanitize_filename("10.5281/zenodo.123", 50), "10.5281_zenodo.123");
    }

    #[test]
    fn test_sanitize_filename_non_ascii() {
        // Each char is replaced, not each byte
        assert_eq!(sanitize_filename("über", 50), "_ber");
    }

    #[test]
    fn test_sanitize_filename_truncates() {
        let long = "x".repeat(80);
        assert_eq!(sanitize_filename(&long, 50).len(), 50);
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("very long text here", 10), "very lo...");
    }

    #[test]
    fn test_iso_timestamp() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 5).unwrap();
        assert_eq!(iso_timestamp(at), "2025-03-01T12:30:05.000Z");
    }

    #[test]
    fn test_epoch_millis_is_recent() {
        // 2020-01-01T00:00:00Z
        assert!(epoch_millis() > 1_577_836_800_000);
    }
}
