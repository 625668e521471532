//! Response body classification
//!
//! Labels a raw response body by looking at its first non-whitespace
//! characters. Check order matters: the JSON prefixes are tested before the
//! markup prefixes, so a body starting with `[` is never taken for XML.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse content type of a response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Empty,
    Json,
    Html,
    Xml,
    Text,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Json => "json",
            Self::Html => "html",
            Self::Xml => "xml",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a response body
///
/// Prefix matching is case-sensitive: `<!DOCTYPE html` and `<html` are HTML,
/// any other leading `<` is XML.
///
/// # Examples
///
/// ```
/// use guid_bench::parser::{classify, ContentKind};
///
/// assert_eq!(classify("  {\"a\":1}"), ContentKind::Json);
/// assert_eq!(classify("<!DOCTYPE html><html>"), ContentKind::Html);
/// ```
pub fn classify(body: &str) -> ContentKind {
    let trimmed = body.trim();

    if trimmed.is_empty() {
        ContentKind::Empty
    } else if trimmed.starts_with('{') || trimmed.starts_with('[') {
        ContentKind::Json
    } else if trimmed.starts_with("<!DOCTYPE html") || trimmed.starts_with("<html") {
        ContentKind::Html
    } else if trimmed.starts_with('<') {
        ContentKind::Xml
    } else {
        ContentKind::Text
    }
}
