//! Response body inspection
//!
//! This module classifies raw response bodies and parses JSON without using
//! errors for control flow.

pub mod content;

pub use content::{classify, ContentKind};

use serde_json::Value;

/// Parse a body as JSON, returning `None` when it is not valid JSON
///
/// Surrounding whitespace is accepted; trailing content after the first value
/// is not.
pub fn try_parse_json(body: &str) -> Option<Value> {
    serde_json::from_str(body).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_try_parse_json_valid() {
        assert_eq!(try_parse_json(" {\"a\": 1} "), Some(json!({"a": 1})));
        assert_eq!(try_parse_json("[true, null]"), Some(json!([true, null])));
        assert_eq!(try_parse_json("42"), Some(json!(42)));
    }

    #[test]
    fn test_try_parse_json_invalid() {
        assert_eq!(try_parse_json(""), None);
        assert_eq!(try_parse_json("<html></html>"), None);
        assert_eq!(try_parse_json("{\"a\": 1"), None);
        assert_eq!(try_parse_json("{} {}"), None);
    }
}
