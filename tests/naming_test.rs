//! Property tests for artifact naming

use guid_bench::storage::naming::{artifact_name, error_artifact_name};
use proptest::prelude::*;
use regex::Regex;

fn name_pattern() -> Regex {
    Regex::new(r"^response_\d{3}_[A-Za-z0-9._-]{1,50}\.(html|json|structured\.json)$")
        .expect("Invalid regex pattern")
}

proptest! {
    /// Names are filesystem-safe and bounded for any non-empty identifier
    #[test]
    fn prop_name_shape(identifier in ".{1,200}", index in 0usize..999) {
        let pattern = name_pattern();
        for suffix in ["html", "json", "structured.json"] {
            let name = artifact_name(&identifier, index, suffix);
            prop_assert!(pattern.is_match(&name), "unexpected name {}", name);
            let expected_prefix = format!("response_{:03}_", index + 1);
            prop_assert!(name.starts_with(&expected_prefix));
        }
    }

    /// The same inputs always give the same name
    #[test]
    fn prop_name_is_deterministic(identifier in "\\PC{0,80}", index in 0usize..999) {
        prop_assert_eq!(
            artifact_name(&identifier, index, "json"),
            artifact_name(&identifier, index, "json")
        );
        prop_assert_eq!(
            error_artifact_name(&identifier, index),
            format!("error_{}", artifact_name(&identifier, index, "json"))
        );
    }

    /// Distinct indices never collide, whatever the identifiers
    #[test]
    fn prop_distinct_indices_distinct_names(
        a in "[a-z]{1,10}",
        b in "[a-z]{1,10}",
        i in 0usize..999,
        j in 0usize..999,
    ) {
        prop_assume!(i != j);
        prop_assert_ne!(artifact_name(&a, i, "json"), artifact_name(&b, j, "json"));
    }
}

#[test]
fn test_detail_url_segment() {
    assert_eq!(
        artifact_name("https://catalogue.example.org/detail/abc123/extra?lang=en", 0, "json"),
        "response_001_abc123.json"
    );
    assert_eq!(
        artifact_name("https://catalogue.example.org/detail/abcxyz/?lang=en", 41, "json"),
        "response_042_abcxyz.json"
    );
    assert_eq!(
        artifact_name("https://catalogue.example.org/detail/", 0, "json"),
        "response_001_https___catalogue.example.org_detail_.json"
    );
}
