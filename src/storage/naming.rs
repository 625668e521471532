//! Deterministic artifact naming
//!
//! Artifact names are a pure function of `(identifier, index, suffix)`:
//! `response_{seq:03}_{name}.{suffix}` where `seq` is the 1-based position and
//! `name` is a filesystem-safe form of the identifier. The sequence prefix keeps
//! two items apart even when their sanitized names coincide.

use crate::utils::sanitize_filename;

/// Path marker after which a catalogue URL carries its record id
const DETAIL_MARKER: &str = "/detail/";

/// Maximum length of the sanitized identifier part
const MAX_NAME_LEN: usize = 50;

/// Prefix of error artifacts
pub const ERROR_PREFIX: &str = "error_";

/// Build the artifact name for an identifier at `index`
///
/// # Examples
///
/// ```
/// use guid_bench::storage::naming::artifact_name;
///
/// assert_eq!(
///     artifact_name("simple-guid-123", 5, "html"),
///     "response_006_simple-guid-123.html"
/// );
/// ```
pub fn artifact_name(identifier: &str, index: usize, suffix: &str) -> String {
    let sanitized = sanitize_filename(name_segment(identifier), MAX_NAME_LEN);
    format!("response_{:03}_{sanitized}.{suffix}", index + 1)
}

/// Build the error artifact name for an identifier at `index`
pub fn error_artifact_name(identifier: &str, index: usize) -> String {
    format!("{ERROR_PREFIX}{}", artifact_name(identifier, index, "json"))
}

/// Timestamp-prefixed variant used when `error_artifact_name` is taken
pub fn timestamped_error_artifact_name(identifier: &str, index: usize, millis: i64) -> String {
    format!(
        "{ERROR_PREFIX}{millis}_{}",
        error_artifact_name(identifier, index)
    )
}

/// Pick the part of the identifier that names the artifact
///
/// For `.../detail/<id>/...?query` this is `<id>`. An identifier without the
/// marker, or with nothing after it, is used whole.
fn name_segment(identifier: &str) -> &str {
    let Some(pos) = identifier.find(DETAIL_MARKER) else {
        return identifier;
    };

    let rest = &identifier[pos + DETAIL_MARKER.len()..];
    let end = rest.find(['/', '?']).unwrap_or(rest.len());
    let segment = &rest[..end];

    if segment.is_empty() {
        identifier
    } else {
        segment
    }
}
