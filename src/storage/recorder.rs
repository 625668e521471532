//! Error artifact persistence
//!
//! Error artifacts are append-only history: an existing error artifact is
//! never overwritten. When the plain name is taken, the new artifact gets an
//! epoch-millisecond prefix instead.

use chrono::Utc;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::models::{FetchFailure, WorkItem};
use crate::storage::naming::{error_artifact_name, timestamped_error_artifact_name};
use crate::utils::error::StorageError;
use crate::utils::{epoch_millis, iso_timestamp};

/// How many timestamped names to try before giving up
const MAX_NAME_ATTEMPTS: i64 = 1000;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorRecord<'a> {
    guid: &'a str,
    error: &'a str,
    error_type: &'static str,
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    cause: Option<&'a str>,
}

/// Writes one error artifact per failed item
pub struct ErrorRecorder {
    output_dir: PathBuf,
}

impl ErrorRecorder {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
        }
    }

    /// Record `failure` for `item`, returning the artifact path
    ///
    /// A write failure is logged and swallowed; `None` is returned.
    pub fn record_error(&self, item: &WorkItem, failure: &FetchFailure) -> Option<PathBuf> {
        match self.try_record(item, failure) {
            Ok(path) => {
                tracing::info!(
                    seq = item.seq(),
                    path = %path.display(),
                    "✓ Saved error details"
                );
                Some(path)
            }
            Err(e) => {
                tracing::error!(seq = item.seq(), error = %e, "Could not save error file");
                None
            }
        }
    }

    fn try_record(&self, item: &WorkItem, failure: &FetchFailure) -> Result<PathBuf, StorageError> {
        let record = ErrorRecord {
            guid: &item.identifier,
            error: &failure.cause,
            error_type: failure.kind.as_str(),
            timestamp: iso_timestamp(Utc::now()),
            cause: failure.detail.as_deref(),
        };
        let content = serde_json::to_vec_pretty(&record)?;

        let primary = self
            .output_dir
            .join(error_artifact_name(&item.identifier, item.index));
        if create_new(&primary, &content)? {
            return Ok(primary);
        }

        let millis = epoch_millis();
        for offset in 0..MAX_NAME_ATTEMPTS {
            let path = self.output_dir.join(timestamped_error_artifact_name(
                &item.identifier,
                item.index,
                millis + offset,
            ));
            if create_new(&path, &content)? {
                return Ok(path);
            }
        }

        Err(StorageError::Exhausted { path: primary })
    }
}

/// Create `path` with `content`; `Ok(false)` when it already exists
fn create_new(path: &Path, content: &[u8]) -> Result<bool, StorageError> {
    let write_err = |source: std::io::Error| StorageError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(write_err(e)),
    };
    file.write_all(content).map_err(write_err)?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FailureKind;
    use tempfile::TempDir;

    fn failure() -> FetchFailure {
        FetchFailure::new(FailureKind::Timeout, "Request timed out")
            .with_detail(Some("operation timed out".to_string()))
    }

    #[test]
    fn test_record_error_contents() {
        let dir = TempDir::new().unwrap();
        let recorder = ErrorRecorder::new(dir.path());
        let item = WorkItem::new(2, "doi:10.1234/x");

        let path = recorder.record_error(&item, &failure()).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "error_response_003_doi_10.1234_x.json"
        );

        let value: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(value["guid"], "doi:10.1234/x");
        assert_eq!(value["error"], "Request timed out");
        assert_eq!(value["errorType"], "timeout");
        assert_eq!(value["cause"], "operation timed out");
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_cause_omitted_when_absent() {
        let dir = TempDir::new().unwrap();
        let recorder = ErrorRecorder::new(dir.path());
        let item = WorkItem::new(0, "g");

        let path = recorder
            .record_error(&item, &FetchFailure::new(FailureKind::Io, "connection refused"))
            .unwrap();
        let value: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert!(value.get("cause").is_none());
    }

    #[test]
    fn test_existing_error_artifact_is_preserved() {
        let dir = TempDir::new().unwrap();
        let recorder = ErrorRecorder::new(dir.path());
        let item = WorkItem::new(0, "g");

        let first = recorder.record_error(&item, &failure()).unwrap();
        let original = std::fs::read(&first).unwrap();

        let second = recorder.record_error(&item, &failure()).unwrap();
        let third = recorder.record_error(&item, &failure()).unwrap();

        assert_ne!(first, second);
        assert_ne!(second, third);
        assert_eq!(std::fs::read(&first).unwrap(), original);

        let name = second.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("error_"));
        assert!(name.ends_with("_error_response_001_g.json"));
    }

    #[test]
    fn test_unwritable_directory_is_swallowed() {
        let dir = TempDir::new().unwrap();
        let recorder = ErrorRecorder::new(&dir.path().join("missing"));
        let item = WorkItem::new(0, "g");

        assert!(recorder.record_error(&item, &failure()).is_none());
    }
}
