//! Success artifact rendering and persistence
//!
//! Each enabled output format is rendered and written on its own; a failure
//! in one format is logged and does not stop the others. Success artifacts
//! are overwritten on re-run.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::metrics;
use crate::models::{OutputFormat, ScoringResponse, WorkItem};
use crate::parser::{classify, try_parse_json, ContentKind};
use crate::storage::naming::artifact_name;
use crate::utils::error::StorageError;
use crate::utils::iso_timestamp;

/// Wrapper written by the raw-JSON format when the body is not JSON
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WrappedBody<'a> {
    guid: &'a str,
    status_code: u16,
    response_type: &'static str,
    content: &'a str,
    timestamp: String,
}

/// Record written by the structured-JSON format
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StructuredRecord<'a> {
    guid: &'a str,
    status_code: u16,
    request_timestamp: String,
    response_timestamp: String,
    processing_time_ms: u64,
    content_type: ContentKind,
    response: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_error: Option<String>,
    request_details: RequestDetails<'a>,
}

#[derive(Debug, Serialize)]
struct RequestDetails<'a> {
    endpoint: &'a str,
    method: &'static str,
}

/// Result of writing one item's artifacts
#[derive(Debug, Default)]
pub struct WriteSummary {
    /// Paths of artifacts written successfully
    pub written: Vec<PathBuf>,

    /// Formats whose artifact could not be written
    pub failed: Vec<OutputFormat>,
}

/// Writes successful exchanges in every enabled format
pub struct ResultWriter {
    output_dir: PathBuf,
    endpoint: String,
}

impl ResultWriter {
    /// Create a writer for `output_dir`; `endpoint` is recorded in structured artifacts
    pub fn new(output_dir: &Path, endpoint: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            endpoint: endpoint.into(),
        }
    }

    /// Write `response` for `item` in each of `formats`
    ///
    /// Never fails: write errors are logged, counted, and reported in the summary.
    pub fn write(
        &self,
        item: &WorkItem,
        response: &ScoringResponse,
        formats: &[OutputFormat],
    ) -> WriteSummary {
        let mut summary = WriteSummary::default();

        for &format in formats {
            match self.write_format(format, item, response) {
                Ok(path) => {
                    tracing::info!(
                        seq = item.seq(),
                        format = %format,
                        path = %path.display(),
                        "✓ Saved response"
                    );
                    metrics::record_artifact_written(format);
                    summary.written.push(path);
                }
                Err(e) => {
                    tracing::error!(
                        seq = item.seq(),
                        format = %format,
                        error = %e,
                        "✗ Failed to save response"
                    );
                    metrics::record_artifact_write_failure(format);
                    summary.failed.push(format);
                }
            }
        }

        summary
    }

    /// Path the artifact for `item` in `format` is written to
    pub fn artifact_path(&self, item: &WorkItem, format: OutputFormat) -> PathBuf {
        self.output_dir
            .join(artifact_name(&item.identifier, item.index, format.suffix()))
    }

    /// Render the artifact bytes for one format
    pub fn render(
        &self,
        format: OutputFormat,
        item: &WorkItem,
        response: &ScoringResponse,
    ) -> Result<Vec<u8>, StorageError> {
        match format {
            OutputFormat::Html => Ok(response.body.as_bytes().to_vec()),
            OutputFormat::RawJson => render_raw_json(item, response),
            OutputFormat::StructuredJson => self.render_structured(item, response),
        }
    }

    fn write_format(
        &self,
        format: OutputFormat,
        item: &WorkItem,
        response: &ScoringResponse,
    ) -> Result<PathBuf, StorageError> {
        let content = self.render(format, item, response)?;
        let path = self.artifact_path(item, format);

        let mut file = File::create(&path).map_err(|source| StorageError::Write {
            path: path.clone(),
            source,
        })?;
        file.write_all(&content)
            .map_err(|source| StorageError::Write {
                path: path.clone(),
                source,
            })?;

        Ok(path)
    }

    fn render_structured(
        &self,
        item: &WorkItem,
        response: &ScoringResponse,
    ) -> Result<Vec<u8>, StorageError> {
        let content_type = classify(&response.body);

        let (body, parse_error) = if content_type == ContentKind::Json {
            match serde_json::from_str::<Value>(&response.body) {
                Ok(value) => (value, None),
                Err(e) => (Value::String(response.body.clone()), Some(e.to_string())),
            }
        } else {
            (Value::String(response.body.clone()), None)
        };

        let record = StructuredRecord {
            guid: &item.identifier,
            status_code: response.status_code,
            request_timestamp: iso_timestamp(response.request_start),
            response_timestamp: iso_timestamp(Utc::now()),
            processing_time_ms: response.duration_ms,
            content_type,
            response: body,
            parse_error,
            request_details: RequestDetails {
                endpoint: &self.endpoint,
                method: "POST",
            },
        };

        Ok(serde_json::to_vec_pretty(&record)?)
    }
}

/// Body verbatim when it is JSON, otherwise a pretty-printed wrapper
fn render_raw_json(item: &WorkItem, response: &ScoringResponse) -> Result<Vec<u8>, StorageError> {
    if try_parse_json(&response.body).is_some() {
        return Ok(response.body.as_bytes().to_vec());
    }

    let wrapper = WrappedBody {
        guid: &item.identifier,
        status_code: response.status_code,
        response_type: "html",
        content: &response.body,
        timestamp: iso_timestamp(Utc::now()),
    };

    Ok(serde_json::to_vec_pretty(&wrapper)?)
}
