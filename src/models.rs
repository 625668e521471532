// Core data structures for the guid-bench client

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// One identifier at its position in the input list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// 0-based position in the input sequence
    pub index: usize,

    /// Opaque, non-empty identifier (GUID)
    pub identifier: String,
}

impl WorkItem {
    pub fn new(index: usize, identifier: impl Into<String>) -> Self {
        Self {
            index,
            identifier: identifier.into(),
        }
    }

    /// 1-based sequence number used in artifact names and log lines
    pub fn seq(&self) -> usize {
        self.index + 1
    }
}

/// A completed HTTP exchange, whatever its status code
#[derive(Debug, Clone)]
pub struct ScoringResponse {
    pub status_code: u16,
    pub body: String,
    pub request_start: DateTime<Utc>,
    pub duration_ms: u64,
}

/// Why an exchange could not be completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// Per-request timeout elapsed
    Timeout,
    /// Transport or body-transfer failure
    Io,
    /// Batch deadline elapsed before the exchange finished
    Deadline,
    /// The task processing the item panicked
    Panic,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Io => "io",
            Self::Deadline => "deadline",
            Self::Panic => "panic",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub kind: FailureKind,
    pub cause: String,
    /// Innermost cause, when the error carried one
    pub detail: Option<String>,
}

impl FetchFailure {
    pub fn new(kind: FailureKind, cause: impl Into<String>) -> Self {
        Self {
            kind,
            cause: cause.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: Option<String>) -> Self {
        self.detail = detail;
        self
    }
}

impl From<&crate::utils::error::FetchError> for FetchFailure {
    fn from(err: &crate::utils::error::FetchError) -> Self {
        Self::new(err.kind(), err.to_string()).with_detail(err.root_cause())
    }
}

/// Outcome of attempting one exchange for one identifier
///
/// A non-2xx status is still a `Success`: failure means the exchange could
/// not be completed, not that the server was unhappy.
#[derive(Debug, Clone)]
pub enum RequestOutcome {
    Success(ScoringResponse),
    Failure(FetchFailure),
}

impl RequestOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Output encodings the result writer can materialize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Raw response body, verbatim
    Html,
    /// Body as-is when it is JSON, otherwise wrapped
    #[serde(alias = "json")]
    RawJson,
    /// Always-wrapped record with timing metadata
    #[serde(alias = "structured")]
    StructuredJson,
}

impl OutputFormat {
    /// File suffix appended to the artifact name
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::RawJson => "json",
            Self::StructuredJson => "structured.json",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::RawJson => "raw-json",
            Self::StructuredJson => "structured-json",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![Self::Html, Self::RawJson, Self::StructuredJson]
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "raw-json" | "json" => Ok(Self::RawJson),
            "structured-json" | "structured" => Ok(Self::StructuredJson),
            other => Err(format!(
                "Unknown output format: {other}. Valid: html, raw-json, structured-json"
            )),
        }
    }
}

/// Lifecycle of one batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchState {
    Created,
    Running,
    AllCompleted,
    TimedOut,
    Done,
}

impl BatchState {
    /// Whether moving to `next` is a legal transition
    pub fn can_transition_to(&self, next: BatchState) -> bool {
        matches!(
            (self, next),
            (Self::Created, Self::Running)
                | (Self::Running, Self::AllCompleted)
                | (Self::Running, Self::TimedOut)
                | (Self::AllCompleted, Self::Done)
                | (Self::TimedOut, Self::Done)
        )
    }
}

/// What happened to one item by the end of the batch
#[derive(Debug, Clone)]
pub enum ItemStatus {
    /// Exchange completed; artifacts written for the formats that succeeded
    Succeeded {
        status_code: u16,
        duration_ms: u64,
        artifacts: Vec<PathBuf>,
        write_failures: usize,
    },
    /// Exchange failed; an error artifact was written unless that also failed
    Failed {
        kind: FailureKind,
        cause: String,
        error_artifact: Option<PathBuf>,
    },
}

/// Per-item entry of a batch report
#[derive(Debug, Clone)]
pub struct ItemReport {
    pub item: WorkItem,
    pub status: ItemStatus,
}

impl ItemReport {
    pub fn is_success(&self) -> bool {
        matches!(self.status, ItemStatus::Succeeded { .. })
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match &self.status {
            ItemStatus::Failed { kind, .. } => Some(*kind),
            ItemStatus::Succeeded { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_item_seq() {
        let item = WorkItem::new(0, "guid");
        assert_eq!(item.seq(), 1);
        assert_eq!(WorkItem::new(41, "x").seq(), 42);
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("html".parse::<OutputFormat>(), Ok(OutputFormat::Html));
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::RawJson));
        assert_eq!(
            "Structured-JSON".parse::<OutputFormat>(),
            Ok(OutputFormat::StructuredJson)
        );
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_output_format_suffix() {
        assert_eq!(OutputFormat::Html.suffix(), "html");
        assert_eq!(OutputFormat::RawJson.suffix(), "json");
        assert_eq!(OutputFormat::StructuredJson.suffix(), "structured.json");
    }

    #[test]
    fn test_output_format_serde() {
        let json = serde_json::to_string(&OutputFormat::StructuredJson).unwrap();
        assert_eq!(json, "\"structured-json\"");
        let parsed: OutputFormat = serde_json::from_str("\"raw-json\"").unwrap();
        assert_eq!(parsed, OutputFormat::RawJson);
    }

    #[test]
    fn test_batch_state_transitions() {
        assert!(BatchState::Created.can_transition_to(BatchState::Running));
        assert!(BatchState::Running.can_transition_to(BatchState::TimedOut));
        assert!(BatchState::TimedOut.can_transition_to(BatchState::Done));
        assert!(!BatchState::Created.can_transition_to(BatchState::Done));
        assert!(!BatchState::Done.can_transition_to(BatchState::Running));
    }

    #[test]
    fn test_failure_kind_display() {
        assert_eq!(FailureKind::Timeout.to_string(), "timeout");
        assert_eq!(FailureKind::Io.as_str(), "io");
    }
}
