//! Artifact storage
//!
//! Per-item outcomes are materialized as flat files in one output directory:
//!
//! - [`naming`] - deterministic, collision-free artifact names
//! - [`writer`] - success artifacts in each enabled format (overwritten on re-run)
//! - [`recorder`] - error artifacts (append-only, never overwritten)
//!
//! Workers never share a path: every name carries the item's sequence number,
//! so concurrent writes need no locking.

pub mod naming;
pub mod recorder;
pub mod writer;

pub use naming::{artifact_name, error_artifact_name};
pub use recorder::ErrorRecorder;
pub use writer::{ResultWriter, WriteSummary};
