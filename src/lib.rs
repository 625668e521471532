//! guid-bench - Batch FAIR scoring client
//!
//! Reads a list of persistent identifiers (DOIs, handles, URLs), submits each
//! one to a remote scoring endpoint with bounded parallelism, and persists
//! every response (or failure) as a deterministically named artifact.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`input`] - Identifier list loading and output directory setup
//! - [`scoring`] - Request executor and bounded-parallel batch dispatcher
//! - [`storage`] - Artifact naming, result writer, and error recorder
//! - [`parser`] - Response content classification
//! - [`models`] - Core data structures and types
//! - [`metrics`] - Prometheus counters for a run
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use guid_bench::config::Config;
//! use guid_bench::input::load_identifiers;
//! use guid_bench::scoring::{BatchDispatcher, BatchJob};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let identifiers = load_identifiers(&config.batch.input_file)?;
//!     let dispatcher = BatchDispatcher::from_config(&config)?;
//!     let report = dispatcher.run(BatchJob::new(identifiers)).await;
//!     println!("{} of {} succeeded", report.succeeded(), report.total());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod input;
pub mod metrics;
pub mod models;
pub mod parser;
pub mod scoring;
pub mod storage;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{BenchErrorTrait, Error, ErrorCategory, Result};
    pub use crate::models::{
        BatchState, FailureKind, ItemReport, ItemStatus, OutputFormat, RequestOutcome, WorkItem,
    };
    pub use crate::parser::{classify, ContentKind};
    pub use crate::scoring::{BatchDispatcher, BatchJob, BatchReport, RequestExecutor};
    pub use crate::storage::{ErrorRecorder, ResultWriter};
}

// Direct re-exports for convenience
pub use models::{BatchState, OutputFormat, RequestOutcome, WorkItem};
