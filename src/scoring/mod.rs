//! Scoring: request execution and batch dispatch
//!
//! - [`executor`] - one HTTP exchange per identifier
//! - [`dispatcher`] - bounded-parallel fan-out of a whole batch
//! - [`summary`] - latency statistics for the batch report

pub mod dispatcher;
pub mod executor;
pub mod summary;

pub use dispatcher::{BatchDispatcher, BatchJob, BatchReport, DispatchConfig};
pub use executor::RequestExecutor;
pub use summary::LatencySummary;

use serde::Serialize;

/// JSON payload POSTed for each identifier
#[derive(Debug, Serialize)]
pub struct ScoringRequest<'a> {
    pub guid: &'a str,
    pub url: &'a str,
}
