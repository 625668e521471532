//! Latency statistics over completed exchanges

use serde::Serialize;
use statrs::statistics::{Data, Max, Median, OrderStatistics, Statistics};

/// Summary of exchange durations in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencySummary {
    pub count: usize,
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub max_ms: f64,
}

impl LatencySummary {
    /// Summarize durations; `None` when there are none
    pub fn from_durations(durations_ms: &[u64]) -> Option<Self> {
        if durations_ms.is_empty() {
            return None;
        }

        let values: Vec<f64> = durations_ms.iter().map(|&d| d as f64).collect();
        let mean_ms = Statistics::mean(values.iter());
        let mut data = Data::new(values);

        Some(Self {
            count: durations_ms.len(),
            mean_ms,
            median_ms: data.median(),
            p95_ms: data.percentile(95),
            max_ms: Max::max(&data),
        })
    }
}
