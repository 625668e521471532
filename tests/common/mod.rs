//! Common test utilities

use std::path::Path;
use std::time::Duration;

use guid_bench::models::OutputFormat;
use guid_bench::scoring::{BatchDispatcher, DispatchConfig, RequestExecutor};
use guid_bench::storage::{ErrorRecorder, ResultWriter};

/// Build a dispatcher against `endpoint` writing into `dir`
#[allow(dead_code)]
pub fn dispatcher(
    endpoint: &str,
    dir: &Path,
    pool_width: usize,
    request_timeout: Duration,
    deadline: Duration,
    formats: Vec<OutputFormat>,
) -> BatchDispatcher {
    let executor =
        RequestExecutor::with_timeouts(endpoint, request_timeout, Duration::from_secs(5)).unwrap();
    let writer = ResultWriter::new(dir, executor.endpoint());
    let recorder = ErrorRecorder::new(dir);

    BatchDispatcher::new(
        executor,
        writer,
        recorder,
        DispatchConfig {
            pool_width,
            deadline,
            formats,
        },
    )
}

/// Sorted file names in `dir`
#[allow(dead_code)]
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Parse a JSON artifact
#[allow(dead_code)]
pub fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}
