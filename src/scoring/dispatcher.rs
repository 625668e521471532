//! Bounded-parallel batch dispatcher
//!
//! Fans a batch of identifiers out over a fixed-width pool of tasks, routes
//! each outcome to the result writer or the error recorder, and waits for
//! completion up to an overall deadline.
//!
//! # Lifecycle
//!
//! ```text
//! Created ──▶ Running ──┬──▶ AllCompleted ──┬──▶ Done
//!                       └──▶ TimedOut ──────┘
//! ```
//!
//! Every item ends with exactly one outcome. When the deadline elapses,
//! outstanding tasks are aborted (tokio aborts only at await points, and file
//! writes are synchronous, so no artifact is ever half-written) and each
//! abandoned item receives a `deadline` error artifact. A panic inside one item
//! is caught at the task boundary and recorded as a `panic` failure.
//!
//! # Example
//!
//! ```no_run
//! use guid_bench::config::Config;
//! use guid_bench::scoring::{BatchDispatcher, BatchJob};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::default();
//! let dispatcher = BatchDispatcher::from_config(&config)?;
//!
//! let job = BatchJob::new(vec!["doi:10.1234/abc".to_string()]);
//! let report = dispatcher.run(job).await;
//!
//! println!("Succeeded: {}", report.succeeded());
//! # Ok(())
//! # }
//! ```

use futures::FutureExt;
use std::any::Any;
use std::collections::BTreeMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::Config;
use crate::metrics;
use crate::models::{
    BatchState, FailureKind, FetchFailure, ItemReport, ItemStatus, OutputFormat, RequestOutcome,
    WorkItem,
};
use crate::scoring::executor::RequestExecutor;
use crate::scoring::summary::LatencySummary;
use crate::storage::{ErrorRecorder, ResultWriter};

// ============================================================================
// Configuration
// ============================================================================

/// Dispatcher configuration
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Maximum number of items processed concurrently
    pub pool_width: usize,

    /// Overall deadline for the batch
    pub deadline: Duration,

    /// Enabled output formats, without duplicates
    pub formats: Vec<OutputFormat>,
}

impl DispatchConfig {
    pub fn from_config(config: &Config) -> Self {
        let mut formats: Vec<OutputFormat> = Vec::with_capacity(config.batch.formats.len());
        for &format in &config.batch.formats {
            if !formats.contains(&format) {
                formats.push(format);
            }
        }

        Self {
            pool_width: config.batch.pool_width,
            deadline: config.deadline(),
            formats,
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

// ============================================================================
// Job and Report
// ============================================================================

/// One batch run: identifiers paired with their input positions
#[derive(Debug, Clone, Default)]
pub struct BatchJob {
    items: Vec<WorkItem>,
}

impl BatchJob {
    pub fn new(identifiers: impl IntoIterator<Item = String>) -> Self {
        let items = identifiers
            .into_iter()
            .enumerate()
            .map(|(index, identifier)| WorkItem::new(index, identifier))
            .collect();
        Self { items }
    }

    pub fn items(&self) -> &[WorkItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Final account of a batch run
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// `AllCompleted` or `TimedOut`
    pub state: BatchState,

    /// One entry per input item, ordered by index
    pub items: Vec<ItemReport>,

    /// Wall time from start to `Done`
    pub elapsed: Duration,

    /// Latency over completed exchanges
    pub latency: Option<LatencySummary>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.items.iter().filter(|r| !r.is_success()).count()
    }

    /// Items that were still outstanding at the deadline
    pub fn abandoned(&self) -> usize {
        self.items
            .iter()
            .filter(|r| r.failure_kind() == Some(FailureKind::Deadline))
            .count()
    }

    pub fn timed_out(&self) -> bool {
        self.state == BatchState::TimedOut
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Everything a task needs to process one item
struct WorkerContext {
    executor: RequestExecutor,
    writer: ResultWriter,
    recorder: ErrorRecorder,
    formats: Vec<OutputFormat>,
}

impl WorkerContext {
    async fn process(&self, item: &WorkItem) -> ItemReport {
        tracing::info!(seq = item.seq(), guid = %item.identifier, "Processing GUID");

        match self.executor.execute(&item.identifier).await {
            RequestOutcome::Success(response) => {
                metrics::record_response(response.status_code, response.duration_ms);
                let summary = self.writer.write(item, &response, &self.formats);

                tracing::info!(
                    seq = item.seq(),
                    status = response.status_code,
                    duration_ms = response.duration_ms,
                    "Scoring exchange completed"
                );

                ItemReport {
                    item: item.clone(),
                    status: ItemStatus::Succeeded {
                        status_code: response.status_code,
                        duration_ms: response.duration_ms,
                        artifacts: summary.written,
                        write_failures: summary.failed.len(),
                    },
                }
            }
            RequestOutcome::Failure(failure) => {
                tracing::error!(
                    seq = item.seq(),
                    guid = %item.identifier,
                    kind = %failure.kind,
                    cause = %failure.cause,
                    "✗ Failed to process GUID"
                );
                self.fail(item, failure)
            }
        }
    }

    fn fail(&self, item: &WorkItem, failure: FetchFailure) -> ItemReport {
        metrics::record_failure(failure.kind);
        let error_artifact = self.recorder.record_error(item, &failure);

        ItemReport {
            item: item.clone(),
            status: ItemStatus::Failed {
                kind: failure.kind,
                cause: failure.cause,
                error_artifact,
            },
        }
    }
}

/// Fans a batch out over a bounded pool of tasks
pub struct BatchDispatcher {
    context: Arc<WorkerContext>,
    config: DispatchConfig,
}

impl BatchDispatcher {
    /// Create a dispatcher from its collaborators
    pub fn new(
        executor: RequestExecutor,
        writer: ResultWriter,
        recorder: ErrorRecorder,
        config: DispatchConfig,
    ) -> Self {
        let context = WorkerContext {
            executor,
            writer,
            recorder,
            formats: config.formats.clone(),
        };

        Self {
            context: Arc::new(context),
            config,
        }
    }

    /// Create a dispatcher writing into `config.batch.output_dir`
    pub fn from_config(config: &Config) -> crate::error::Result<Self> {
        config.validate()?;

        let executor = RequestExecutor::new(config)?;
        let writer = ResultWriter::new(&config.batch.output_dir, executor.endpoint());
        let recorder = ErrorRecorder::new(&config.batch.output_dir);

        Ok(Self::new(
            executor,
            writer,
            recorder,
            DispatchConfig::from_config(config),
        ))
    }

    /// Run a batch to completion or until the deadline
    ///
    /// The workers live inside the returned future. Dropping it before it
    /// resolves (for example from a `select!` on Ctrl-C) aborts every
    /// in-flight request, and outstanding items get no artifact at all.
    pub async fn run(&self, job: BatchJob) -> BatchReport {
        let started = Instant::now();
        let total = job.len();
        let mut state = BatchState::Created;

        transition(&mut state, BatchState::Running);
        tracing::info!(
            total,
            pool_width = self.config.pool_width,
            deadline_secs = self.config.deadline.as_secs(),
            formats = ?self.config.formats,
            "Starting batch"
        );

        let deadline = tokio::time::Instant::now() + self.config.deadline;
        let semaphore = Arc::new(Semaphore::new(self.config.pool_width.max(1)));
        let mut tasks = JoinSet::new();
        let mut pending: BTreeMap<usize, WorkItem> = BTreeMap::new();

        for item in job.items {
            pending.insert(item.index, item.clone());
            tasks.spawn(run_item(
                Arc::clone(&self.context),
                Arc::clone(&semaphore),
                item,
            ));
        }

        tracing::info!("Waiting for all tasks to complete...");

        let mut reports = Vec::with_capacity(total);
        let mut timed_out = false;

        loop {
            match tokio::time::timeout_at(deadline, tasks.join_next()).await {
                Ok(Some(Ok(report))) => {
                    pending.remove(&report.item.index);
                    reports.push(report);
                    tracing::debug!(completed = reports.len(), total, "Item finished");
                }
                Ok(Some(Err(e))) => {
                    tracing::error!(error = %e, "Task ended abnormally");
                }
                Ok(None) => break,
                Err(_) => {
                    timed_out = true;
                    break;
                }
            }
        }

        if timed_out {
            transition(&mut state, BatchState::TimedOut);
            tracing::error!(
                outstanding = pending.len(),
                "Some tasks did not complete in time!"
            );

            tasks.abort_all();
            while let Some(result) = tasks.join_next().await {
                if let Ok(report) = result {
                    pending.remove(&report.item.index);
                    reports.push(report);
                }
            }
            metrics::record_abandoned(pending.len());
        } else {
            transition(&mut state, BatchState::AllCompleted);
            tracing::info!("All tasks completed successfully.");
        }

        // Whatever is left never produced a report: abandoned at the deadline
        // or lost to an abnormal task exit.
        let kind = if timed_out {
            FailureKind::Deadline
        } else {
            FailureKind::Panic
        };
        for item in pending.into_values() {
            let cause = match kind {
                FailureKind::Deadline => format!(
                    "Batch deadline of {}s elapsed before the request completed",
                    self.config.deadline.as_secs()
                ),
                _ => String::from("Task ended without producing an outcome"),
            };
            reports.push(self.context.fail(&item, FetchFailure::new(kind, cause)));
        }

        reports.sort_by_key(|r| r.item.index);

        let durations: Vec<u64> = reports
            .iter()
            .filter_map(|r| match r.status {
                ItemStatus::Succeeded { duration_ms, .. } => Some(duration_ms),
                ItemStatus::Failed { .. } => None,
            })
            .collect();

        let report = BatchReport {
            state,
            items: reports,
            elapsed: started.elapsed(),
            latency: LatencySummary::from_durations(&durations),
        };

        transition(&mut state, BatchState::Done);
        tracing::info!(
            total = report.total(),
            succeeded = report.succeeded(),
            failed = report.failed(),
            abandoned = report.abandoned(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Batch finished"
        );

        report
    }
}

/// Process one item under a pool permit, turning a panic into a failure
async fn run_item(
    context: Arc<WorkerContext>,
    semaphore: Arc<Semaphore>,
    item: WorkItem,
) -> ItemReport {
    let _permit = match semaphore.acquire_owned().await {
        Ok(permit) => permit,
        Err(e) => {
            return context.fail(
                &item,
                FetchFailure::new(FailureKind::Io, format!("Worker pool unavailable: {e}")),
            );
        }
    };

    isolate_panic(&context, &item, context.process(&item)).await
}

/// Await `work`, recording a panic inside it as a failure of `item`
async fn isolate_panic<F>(context: &WorkerContext, item: &WorkItem, work: F) -> ItemReport
where
    F: Future<Output = ItemReport>,
{
    match AssertUnwindSafe(work).catch_unwind().await {
        Ok(report) => report,
        Err(panic) => {
            let cause = panic_message(panic.as_ref());
            tracing::error!(seq = item.seq(), cause = %cause, "Task panicked");
            context.fail(item, FetchFailure::new(FailureKind::Panic, cause))
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        String::from("Task panicked")
    }
}

fn transition(state: &mut BatchState, next: BatchState) {
    debug_assert!(
        state.can_transition_to(next),
        "illegal batch transition {state:?} -> {next:?}"
    );
    tracing::debug!(from = ?*state, to = ?next, "Batch state transition");
    *state = next;
}
