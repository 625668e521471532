use anyhow::{Context, Result};
use std::path::PathBuf;

use guid_bench::input::{ensure_output_directory, load_identifiers};
use guid_bench::metrics;
use guid_bench::prelude::*;
use guid_bench::utils::truncate_text;

pub async fn run(config: Config, metrics_file: Option<PathBuf>) -> Result<()> {
    config.validate().context("Invalid configuration")?;

    // Nothing touches the output directory or the network before the input is read
    let identifiers = match load_identifiers(&config.batch.input_file) {
        Ok(identifiers) => identifiers,
        Err(e) => {
            tracing::error!(
                category = e.category().as_str(),
                recoverable = e.is_recoverable(),
                error = %e,
                "Cannot read identifier list"
            );
            return Err(e).with_context(|| {
                format!(
                    "Failed to load identifiers from {}",
                    config.batch.input_file.display()
                )
            });
        }
    };

    println!("Starting GUID Scoring Batch");
    println!("===========================");
    println!(
        "Loaded {} GUIDs from {}",
        identifiers.len(),
        config.batch.input_file.display()
    );

    if identifiers.is_empty() {
        tracing::warn!(input = %config.batch.input_file.display(), "No GUIDs found");
        println!("No GUIDs found, nothing to do");
        return Ok(());
    }

    if let Err(e) = ensure_output_directory(&config.batch.output_dir) {
        tracing::error!(
            category = e.category().as_str(),
            error = %e,
            "Cannot prepare output directory"
        );
        return Err(e.into());
    }

    if let Err(e) = metrics::init_metrics() {
        tracing::warn!(error = %e, "Continuing without metrics");
    }

    let dispatcher = BatchDispatcher::from_config(&config)?;

    println!("Endpoint: {}", config.scoring.endpoint_uri);
    println!(
        "Pool width: {}, deadline: {}s",
        config.batch.pool_width, config.batch.deadline_secs
    );

    let report = dispatcher.run(BatchJob::new(identifiers)).await;

    print_summary(&report, &config);

    if let Some(path) = metrics_file {
        if metrics::metrics_initialized() {
            metrics::write_metrics(&path)
                .with_context(|| format!("Failed to write metrics to {}", path.display()))?;
            println!("Metrics written to {}", path.display());
        } else {
            tracing::warn!(path = %path.display(), "Metrics unavailable, skipping metrics file");
        }
    }

    Ok(())
}

fn print_summary(report: &BatchReport, config: &Config) {
    println!("\nBatch Summary");
    println!("=============");
    println!(
        "Outcome: {}",
        if report.timed_out() {
            "deadline elapsed"
        } else {
            "all completed"
        }
    );
    println!("Total GUIDs: {}", report.total());
    println!("Succeeded: {}", report.succeeded());
    println!("Failed: {}", report.failed());
    if report.abandoned() > 0 {
        println!("Abandoned at deadline: {}", report.abandoned());
    }
    println!("Elapsed: {:.1}s", report.elapsed.as_secs_f64());
    println!("Output directory: {}", config.batch.output_dir.display());

    if let Some(latency) = &report.latency {
        println!("\nLatency");
        println!("-------");
        println!("Completed exchanges: {}", latency.count);
        println!("Mean: {:.0} ms", latency.mean_ms);
        println!("Median: {:.0} ms", latency.median_ms);
        println!("p95: {:.0} ms", latency.p95_ms);
        println!("Max: {:.0} ms", latency.max_ms);
    }

    let failures: Vec<_> = report
        .items
        .iter()
        .filter_map(|r| match &r.status {
            ItemStatus::Failed { kind, cause, .. } => Some((r, kind, cause)),
            ItemStatus::Succeeded { .. } => None,
        })
        .collect();

    if !failures.is_empty() {
        println!("\nFailures");
        println!("--------");
        for (report, kind, cause) in failures {
            println!(
                "  {:03} {} [{}] {}",
                report.item.seq(),
                report.item.identifier,
                kind,
                truncate_text(cause, 120)
            );
        }
    }
}
