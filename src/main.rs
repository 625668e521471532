use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use guid_bench::config::Config;

mod commands;

use commands::BatchOverrides;

#[derive(Parser)]
#[command(
    name = "guid-bench",
    version,
    about = "Batch FAIR scoring client: POST each identifier to a scoring endpoint and keep every response",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); overrides the configured format
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// TOML configuration file; environment variables are used otherwise
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score every identifier in the input file
    Run {
        #[command(flatten)]
        overrides: BatchOverrides,

        /// Write Prometheus metrics for the run to this file
        #[arg(long)]
        metrics_file: Option<PathBuf>,
    },

    /// List the artifacts a run would write, without sending requests
    Plan {
        /// Newline-delimited identifier list
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output formats (html, raw-json, structured-json); repeatable or comma-separated
        #[arg(short, long, value_delimiter = ',')]
        format: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::from_env().context("Failed to load config from environment")?,
    };
    if let Some(format) = &cli.log_format {
        config.logging.format = format.clone();
    }

    setup_tracing(&config.logging.level, &config.logging.format, cli.verbose)?;

    tracing::info!("guid-bench starting");

    match cli.command {
        Commands::Run {
            overrides,
            metrics_file,
        } => {
            overrides.apply(&mut config)?;
            tracing::info!(
                endpoint = %config.scoring.endpoint_uri,
                input = %config.batch.input_file.display(),
                output_dir = %config.batch.output_dir.display(),
                "Starting run command"
            );
            commands::run(config, metrics_file).await?;
        }

        Commands::Plan { input, format } => {
            let overrides = BatchOverrides {
                input,
                format,
                ..BatchOverrides::default()
            };
            overrides.apply(&mut config)?;
            tracing::info!(
                input = %config.batch.input_file.display(),
                "Starting plan command"
            );
            commands::plan(&config)?;
        }
    }

    tracing::info!("guid-bench completed");
    Ok(())
}

fn setup_tracing(level: &str, format: &str, verbose: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("guid_bench=debug,info")
        } else {
            EnvFilter::new(format!("guid_bench={level},warn"))
        }
    });

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()?;
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init()?;
        }
    }

    Ok(())
}
