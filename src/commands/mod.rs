pub mod plan;
pub mod run;

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use guid_bench::config::{parse_formats, Config};

// Re-export command functions for convenience
pub use plan::plan;
pub use run::run;

/// Command-line values that take precedence over file and environment config
#[derive(Args, Debug, Default)]
pub struct BatchOverrides {
    /// Scoring endpoint URI
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Newline-delimited identifier list
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Directory receiving the artifacts
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Maximum number of identifiers processed concurrently
    #[arg(long)]
    pub pool_width: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub request_timeout: Option<u64>,

    /// Connection establishment timeout in seconds
    #[arg(long)]
    pub connect_timeout: Option<u64>,

    /// Overall batch deadline in seconds
    #[arg(long)]
    pub deadline: Option<u64>,

    /// Output formats (html, raw-json, structured-json); repeatable or comma-separated
    #[arg(short, long, value_delimiter = ',')]
    pub format: Vec<String>,
}

impl BatchOverrides {
    pub fn apply(self, config: &mut Config) -> Result<()> {
        if let Some(endpoint) = self.endpoint {
            config.scoring.endpoint_uri = endpoint;
        }
        if let Some(input) = self.input {
            config.batch.input_file = input;
        }
        if let Some(output_dir) = self.output_dir {
            config.batch.output_dir = output_dir;
        }
        if let Some(pool_width) = self.pool_width {
            config.batch.pool_width = pool_width;
        }
        if let Some(secs) = self.request_timeout {
            config.scoring.request_timeout_secs = secs;
        }
        if let Some(secs) = self.connect_timeout {
            config.scoring.connect_timeout_secs = secs;
        }
        if let Some(secs) = self.deadline {
            config.batch.deadline_secs = secs;
        }
        if !self.format.is_empty() {
            config.batch.formats = parse_formats(&self.format.join(","))?;
        }

        Ok(())
    }
}
