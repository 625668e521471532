//! Configuration management for the guid-bench client
//!
//! This module handles loading and validating configuration from environment variables,
//! files, and command-line arguments. A [`Config`] is built once per invocation and
//! passed by reference; nothing here is process-global.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};
use crate::models::OutputFormat;

/// Default scoring endpoint (OSTrails champion algorithm assessment)
pub const DEFAULT_ENDPOINT: &str = "https://tools.ostrails.eu/champion/assess/algorithm/1Nk0vM4yBpVQTo_UbB62NY_fz93aRZRHBZGh5fG-khOw";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scoring endpoint configuration
    pub scoring: ScoringConfig,

    /// Batch configuration
    pub batch: BatchConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Scoring endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Endpoint every identifier is POSTed to
    pub endpoint_uri: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Connection establishment timeout in seconds
    pub connect_timeout_secs: u64,
}

/// Batch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Newline-delimited identifier list
    pub input_file: PathBuf,

    /// Directory receiving the artifacts
    pub output_dir: PathBuf,

    /// Maximum number of identifiers processed concurrently
    pub pool_width: usize,

    /// Overall deadline for the batch in seconds
    pub deadline_secs: u64,

    /// Enabled output formats
    pub formats: Vec<OutputFormat>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            endpoint_uri: String::from(DEFAULT_ENDPOINT),
            request_timeout_secs: 60,
            connect_timeout_secs: 30,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_file: PathBuf::from("guids.txt"),
            output_dir: PathBuf::from("results"),
            pool_width: 5,
            deadline_secs: 600,
            formats: vec![OutputFormat::StructuredJson],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

/// Read and parse an environment variable, ignoring unset or unparsable values
fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

impl Config {
    /// Load configuration from environment variables over the defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let endpoint_uri =
            std::env::var("GUID_BENCH_ENDPOINT").unwrap_or(defaults.scoring.endpoint_uri);

        let request_timeout_secs = env_parse("GUID_BENCH_REQUEST_TIMEOUT")
            .unwrap_or(defaults.scoring.request_timeout_secs);

        let connect_timeout_secs = env_parse("GUID_BENCH_CONNECT_TIMEOUT")
            .unwrap_or(defaults.scoring.connect_timeout_secs);

        let input_file = std::env::var("GUID_BENCH_INPUT_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.batch.input_file);

        let output_dir = std::env::var("GUID_BENCH_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.batch.output_dir);

        let pool_width = env_parse("GUID_BENCH_POOL_WIDTH").unwrap_or(defaults.batch.pool_width);

        let deadline_secs =
            env_parse("GUID_BENCH_DEADLINE").unwrap_or(defaults.batch.deadline_secs);

        let formats = match std::env::var("GUID_BENCH_FORMATS") {
            Ok(value) => parse_formats(&value)?,
            Err(_) => defaults.batch.formats,
        };

        let level = std::env::var("GUID_BENCH_LOG_LEVEL").unwrap_or(defaults.logging.level);

        let format = std::env::var("GUID_BENCH_LOG_FORMAT").unwrap_or(defaults.logging.format);

        Ok(Self {
            scoring: ScoringConfig {
                endpoint_uri,
                request_timeout_secs,
                connect_timeout_secs,
            },
            batch: BatchConfig {
                input_file,
                output_dir,
                pool_width,
                deadline_secs,
                formats,
            },
            logging: LoggingConfig { level, format },
        })
    }

    /// Load configuration from a TOML file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::with_source(format!("Failed to read config file: {}", path.display()), e)
        })?;

        toml::from_str(&content).map_err(|e| {
            Error::with_source(
                format!("Failed to parse TOML config file: {}", path.display()),
                e,
            )
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.batch.pool_width == 0 {
            return Err(Error::config("pool_width must be greater than 0"));
        }

        if self.scoring.request_timeout_secs == 0 || self.scoring.connect_timeout_secs == 0 {
            return Err(Error::config("timeouts must be greater than 0"));
        }

        if self.batch.deadline_secs == 0 {
            return Err(Error::config("deadline_secs must be greater than 0"));
        }

        if self.batch.formats.is_empty() {
            return Err(Error::config("at least one output format must be enabled"));
        }

        let url = Url::parse(&self.scoring.endpoint_uri).map_err(|e| {
            Error::config(format!(
                "invalid endpoint_uri {}: {e}",
                self.scoring.endpoint_uri
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "endpoint_uri must use http or https, got {}",
                url.scheme()
            )));
        }

        Ok(())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.scoring.request_timeout_secs)
    }

    /// Get connect timeout as Duration
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.scoring.connect_timeout_secs)
    }

    /// Get overall batch deadline as Duration
    #[must_use]
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.batch.deadline_secs)
    }
}

/// Parse a comma-separated list of output formats, dropping duplicates
pub fn parse_formats(value: &str) -> Result<Vec<OutputFormat>> {
    let mut formats = Vec::new();
    for token in value.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let format = token.parse::<OutputFormat>().map_err(Error::config)?;
        if !formats.contains(&format) {
            formats.push(format);
        }
    }
    Ok(formats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.batch.pool_width, 5);
        assert_eq!(config.batch.formats, vec![OutputFormat::StructuredJson]);
    }

    #[test]
    fn test_invalid_pool_width() {
        let mut config = Config::default();
        config.batch.pool_width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_formats_rejected() {
        let mut config = Config::default();
        config.batch.formats.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_endpoint_must_be_http() {
        let mut config = Config::default();
        config.scoring.endpoint_uri = String::from("ftp://example.org/score");
        assert!(config.validate().is_err());

        config.scoring.endpoint_uri = String::from("not a url");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duration_conversions() {
        let config = Config::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
        assert_eq!(config.connect_timeout(), Duration::from_secs(30));
        assert_eq!(config.deadline(), Duration::from_secs(600));
    }

    #[test]
    fn test_parse_formats() {
        assert_eq!(
            parse_formats("json, structured-json,json").unwrap(),
            vec![OutputFormat::RawJson, OutputFormat::StructuredJson]
        );
        assert!(parse_formats("json,pdf").is_err());
        assert!(parse_formats("").unwrap().is_empty());
    }
}
