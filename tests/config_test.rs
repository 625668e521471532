//! Tests for config module

use guid_bench::config::{Config, DEFAULT_ENDPOINT};
use guid_bench::models::OutputFormat;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_config_toml_loads_and_validates() {
    let config = Config::from_file(Path::new("config.toml"))
        .expect("config.toml in the project root should parse");

    assert!(config.validate().is_ok());
    assert_eq!(config.scoring.endpoint_uri, DEFAULT_ENDPOINT);
    assert_eq!(config.batch.pool_width, 5);
    assert_eq!(config.batch.formats, vec![OutputFormat::StructuredJson]);
}

#[test]
fn test_partial_file_keeps_defaults() {
    let file = write_config(
        r#"
[batch]
pool_width = 12
formats = ["html", "raw-json"]
"#,
    );

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.batch.pool_width, 12);
    assert_eq!(
        config.batch.formats,
        vec![OutputFormat::Html, OutputFormat::RawJson]
    );
    assert_eq!(config.batch.output_dir, PathBuf::from("results"));
    assert_eq!(config.scoring.request_timeout_secs, 60);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_unknown_format_rejected() {
    let file = write_config(
        r#"
[batch]
formats = ["pdf"]
"#,
    );

    assert!(Config::from_file(file.path()).is_err());
}

#[test]
fn test_missing_file_is_error() {
    let result = Config::from_file(Path::new("/nonexistent/guid-bench.toml"));
    assert!(result.is_err());
}

#[test]
fn test_invalid_values_fail_validation() {
    let file = write_config(
        r#"
[scoring]
endpoint_uri = "file:///etc/passwd"
"#,
    );

    let config = Config::from_file(file.path()).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_format_aliases_accepted_in_file() {
    let file = write_config(
        r#"
[batch]
formats = ["json", "structured", "html"]
"#,
    );

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(
        config.batch.formats,
        vec![
            OutputFormat::RawJson,
            OutputFormat::StructuredJson,
            OutputFormat::Html
        ]
    );
    assert!(config.validate().is_ok());
}
