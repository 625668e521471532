//! Error types for the guid-bench client
//!
//! This module defines the domain-specific error types used throughout the crate.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::FailureKind;

/// Errors that can occur while performing one scoring exchange
#[derive(Error, Debug)]
pub enum FetchError {
    /// Request (or body transfer) exceeded the per-request timeout
    #[error("Request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    /// Transport-level failure (connect, TLS, reset, ...)
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// The response arrived but its body could not be read
    #[error("Failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    /// Request payload could not be encoded
    #[error("Failed to encode request payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// Invalid endpoint URI
    #[error("Invalid endpoint URI: {0}")]
    InvalidUrl(String),

    /// The shared HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err)
        } else {
            Self::Http(err)
        }
    }
}

impl FetchError {
    /// Failure kind recorded in error artifacts
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Timeout(_) => FailureKind::Timeout,
            _ => FailureKind::Io,
        }
    }

    /// Message of the innermost error in the source chain, if there is one
    pub fn root_cause(&self) -> Option<String> {
        let mut current: &dyn std::error::Error = std::error::Error::source(self)?;
        while let Some(next) = current.source() {
            current = next;
        }
        Some(current.to_string())
    }
}

/// Errors that can occur while committing an artifact to disk
#[derive(Error, Debug)]
pub enum StorageError {
    /// Writing the artifact file failed
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rendering the artifact as JSON failed
    #[error("Failed to serialize artifact: {0}")]
    Serialize(#[from] serde_json::Error),

    /// No free error-artifact path could be found
    #[error("No free artifact path next to {path}")]
    Exhausted { path: PathBuf },
}

/// Errors raised by the identifier source and output directory glue
#[derive(Error, Debug)]
pub enum InputError {
    /// The identifier list does not exist
    #[error("Could not find identifier list at {path}")]
    NotFound { path: PathBuf },

    /// The identifier list exists but could not be read
    #[error("Failed to read identifier list {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output directory could not be created
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
