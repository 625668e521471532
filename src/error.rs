//! Unified error handling for the guid-bench crate
//!
//! This module provides a unified error type that consolidates all domain-specific
//! errors into a single `Error` enum, while maintaining the ability to use
//! domain-specific errors when needed.
//!
//! # Architecture
//!
//! - [`BenchErrorTrait`] - Common interface implemented by all error types
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping all domain-specific errors
//!
//! Only [`InputError::NotFound`] is fatal to a whole run. Everything raised
//! while processing a single identifier stays with that identifier.

use std::io;
use thiserror::Error;

pub use crate::utils::error::{FetchError, InputError, StorageError};

/// Common trait for all guid-bench error types
pub trait BenchErrorTrait: std::error::Error {
    /// Check if this error is transient (a later run may succeed)
    fn is_recoverable(&self) -> bool;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Identifier list and output directory errors
    Input,
    /// Network-related errors (transport, timeout)
    Network,
    /// Artifact write errors
    Storage,
    /// Configuration and validation errors
    Config,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Short lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Network => "network",
            Self::Storage => "storage",
            Self::Config => "config",
            Self::Other => "other",
        }
    }
}

impl BenchErrorTrait for FetchError {
    fn is_recoverable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Http(_) | Self::Body(_))
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidUrl(_) => ErrorCategory::Config,
            _ => ErrorCategory::Network,
        }
    }
}

impl BenchErrorTrait for StorageError {
    fn is_recoverable(&self) -> bool {
        matches!(self, Self::Write { .. })
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Storage
    }
}

impl BenchErrorTrait for InputError {
    fn is_recoverable(&self) -> bool {
        false
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Input
    }
}

/// Unified error type for the guid-bench crate
#[derive(Error, Debug)]
pub enum Error {
    /// Identifier source errors
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Scoring exchange errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Artifact storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}")]
    Other {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl BenchErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Input(e) => e.is_recoverable(),
            Self::Fetch(e) => e.is_recoverable(),
            Self::Storage(e) => e.is_recoverable(),
            Self::Io(_) => true,
            Self::Config(_) => false,
            Self::Other { .. } => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Input(e) => e.category(),
            Self::Fetch(e) => e.category(),
            Self::Storage(e) => e.category(),
            Self::Io(_) => ErrorCategory::Storage,
            Self::Config(_) => ErrorCategory::Config,
            Self::Other { .. } => ErrorCategory::Other,
        }
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a generic error with context
    pub fn other(context: impl Into<String>) -> Self {
        Self::Other {
            context: context.into(),
            source: None,
        }
    }

    /// Create a generic error with context and source
    pub fn with_source(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Other {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_error_category() {
        let input_err = Error::Input(InputError::NotFound {
            path: PathBuf::from("guids.txt"),
        });
        assert_eq!(input_err.category(), ErrorCategory::Input);

        let url_err = Error::Fetch(FetchError::InvalidUrl("::".to_string()));
        assert_eq!(url_err.category(), ErrorCategory::Config);
    }

    #[test]
    fn test_missing_input_is_not_recoverable() {
        let err: Error = InputError::NotFound {
            path: PathBuf::from("guids.txt"),
        }
        .into();
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("guids.txt"));
    }

    #[test]
    fn test_storage_write_is_recoverable() {
        let err: Error = StorageError::Write {
            path: PathBuf::from("results/x.json"),
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        }
        .into();
        assert!(err.is_recoverable());
        assert_eq!(err.category(), ErrorCategory::Storage);
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("pool_width must be greater than 0");
        assert_eq!(err.category(), ErrorCategory::Config);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_other_error() {
        let err = Error::other("Something went wrong");
        assert_eq!(err.category(), ErrorCategory::Other);
        assert_eq!(ErrorCategory::Other.as_str(), "other");
    }
}
