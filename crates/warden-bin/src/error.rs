// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for the `wardend` binary.

use thiserror::Error;

/// Result type alias for binary operations.
pub type BinResult<T> = Result<T, BinError>;

/// Errors that can occur while running `wardend`.
#[derive(Debug, Error)]
pub enum BinError {
    /// Configuration file problem.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Startup problem before the server could serve.
    #[error("initialization error: {0}")]
    Initialization(String),

    /// I/O problem.
    #[error("i/o error: {0}")]
    Io(String),

    /// Invalid auth settings.
    #[error("auth configuration error: {0}")]
    Auth(#[from] warden_core::ConfigurationError),

    /// Server failure.
    #[error("server error: {0}")]
    Api(#[from] warden_api::ApiError),
}

impl BinError {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates an initialization error.
    pub fn init(msg: impl Into<String>) -> Self {
        Self::Initialization(msg.into())
    }

    /// The process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) | Self::Auth(_) => 1,
            Self::Initialization(_) => 2,
            Self::Io(_) => 3,
            Self::Api(_) => 4,
        }
    }
}

impl From<std::io::Error> for BinError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Prints the error and its cause chain to stderr, then exits with the
/// error's code.
pub fn report_error_and_exit(error: BinError) -> ! {
    eprintln!("Error: {error}");
    let mut source = std::error::Error::source(&error);
    while let Some(cause) = source {
        eprintln!("  Caused by: {cause}");
        source = cause.source();
    }
    std::process::exit(error.exit_code())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BinError::config("missing file");
        assert_eq!(err.to_string(), "configuration error: missing file");
    }

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(BinError::config("x").exit_code(), 1);
        assert_eq!(BinError::init("x").exit_code(), 2);
        assert_eq!(
            BinError::from(std::io::Error::other("boom")).exit_code(),
            3
        );
    }

    #[test]
    fn test_error_from_core_configuration() {
        let err = BinError::from(warden_core::ConfigurationError::MissingSecret);
        assert_eq!(err.exit_code(), 1);
    }
}
