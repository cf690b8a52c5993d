//! Errors that can occur while reading, writing or resolving the configuration.

use std::path::PathBuf;

use crate::environment;

/// The configuration file could not be read.
#[derive(Debug, thiserror::Error)]
pub enum ParseConfigurationError {
    #[error("parse error on {file_path}:{line}:{column}: {message}")]
    ParseError {
        file_path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },
    #[error("unsupported configuration version {0}, expected 1")]
    UnsupportedVersion(u32),
    #[error("I/O error: {0}")]
    IoErrorButStringified(String),
}

/// The configuration file could not be written.
#[derive(Debug, thiserror::Error)]
pub enum WriteParsedConfigurationError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// The parsed configuration could not be turned into a runtime configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("{0}")]
    Environment(#[from] environment::Error),
    #[error("configure {json_variable} (whole JSON) or {file_variable} (file path)")]
    MissingServiceKey {
        json_variable: String,
        file_variable: String,
    },
    #[error("{0} must not be empty")]
    EmptyValue(&'static str),
}
