//! Errors for query translation.

use query_engine_metadata::metadata::TableNotAllowed;

/// A type for translation errors. Every one of them is the caller's fault.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    TableNotAllowed(#[from] TableNotAllowed),
    #[error("missing parameter {0}")]
    MissingParameter(&'static str),
}
