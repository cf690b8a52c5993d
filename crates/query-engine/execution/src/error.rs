//! Errors for query execution. All of them are reported to the caller as upstream failures.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The warehouse client failed. The message is passed through verbatim.
    #[error("{0}")]
    Warehouse(String),
    /// More results are pending, but the response did not say which job they belong to.
    #[error("the warehouse did not identify the query job, so its results cannot be read")]
    MissingJobReference,
    #[error("unexpected row returned by the warehouse: {0}")]
    UnexpectedRow(String),
}
