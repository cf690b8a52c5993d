//! Query execution against the warehouse, and shaping of the rows it returns.

pub mod bigquery;
pub mod error;
pub mod metrics;
pub mod query;
pub mod response;
pub mod warehouse;
