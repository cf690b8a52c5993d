//! The warehouse, as seen by the gateway.

use async_trait::async_trait;
use serde_json::Value;

use query_engine_sql::sql::string::SQL;

use crate::error::Error;

/// Something that runs a parameterized statement and returns every row at once.
///
/// Implementations are shared by all requests and must be safe to call concurrently.
#[async_trait]
pub trait Warehouse: Send + Sync {
    async fn run(&self, query: &SQL) -> Result<RowSet, Error>;
}

/// The rows of a result, with cells already converted to JSON values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    /// Field names, in the order the warehouse returned them.
    pub columns: Vec<String>,
    /// One entry per row, each with one cell per column.
    pub rows: Vec<Vec<Value>>,
}

impl RowSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Each row as a map from field name to value.
    pub fn into_records(self) -> Vec<serde_json::Map<String, Value>> {
        let columns = self.columns;
        self.rows
            .into_iter()
            .map(|row| columns.iter().cloned().zip(row).collect())
            .collect()
    }
}
