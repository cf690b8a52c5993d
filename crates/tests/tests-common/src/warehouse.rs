//! A warehouse that answers from a queue of canned results.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use query_engine_execution::error::Error;
use query_engine_execution::warehouse::{RowSet, Warehouse};
use query_engine_sql::sql::string::SQL;

/// Records every statement it is asked to run. Answers with the queued results in order,
/// then with empty row sets.
#[derive(Default)]
pub struct InMemoryWarehouse {
    results: Mutex<VecDeque<Result<RowSet, Error>>>,
    queries: Mutex<Vec<SQL>>,
}

impl InMemoryWarehouse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the next query with these rows.
    pub fn returning(self, columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        let columns = columns.iter().map(ToString::to_string).collect();
        self.push(Ok(RowSet::new(columns, rows)));
        self
    }

    /// Fail the next query with this message.
    pub fn failing(self, message: &str) -> Self {
        self.push(Err(Error::Warehouse(message.to_string())));
        self
    }

    fn push(&self, result: Result<RowSet, Error>) {
        self.results
            .lock()
            .expect("results lock poisoned")
            .push_back(result);
    }

    /// Every statement run so far, in order.
    pub fn queries(&self) -> Vec<SQL> {
        self.queries.lock().expect("queries lock poisoned").clone()
    }
}

#[async_trait]
impl Warehouse for InMemoryWarehouse {
    async fn run(&self, query: &SQL) -> Result<RowSet, Error> {
        self.queries
            .lock()
            .expect("queries lock poisoned")
            .push(query.clone());
        self.results
            .lock()
            .expect("results lock poisoned")
            .pop_front()
            .unwrap_or_else(|| Ok(RowSet::default()))
    }
}
