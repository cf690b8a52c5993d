//! Health check of the warehouse connection.

use query_engine_execution::error::Error;
use query_engine_execution::metrics::Metrics;
use query_engine_execution::query;
use query_engine_execution::warehouse::Warehouse;
use query_engine_sql::sql::execution_plan::simple_query_plan;
use query_engine_sql::sql::string::SQL;

/// Check that the warehouse is reachable and that the service account may run jobs.
pub async fn health_check(warehouse: &dyn Warehouse, metrics: &Metrics) -> Result<(), Error> {
    let mut sql = SQL::new();
    sql.append_syntax("SELECT 1 AS ok");

    let rows = query::execute(warehouse, metrics, "check", &simple_query_plan(sql)).await?;

    match rows.rows.as_slice() {
        [row] if row.first().and_then(serde_json::Value::as_i64) == Some(1) => Ok(()),
        _ => Err(Error::UnexpectedRow(format!(
            "expected a single row with ok = 1, got {rows:?}"
        ))),
    }
}
