//! Execute an execution plan against the warehouse.

use std::time::Instant;

use tracing::{info_span, Instrument};

use query_engine_sql::sql::execution_plan::ExecutionPlan;

use crate::error::Error;
use crate::metrics::Metrics;
use crate::warehouse::{RowSet, Warehouse};

/// Run the plan's statement and wait for every row. Nothing is retried.
pub async fn execute(
    warehouse: &dyn Warehouse,
    metrics: &Metrics,
    endpoint: &'static str,
    plan: &ExecutionPlan,
) -> Result<RowSet, Error> {
    let query = plan.query_sql();

    // values are never logged, only the names they are bound to.
    tracing::debug!(
        generated_sql = %query.sql,
        params = ?query.param_names(),
        "running query"
    );

    metrics.record_query(endpoint);
    let started = Instant::now();
    let result = warehouse
        .run(query)
        .instrument(info_span!("Execute query", endpoint))
        .await;
    metrics.observe_query_duration(endpoint, started.elapsed().as_secs_f64());

    match &result {
        Ok(rows) => tracing::debug!(rows = rows.rows.len(), "query finished"),
        Err(err) => {
            metrics.record_query_error(endpoint);
            tracing::error!(error = %err, endpoint, "query failed");
        }
    }

    result
}
