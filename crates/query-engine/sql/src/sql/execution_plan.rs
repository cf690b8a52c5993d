//! An execution plan: the single statement a request turns into.

use super::string::SQL;

/// Everything needed to run a request against the warehouse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    pub query: SQL,
}

impl ExecutionPlan {
    pub fn query_sql(&self) -> &SQL {
        &self.query
    }
}

/// Wrap a statement in a plan.
pub fn simple_query_plan(query: SQL) -> ExecutionPlan {
    ExecutionPlan { query }
}
