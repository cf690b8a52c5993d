//! Helpers for building statements in certain shapes and patterns.

use query_engine_metadata::metadata::Dataset;

use super::string::{Param, TableReference, SQL};

/// `SELECT * FROM <table>`, optionally followed by `LIMIT <n>`.
pub fn select_star(dataset: &Dataset, table: TableReference, limit: Option<u32>) -> SQL {
    let mut sql = SQL::new();
    sql.append_syntax("SELECT * FROM ");
    sql.append_table(dataset, table);
    if let Some(limit) = limit {
        sql.append_syntax(&format!(" LIMIT {limit}"));
    }
    sql
}

/// `(@param IS NULL OR <column> <operator> @param)`: a bound that applies only when the
/// parameter is not `NULL`.
pub fn append_optional_bound(
    sql: &mut SQL,
    column: &'static str,
    operator: &'static str,
    name: &'static str,
    param: Param,
) {
    sql.append_syntax("(");
    sql.append_param(name, param);
    sql.append_syntax(" IS NULL OR ");
    sql.append_syntax(column);
    sql.append_syntax(" ");
    sql.append_syntax(operator);
    sql.append_syntax(" ");
    sql.append_param_reference(name);
    sql.append_syntax(")");
}
