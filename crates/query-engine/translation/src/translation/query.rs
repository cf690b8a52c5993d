//! Build the statement for each endpoint.

use query_engine_metadata::metadata::{Dataset, TableName, LATEST_CAPTURE_VIEW, WEEKLY_CAPTURE_VIEW};
use query_engine_sql::sql::execution_plan::{simple_query_plan, ExecutionPlan};
use query_engine_sql::sql::helpers::{append_optional_bound, select_star};
use query_engine_sql::sql::string::{Param, TableReference, SQL};

use super::error::Error;

/// Rows returned by the preview endpoint.
pub const TOP_ROWS_LIMIT: u32 = 10;

/// The first rows of an allow-listed table.
pub fn top10(dataset: &Dataset, table: &str) -> Result<ExecutionPlan, Error> {
    let table = TableName::try_from(table)?;
    Ok(simple_query_plan(select_star(
        dataset,
        TableReference::Allowed(table),
        Some(TOP_ROWS_LIMIT),
    )))
}

/// Every row of an allow-listed table.
pub fn full_table(dataset: &Dataset, table: &str) -> Result<ExecutionPlan, Error> {
    let table = TableName::try_from(table)?;
    Ok(simple_query_plan(select_star(
        dataset,
        TableReference::Allowed(table),
        None,
    )))
}

/// The most recent capture recorded for a trap key.
pub fn latest_capture(dataset: &Dataset, chave: &str) -> Result<ExecutionPlan, Error> {
    let chave = chave.trim();
    if chave.is_empty() {
        return Err(Error::MissingParameter("chave"));
    }

    let mut sql = SQL::new();
    sql.append_syntax("SELECT FORMAT_DATE('%Y-%m-%d', sk_data) AS sk_data, qtd FROM ");
    sql.append_table(dataset, TableReference::View(LATEST_CAPTURE_VIEW));
    sql.append_syntax(" WHERE chave = ");
    sql.append_param("ch", Param::String(chave.to_string()));

    Ok(simple_query_plan(sql))
}

/// Weekly capture totals for a trap key, oldest week first.
///
/// An empty key selects nothing, so no statement is built and `None` is returned.
/// An empty bound leaves that side of the date range open.
pub fn weekly_series(
    dataset: &Dataset,
    chave: &str,
    start_date: &str,
    end_date: &str,
) -> Option<ExecutionPlan> {
    let chave = chave.trim();
    if chave.is_empty() {
        tracing::debug!("empty key, skipping the weekly series query");
        return None;
    }

    let mut sql = SQL::new();
    sql.append_syntax("SELECT ano, semana, qtd FROM ");
    sql.append_table(dataset, TableReference::View(WEEKLY_CAPTURE_VIEW));
    sql.append_syntax(" WHERE chave = ");
    sql.append_param("ch", Param::String(chave.to_string()));
    sql.append_syntax(" AND ");
    append_optional_bound(&mut sql, "semana_inicio_sexta", ">=", "s", date(start_date));
    sql.append_syntax(" AND ");
    append_optional_bound(&mut sql, "semana_inicio_sexta", "<=", "e", date(end_date));
    sql.append_syntax(" ORDER BY ano, semana");

    Some(simple_query_plan(sql))
}

fn date(value: &str) -> Param {
    let value = value.trim();
    Param::Date((!value.is_empty()).then(|| value.to_string()))
}
