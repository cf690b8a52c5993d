use axum::{extract::State, Json};
use tracing::info_span;

use query_engine_execution::{query, response};
use query_engine_translation::translation;

use crate::{error::SeriesError, extract::QueryParams, state::ServerState};

/// Weekly capture totals for a trap, for the chart. An empty key yields an empty series.
pub async fn get_weekly_series(
    State(state): State<ServerState>,
    params: QueryParams,
) -> Result<Json<response::WeeklySeries>, SeriesError> {
    let plan = info_span!("Translate request").in_scope(|| {
        translation::query::weekly_series(
            &state.dataset,
            params.get("chave"),
            params.get("start_date"),
            params.get("end_date"),
        )
    });
    let Some(plan) = plan else {
        return Ok(Json(response::WeeklySeries::default()));
    };

    let rows = query::execute(
        state.warehouse.as_ref(),
        &state.metrics,
        "serie_psilideo",
        &plan,
    )
    .await?;

    let series = info_span!("Create response").in_scope(|| response::weekly_series(rows))?;
    Ok(Json(series))
}
