use axum::{extract::State, Json};
use tracing::{info_span, Instrument};

use query_engine_execution::{query, response};
use query_engine_translation::translation;

use crate::{error::ServerError, extract::QueryParams, state::ServerState};

/// The first ten rows of an allow-listed table.
pub async fn get_top10(
    State(state): State<ServerState>,
    params: QueryParams,
) -> Result<Json<response::Envelope>, ServerError> {
    let plan = info_span!("Translate request")
        .in_scope(|| translation::query::top10(&state.dataset, params.get("table")))?;

    let rows = query::execute(state.warehouse.as_ref(), &state.metrics, "top10", &plan).await?;

    let envelope = async { response::envelope(rows) }
        .instrument(info_span!("Create response"))
        .await;
    Ok(Json(envelope))
}

/// Every row of an allow-listed table. The allow-listed views are small aggregates, so the
/// result is not bounded.
pub async fn get_table(
    State(state): State<ServerState>,
    params: QueryParams,
) -> Result<Json<response::Envelope>, ServerError> {
    let plan = info_span!("Translate request")
        .in_scope(|| translation::query::full_table(&state.dataset, params.get("table")))?;

    let rows = query::execute(state.warehouse.as_ref(), &state.metrics, "table", &plan).await?;

    let envelope = async { response::envelope(rows) }
        .instrument(info_span!("Create response"))
        .await;
    Ok(Json(envelope))
}
