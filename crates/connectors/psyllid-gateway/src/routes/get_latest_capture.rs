use axum::{extract::State, Json};
use tracing::info_span;

use query_engine_execution::{query, response};
use query_engine_translation::translation;

use crate::{error::ServerError, extract::QueryParams, state::ServerState};

/// The most recent capture for a trap, for the map popup. A trap without captures yields
/// `{ sk_data: null, qtd: 0 }`.
pub async fn get_latest_capture(
    State(state): State<ServerState>,
    params: QueryParams,
) -> Result<Json<response::LatestCapture>, ServerError> {
    let plan = info_span!("Translate request")
        .in_scope(|| translation::query::latest_capture(&state.dataset, params.get("chave")))?;

    let rows = query::execute(
        state.warehouse.as_ref(),
        &state.metrics,
        "ultima_captura_psilideo",
        &plan,
    )
    .await?;

    let capture = info_span!("Create response").in_scope(|| response::latest_capture(rows))?;
    Ok(Json(capture))
}
