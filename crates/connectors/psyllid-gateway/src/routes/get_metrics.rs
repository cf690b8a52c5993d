use axum::{extract::State, http::header, http::StatusCode, response::IntoResponse};
use prometheus::{Encoder, TextEncoder};

use crate::state::ServerState;

/// The Prometheus text exposition of the gateway's metrics.
pub async fn get_metrics(State(state): State<ServerState>) -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let mut buffer = String::new();
    match encoder.encode_utf8(&state.metrics_registry.gather(), &mut buffer) {
        Ok(()) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, encoder.format_type().to_string())],
            buffer,
        ),
        Err(err) => {
            tracing::error!(error = %err, "unable to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain".to_string())],
                err.to_string(),
            )
        }
    }
}
