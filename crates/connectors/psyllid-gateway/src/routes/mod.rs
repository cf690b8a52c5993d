//! The HTTP surface of the gateway.

mod get_healthz;
mod get_kml;
mod get_latest_capture;
mod get_metrics;
mod get_table;
mod get_weekly_series;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;

use crate::state::ServerState;

pub use get_healthz::get_healthz;
pub use get_kml::{get_kml, KML_MIME_TYPE};
pub use get_latest_capture::get_latest_capture;
pub use get_metrics::get_metrics;
pub use get_table::{get_table, get_top10};
pub use get_weekly_series::get_weekly_series;

pub fn create_router(state: ServerState) -> Router {
    Router::new()
        .route("/healthz", get(get_healthz))
        .route("/metrics", get(get_metrics))
        .route("/kml/*filename", get(get_kml))
        .route("/api/top10", get(get_top10))
        .route("/api/table", get(get_table))
        .route("/api/ultima_captura_psilideo", get(get_latest_capture))
        .route("/api/serie_psilideo", get(get_weekly_series))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
