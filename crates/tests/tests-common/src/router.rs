//! Routers backed by an in-memory warehouse.

use std::sync::Arc;

use psyllid_gateway::{routes, state::ServerState};
use query_engine_metadata::metadata::Dataset;

use crate::helpers::get_path_from_project_root;
use crate::warehouse::InMemoryWarehouse;

pub const TEST_PROJECT_ID: &str = "bd-cia-jf-citrus";
pub const TEST_DATASET_ID: &str = "jf_prod";
pub const KML_FIXTURES_PATH: &str = "static/kml";

pub fn test_dataset() -> Dataset {
    Dataset::new(TEST_PROJECT_ID, TEST_DATASET_ID)
}

/// A fresh state around the given warehouse, serving the KML fixtures.
pub fn create_state(warehouse: Arc<InMemoryWarehouse>) -> ServerState {
    ServerState::new(
        test_dataset(),
        get_path_from_project_root(KML_FIXTURES_PATH),
        warehouse,
    )
    .expect("fresh metrics registry")
}

/// Creates a router with a fresh state around the given warehouse.
pub fn create_router(warehouse: Arc<InMemoryWarehouse>) -> axum::Router {
    routes::create_router(create_state(warehouse))
}
