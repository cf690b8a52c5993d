//! Common functions used across test cases.

use std::sync::Arc;

use axum_test_helper::TestClient;
use tests_common::InMemoryWarehouse;

/// A client for a fresh router around the warehouse. The warehouse is returned too, so that
/// tests can inspect the statements it ran.
pub fn client(warehouse: InMemoryWarehouse) -> (TestClient, Arc<InMemoryWarehouse>) {
    let warehouse = Arc::new(warehouse);
    let router = tests_common::router::create_router(warehouse.clone());
    (TestClient::new(router), warehouse)
}
