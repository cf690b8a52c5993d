//! Helpers shared by the gateway's tests.

pub mod helpers;
pub mod router;
pub mod warehouse;

pub use warehouse::InMemoryWarehouse;
