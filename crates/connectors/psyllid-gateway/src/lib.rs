//! An HTTP gateway that answers a fixed set of read-only questions about psyllid trap
//! captures and market indicators from a BigQuery dataset, and serves the KML overlays the
//! map draws on.

pub mod connector;
pub mod dotenv;
pub mod error;
pub mod extract;
pub mod health;
pub mod routes;
pub mod state;
