//! Metadata information regarding the warehouse: which tables may be read and which views
//! back the per-key endpoints.

pub mod database;
pub mod views;

// re-export without modules
pub use database::*;
pub use views::*;
