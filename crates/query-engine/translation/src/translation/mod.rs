//! Translate the parameters of an incoming request to an ExecutionPlan (SQL) to be run
//! against the warehouse.

pub mod error;
pub mod query;
