//! SQL text and its bound parameters, as sent to the warehouse.

pub mod execution_plan;
pub mod helpers;
pub mod string;
