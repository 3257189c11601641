//! Tools module
//!
//! MCP tool implementations for the nutrition estimator.

pub mod estimate;
pub mod foods;
pub mod status;
