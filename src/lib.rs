//! Fridge Nutrition Library
//!
//! Nutrition estimation for Japanese recipe ingredients.

pub mod build_info;
pub mod config;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod tools;
