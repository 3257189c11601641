//! Version and build metadata
//!
//! `build.rs` exports `FRIDGE_BUILD_NUMBER` and `FRIDGE_BUILD_TIMESTAMP`;
//! both are optional so the crate also builds without the script's output.

use serde::Serialize;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const RAW_BUILD_NUMBER: Option<&str> = option_env!("FRIDGE_BUILD_NUMBER");
const RAW_BUILD_TIMESTAMP: Option<&str> = option_env!("FRIDGE_BUILD_TIMESTAMP");

/// What this binary reports about itself in the status tool and banner
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    /// 0 when the build script did not run
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub description: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: VERSION,
            build_number: build_number_from(RAW_BUILD_NUMBER),
            build_timestamp: RAW_BUILD_TIMESTAMP.unwrap_or("unknown"),
            description: env!("CARGO_PKG_DESCRIPTION"),
        }
    }

    /// Banner text shown on stderr before the server starts
    pub fn banner(&self, food_count: usize) -> Vec<String> {
        let rule = "=".repeat(47);
        vec![
            rule.clone(),
            format!("  Fridge Nutrition Estimator ({})", self.name),
            format!("  Version: {} | Build: {}", self.version, self.build_number),
            format!("  Compiled: {}", self.build_timestamp),
            format!("  Reference foods: {}", food_count),
            rule,
        ]
    }
}

fn build_number_from(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

/// Write the banner to stderr; stdout carries the MCP transport
pub fn print_startup_banner(food_count: usize) {
    for line in BuildInfo::current().banner(food_count) {
        eprintln!("{}", line);
    }
}
