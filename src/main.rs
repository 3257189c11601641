//! Fridge Nutrition Estimator
//!
//! An MCP server estimating nutrition for Japanese recipe ingredients.

use std::sync::Arc;

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use fridge_nutrition::build_info;
use fridge_nutrition::config::AppConfig;
use fridge_nutrition::mcp::FridgeService;
use fridge_nutrition::nutrition::{NutritionEstimator, ReferenceTable};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("fridge_nutrition=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load()?;

    let reference = ReferenceTable::load(config.reference_path.as_deref())?;

    build_info::print_startup_banner(reference.len());
    eprintln!("Starting MCP server on stdio...");
    eprintln!("Reference table: {}", reference.source());

    let estimator = NutritionEstimator::new(Arc::new(reference))
        .with_settings(config.units)
        .with_targets(config.targets);

    // Create the service
    let service = FridgeService::new(Arc::new(estimator));

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}
