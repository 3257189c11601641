//! Fridge Nutrition MCP Server Implementation
//!
//! Implements the MCP server with all estimation tools.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::nutrition::NutritionEstimator;
use crate::tools::estimate::{self, IngredientInput, RecipeInput, TargetOverrides};
use crate::tools::foods::{self, SearchFoodsQuery};
use crate::tools::status::StatusTracker;

/// Fridge Nutrition MCP Service
#[derive(Clone)]
pub struct FridgeService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    estimator: Arc<NutritionEstimator>,
    tool_router: ToolRouter<FridgeService>,
}

impl FridgeService {
    pub fn new(estimator: Arc<NutritionEstimator>) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new())),
            estimator,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EstimateNutritionParams {
    /// Ingredient lines in recipe order
    pub ingredients: Vec<IngredientInput>,
    /// Optional changes to the configured daily targets
    pub targets: Option<TargetOverrides>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EstimateMealPlanParams {
    /// Recipes eaten during one day
    pub recipes: Vec<RecipeInput>,
    pub targets: Option<TargetOverrides>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ParseQuantityParams {
    /// Quantity text such as "大さじ2" or "1/2個(100g)"
    pub quantity: String,
    /// Food name, needed to resolve counts like "2個"
    pub food: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LookupFoodParams {
    /// Food name or synonym
    pub name: Option<String>,
    /// Reference table id, used instead of the name
    pub id: Option<String>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl FridgeService {
    // --- Status ---

    #[tool(description = "Get the current status of the nutrition estimator including build info, reference table size, and process information")]
    async fn fridge_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(&self.estimator);
        to_json(&status)
    }

    #[tool(description = "Get instructions for estimating nutrition, including the supported quantity expressions. Call this before the first estimate in a session.")]
    fn nutrition_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::NUTRITION_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(NUTRITION_INSTRUCTIONS)]))
    }

    // --- Estimation ---

    #[tool(description = "Estimate total nutrition for ingredient lines given as food name plus Japanese quantity text (e.g. 鶏もも肉 300g, しょうゆ 大さじ2). Returns rounded totals, PFC ratio, balance score, per-line results and unscored lines.")]
    fn estimate_nutrition(&self, Parameters(p): Parameters<EstimateNutritionParams>) -> Result<CallToolResult, McpError> {
        let result = estimate::estimate_nutrition(&self.estimator, &p.ingredients, p.targets.as_ref())
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
        to_json(&result)
    }

    #[tool(description = "Estimate one person's nutrition for a day of recipes. Each recipe total is divided by its serving count (e.g. 2人分) and the day is scored against the daily targets.")]
    fn estimate_meal_plan(&self, Parameters(p): Parameters<EstimateMealPlanParams>) -> Result<CallToolResult, McpError> {
        let result = estimate::estimate_meal_plan(&self.estimator, p.recipes, p.targets.as_ref())
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
        to_json(&result)
    }

    #[tool(description = "Show how a quantity expression converts to grams, with its unit category and confidence")]
    fn parse_quantity(&self, Parameters(p): Parameters<ParseQuantityParams>) -> Result<CallToolResult, McpError> {
        let result = foods::parse_quantity_for(&self.estimator, &p.quantity, p.food.as_deref());
        to_json(&result)
    }

    // --- Reference Foods ---

    #[tool(description = "Resolve a food name (or table id) to its reference food and per-100g nutrients")]
    fn lookup_food(&self, Parameters(p): Parameters<LookupFoodParams>) -> Result<CallToolResult, McpError> {
        match (p.id, p.name) {
            (Some(id), _) => match foods::get_food(&self.estimator, &id) {
                Some(food) => to_json(&food),
                None => to_json(&foods::food_not_found(&id)),
            },
            (None, Some(name)) => to_json(&foods::lookup_food(&self.estimator, &name)),
            (None, None) => Err(McpError::invalid_params("Either name or id is required", None)),
        }
    }

    #[tool(description = "Search reference foods whose name contains the query")]
    fn search_foods(&self, Parameters(p): Parameters<SearchFoodsQuery>) -> Result<CallToolResult, McpError> {
        to_json(&foods::search_foods(&self.estimator, &p))
    }

    #[tool(description = "Get the daily nutrition targets used for scoring")]
    fn get_nutrition_targets(&self) -> Result<CallToolResult, McpError> {
        to_json(&estimate::get_nutrition_targets(&self.estimator))
    }
}

#[tool_handler]
impl ServerHandler for FridgeService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "fridge-nutrition".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Fridge Nutrition Estimator".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Fridge Nutrition Estimator - nutrition for Japanese recipe ingredients. \
                 IMPORTANT: Call nutrition_instructions first. \
                 Estimate: estimate_nutrition (ingredient lines), estimate_meal_plan (recipes with servings). \
                 Inspect: parse_quantity, lookup_food, search_foods, get_nutrition_targets. \
                 Status: fridge_status."
                    .into(),
            ),
        }
    }
}
