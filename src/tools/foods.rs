//! Reference Food MCP Tools
//!
//! Tools for inspecting the reference table and the quantity parser.

use rmcp::schemars;
use serde::{Deserialize, Serialize};

use crate::models::{Confidence, FoodNutrientProfile, NutrientAmounts};
use crate::nutrition::{
    parse_quantity, to_grams_with_weight, unit_weight_for, FoodLookup, MatchKind,
    NutritionEstimator, UnitCategory,
};

/// Response for lookup_food
#[derive(Debug, Serialize)]
pub struct LookupFoodResponse {
    pub query: String,
    pub found: bool,
    pub matched_by: Option<MatchKind>,
    pub food: Option<FoodDetail>,
}

/// Response for search_foods
#[derive(Debug, Serialize)]
pub struct SearchFoodsResponse {
    pub items: Vec<FoodSummary>,
    pub total: usize,
}

/// Summary of a reference food for search results
#[derive(Debug, Serialize)]
pub struct FoodSummary {
    pub id: String,
    pub name: String,
    pub group: String,
    pub energy_kcal: f64,
}

impl From<&FoodNutrientProfile> for FoodSummary {
    fn from(food: &FoodNutrientProfile) -> Self {
        Self {
            id: food.id.clone(),
            name: food.name.clone(),
            group: food.group.clone(),
            energy_kcal: food.per_100g.energy_kcal,
        }
    }
}

/// Full reference food detail
#[derive(Debug, Serialize)]
pub struct FoodDetail {
    pub id: String,
    pub name: String,
    pub group: String,
    pub synonyms: Vec<String>,
    pub per_100g: NutrientAmounts,
    /// Default weight of one piece, when known
    pub unit_weight_g: Option<f64>,
}

impl From<&FoodNutrientProfile> for FoodDetail {
    fn from(food: &FoodNutrientProfile) -> Self {
        Self {
            id: food.id.clone(),
            name: food.name.clone(),
            group: food.group.clone(),
            synonyms: food.synonyms.iter().cloned().collect(),
            per_100g: food.per_100g,
            unit_weight_g: unit_weight_for(&food.name, Some(food)),
        }
    }
}

/// Response for parse_quantity
#[derive(Debug, Serialize)]
pub struct ParseQuantityResponse {
    pub input: String,
    pub food: Option<String>,
    pub amount: f64,
    pub unit: String,
    pub category: UnitCategory,
    pub approximate: bool,
    pub annotated_grams: Option<f64>,
    pub grams: f64,
    pub confidence: Confidence,
}

/// Query parameters for search_foods
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchFoodsQuery {
    pub query: String,
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

fn default_search_limit() -> usize { 20 }

/// Resolve a name the same way estimation does
pub fn lookup_food(estimator: &NutritionEstimator, name: &str) -> LookupFoodResponse {
    match estimator.reference().lookup(name) {
        FoodLookup::Found { profile, matched_by } => LookupFoodResponse {
            query: name.to_string(),
            found: true,
            matched_by: Some(matched_by),
            food: Some(profile.into()),
        },
        FoodLookup::NotFound => LookupFoodResponse {
            query: name.to_string(),
            found: false,
            matched_by: None,
            food: None,
        },
    }
}

/// Look up a food by its table id
pub fn get_food(estimator: &NutritionEstimator, id: &str) -> Option<FoodDetail> {
    estimator.reference().lookup_by_id(id).map(FoodDetail::from)
}

/// Body returned when no food has the requested id
pub fn food_not_found(id: &str) -> serde_json::Value {
    serde_json::json!({ "error": "Food not found", "id": id })
}

pub fn search_foods(estimator: &NutritionEstimator, query: &SearchFoodsQuery) -> SearchFoodsResponse {
    let items: Vec<FoodSummary> = estimator
        .reference()
        .search(&query.query, query.limit)
        .into_iter()
        .map(FoodSummary::from)
        .collect();

    SearchFoodsResponse {
        total: items.len(),
        items,
    }
}

/// Show how a quantity expression converts to grams
///
/// Without a food name, count units cannot be resolved.
pub fn parse_quantity_for(
    estimator: &NutritionEstimator,
    quantity: &str,
    food: Option<&str>,
) -> ParseQuantityResponse {
    let parsed = parse_quantity(quantity);
    let piece_grams = food.and_then(|name| {
        unit_weight_for(name, estimator.reference().lookup(name).profile())
    });
    let normalized = to_grams_with_weight(&parsed, piece_grams, estimator.settings());

    ParseQuantityResponse {
        input: quantity.to_string(),
        food: food.map(str::to_string),
        amount: parsed.amount,
        unit: parsed.unit,
        category: parsed.category,
        approximate: parsed.approximate,
        annotated_grams: parsed.annotated_grams,
        grams: normalized.grams,
        confidence: normalized.confidence,
    }
}
