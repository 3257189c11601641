//! Estimation MCP Tools
//!
//! Tools for estimating ingredient lists and meal plans.

use rmcp::schemars;
use serde::{Deserialize, Serialize};

use crate::models::{Recipe, RecipeIngredient};
use crate::nutrition::{
    LineResult, MealNutrition, NutritionEstimator, NutritionSummary, NutritionTargets,
    TargetsError, UnscoredIngredient,
};

/// One ingredient line as written in a recipe
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct IngredientInput {
    pub name: String,
    /// Free text such as "300g", "大さじ2", "1/2個", "少々"
    #[serde(default)]
    pub quantity: String,
    /// Section heading row, skipped in recipes
    #[serde(default)]
    pub headline: bool,
}

/// A recipe for meal-plan estimation
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct RecipeInput {
    pub title: String,
    /// Free text such as "2人分"; one serving when missing
    #[serde(default)]
    pub serving: String,
    pub ingredients: Vec<IngredientInput>,
}

impl From<RecipeInput> for Recipe {
    fn from(input: RecipeInput) -> Self {
        Recipe {
            title: input.title,
            serving: input.serving,
            ingredients: input
                .ingredients
                .into_iter()
                .map(|i| RecipeIngredient {
                    name: i.name,
                    quantity: i.quantity,
                    headline: i.headline,
                })
                .collect(),
        }
    }
}

/// Per-call changes to the configured targets; unset fields keep their value
#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct TargetOverrides {
    pub energy_kcal: Option<f64>,
    pub protein_pct: Option<f64>,
    pub fat_pct: Option<f64>,
    pub carb_pct: Option<f64>,
    pub salt_max_g: Option<f64>,
    pub fiber_min_g: Option<f64>,
    /// Total PFC deviation at which the balance score reaches zero
    pub deviation_ceiling: Option<f64>,
}

impl TargetOverrides {
    /// Apply on top of `base`, validating the result
    pub fn apply(&self, base: &NutritionTargets) -> Result<NutritionTargets, TargetsError> {
        let mut spec = base.spec();
        if let Some(v) = self.energy_kcal { spec.energy_kcal = v; }
        if let Some(v) = self.protein_pct { spec.protein_pct = v; }
        if let Some(v) = self.fat_pct { spec.fat_pct = v; }
        if let Some(v) = self.carb_pct { spec.carb_pct = v; }
        if let Some(v) = self.salt_max_g { spec.salt_max_g = v; }
        if let Some(v) = self.fiber_min_g { spec.fiber_min_g = v; }
        if let Some(v) = self.deviation_ceiling { spec.deviation_ceiling = v; }
        NutritionTargets::new(spec)
    }
}

/// Response for estimate_nutrition
#[derive(Debug, Serialize)]
pub struct EstimateNutritionResponse {
    pub summary: NutritionSummary,
    pub lines: Vec<LineResult>,
    pub unscored: Vec<UnscoredIngredient>,
}

/// Response for estimate_meal_plan
#[derive(Debug, Serialize)]
pub struct EstimateMealPlanResponse {
    pub summary: NutritionSummary,
    pub meals: Vec<MealNutrition>,
}

/// Response for get_nutrition_targets
#[derive(Debug, Serialize)]
pub struct NutritionTargetsResponse {
    pub targets: NutritionTargets,
    pub protein_g: f64,
    pub fat_g: f64,
    pub carb_g: f64,
}

fn resolve_targets(
    estimator: &NutritionEstimator,
    overrides: Option<&TargetOverrides>,
) -> Result<NutritionTargets, TargetsError> {
    match overrides {
        Some(overrides) => overrides.apply(estimator.targets()),
        None => Ok(*estimator.targets()),
    }
}

pub fn estimate_nutrition(
    estimator: &NutritionEstimator,
    ingredients: &[IngredientInput],
    overrides: Option<&TargetOverrides>,
) -> Result<EstimateNutritionResponse, TargetsError> {
    let targets = resolve_targets(estimator, overrides)?;
    let report = estimator.estimate(
        ingredients
            .iter()
            .filter(|i| !i.headline)
            .map(|i| (i.name.as_str(), i.quantity.as_str())),
        Some(&targets),
    );

    Ok(EstimateNutritionResponse {
        summary: report.summary(),
        lines: report.lines,
        unscored: report.unscored,
    })
}

pub fn estimate_meal_plan(
    estimator: &NutritionEstimator,
    recipes: Vec<RecipeInput>,
    overrides: Option<&TargetOverrides>,
) -> Result<EstimateMealPlanResponse, TargetsError> {
    let targets = resolve_targets(estimator, overrides)?;
    let recipes: Vec<Recipe> = recipes.into_iter().map(Recipe::from).collect();
    let report = estimator.estimate_meal_plan(&recipes, Some(&targets));

    Ok(EstimateMealPlanResponse {
        summary: report.summary(),
        meals: report.meals,
    })
}

pub fn get_nutrition_targets(estimator: &NutritionEstimator) -> NutritionTargetsResponse {
    let targets = *estimator.targets();
    NutritionTargetsResponse {
        protein_g: targets.protein_g(),
        fat_g: targets.fat_g(),
        carb_g: targets.carb_g(),
        targets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::{ReferenceTable, UnscoredReason};
    use std::sync::Arc;

    fn estimator() -> NutritionEstimator {
        NutritionEstimator::new(Arc::new(ReferenceTable::bundled().unwrap()))
    }

    fn line(name: &str, quantity: &str) -> IngredientInput {
        IngredientInput {
            name: name.to_string(),
            quantity: quantity.to_string(),
            headline: false,
        }
    }

    #[test]
    fn test_estimate_nutrition() {
        let response = estimate_nutrition(
            &estimator(),
            &[line("卵", "3個"), line("牛乳", "大さじ1"), line("ドラゴンフルーツ", "1個")],
            None,
        )
        .unwrap();

        assert_eq!(response.summary.total_energy_kcal, 281.9);
        assert_eq!(response.lines.len(), 3);
        assert_eq!(response.unscored.len(), 1);
        assert_eq!(response.unscored[0].reason, UnscoredReason::FoodNotFound);
    }

    #[test]
    fn test_response_carries_achievement() {
        let response = estimate_nutrition(&estimator(), &[line("卵", "4個")], None).unwrap();
        let achievement = &response.summary.achievement;
        // 240g of egg against 2000 kcal / 15:25:60 / salt 7.5g / fiber 21g
        assert_eq!(achievement.energy_pct, 18);
        assert_eq!(achievement.protein_pct, 39);
        assert_eq!(achievement.fat_pct, 44);
        assert_eq!(achievement.carbohydrate_pct, 0);
        assert_eq!(achievement.salt_pct, 13);
        assert_eq!(achievement.fiber_pct, 0);
        assert!(achievement.salt_within_limit);
        assert!(!achievement.fiber_met);
        assert_eq!(response.summary.total_calcium_mg, 122.4);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["summary"]["achievement"]["protein_pct"], 39);
        assert_eq!(json["summary"]["achievement"]["fiber_met"], false);
        assert!(json["summary"]["total_vitamin_d_ug"].is_number());
    }

    #[test]
    fn test_headline_rows_skipped() {
        let mut heading = line("(A)", "");
        heading.headline = true;
        let response = estimate_nutrition(&estimator(), &[heading, line("卵", "1個")], None).unwrap();
        assert_eq!(response.lines.len(), 1);
        assert!(response.unscored.is_empty());
    }

    #[test]
    fn test_target_overrides() {
        let est = estimator();
        let overrides = TargetOverrides {
            energy_kcal: Some(1500.0),
            ..Default::default()
        };
        let targets = overrides.apply(est.targets()).unwrap();
        assert_eq!(targets.energy_kcal(), 1500.0);
        assert_eq!(targets.protein_pct(), 15.0);

        let bad = TargetOverrides {
            protein_pct: Some(40.0),
            ..Default::default()
        };
        let err = estimate_nutrition(&est, &[line("卵", "1個")], Some(&bad)).unwrap_err();
        assert!(matches!(err, TargetsError::MacroSum { .. }));
    }

    #[test]
    fn test_deviation_ceiling_override() {
        let est = estimator();
        let eggs = [line("卵", "2個")];
        let default = estimate_nutrition(&est, &eggs, None).unwrap();

        // egg energy splits about 34:65:1, a total deviation of 118
        let strict = TargetOverrides {
            deviation_ceiling: Some(100.0),
            ..Default::default()
        };
        assert_eq!(strict.apply(est.targets()).unwrap().deviation_ceiling(), 100.0);
        let scored = estimate_nutrition(&est, &eggs, Some(&strict)).unwrap();
        assert!(default.summary.balance_score > 0.0);
        assert_eq!(scored.summary.balance_score, 0.0);

        let invalid = TargetOverrides {
            deviation_ceiling: Some(0.0),
            ..Default::default()
        };
        assert!(matches!(
            invalid.apply(est.targets()),
            Err(TargetsError::NonPositive { field: "deviation_ceiling", .. })
        ));
    }

    #[test]
    fn test_estimate_meal_plan() {
        let recipes = vec![RecipeInput {
            title: "ゆで卵".to_string(),
            serving: "2人分".to_string(),
            ingredients: vec![line("卵", "4個"), line("塩", "少々")],
        }];

        let response = estimate_meal_plan(&estimator(), recipes, None).unwrap();
        assert_eq!(response.meals.len(), 1);
        assert_eq!(response.meals[0].servings, 2.0);
        assert_eq!(response.meals[0].matched_count, 2);
        // two eggs per person: 120g x 151/100
        assert_eq!(response.summary.total_energy_kcal, 181.2);
    }

    #[test]
    fn test_get_nutrition_targets() {
        let response = get_nutrition_targets(&estimator());
        assert_eq!(response.targets.energy_kcal(), 2000.0);
        assert_eq!(response.protein_g, 75.0);
        assert_eq!(response.carb_g, 300.0);
    }
}
