//! Ingredient aggregation
//!
//! Resolves every `(name, quantity)` line to grams and a reference profile,
//! sums what can be scored and reports the rest as unscored.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::converter::{parse_quantity, to_grams_with_weight, UnitSettings};
use super::reference::{FoodLookup, LookupCache, MatchKind, ReferenceTable};
use super::scoring::{DailyNutritionTotals, NutritionSummary};
use super::targets::NutritionTargets;
use super::units::unit_weight_for;
use crate::models::{Confidence, NutrientAmounts, Recipe};

/// Why a line contributed nothing to the totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnscoredReason {
    /// No reference profile for the food name
    FoodNotFound,
    /// The quantity could not be converted to grams
    UnresolvedQuantity,
    /// The quantity converted to zero grams
    ZeroQuantity,
}

impl UnscoredReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnscoredReason::FoodNotFound => "food_not_found",
            UnscoredReason::UnresolvedQuantity => "unresolved_quantity",
            UnscoredReason::ZeroQuantity => "zero_quantity",
        }
    }
}

/// An input line left out of the totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnscoredIngredient {
    pub name: String,
    pub quantity: String,
    pub reason: UnscoredReason,
}

/// Per-line estimation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineResult {
    pub name: String,
    pub quantity: String,
    pub grams: f64,
    pub confidence: Confidence,
    /// Canonical name of the matched reference food
    pub matched_food: Option<String>,
    pub matched_by: Option<MatchKind>,
    /// Contribution to the totals; zero for unscored lines
    pub nutrients: NutrientAmounts,
    pub unscored: Option<UnscoredReason>,
}

impl LineResult {
    pub fn is_scored(&self) -> bool {
        self.unscored.is_none()
    }

    fn to_unscored(&self) -> Option<UnscoredIngredient> {
        self.unscored.map(|reason| UnscoredIngredient {
            name: self.name.clone(),
            quantity: self.quantity.clone(),
            reason,
        })
    }
}

/// Result of estimating a set of ingredients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionReport {
    pub totals: DailyNutritionTotals,
    pub lines: Vec<LineResult>,
    pub unscored: Vec<UnscoredIngredient>,
}

impl NutritionReport {
    pub fn summary(&self) -> NutritionSummary {
        self.totals.summary()
    }
}

/// Per-person nutrients of one recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealNutrition {
    pub title: String,
    pub servings: f64,
    /// Per person
    pub nutrients: NutrientAmounts,
    pub matched_count: usize,
    /// Ingredient rows, headlines excluded
    pub total_count: usize,
    pub unscored: Vec<UnscoredIngredient>,
}

/// Meals of one day scored together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyNutritionReport {
    pub meals: Vec<MealNutrition>,
    pub totals: DailyNutritionTotals,
}

impl DailyNutritionReport {
    pub fn summary(&self) -> NutritionSummary {
        self.totals.summary()
    }
}

/// Converts ingredient lines to nutrients against one reference table
///
/// Cheap to share: wrap in `Arc` and call from any thread.
#[derive(Debug)]
pub struct NutritionEstimator {
    reference: Arc<ReferenceTable>,
    cache: LookupCache,
    settings: UnitSettings,
    targets: NutritionTargets,
}

impl NutritionEstimator {
    pub fn new(reference: Arc<ReferenceTable>) -> Self {
        Self {
            reference,
            cache: LookupCache::new(),
            settings: UnitSettings::default(),
            targets: NutritionTargets::default(),
        }
    }

    pub fn with_settings(mut self, settings: UnitSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Targets used when a call does not pass its own
    pub fn with_targets(mut self, targets: NutritionTargets) -> Self {
        self.targets = targets;
        self
    }

    pub fn reference(&self) -> &ReferenceTable {
        &self.reference
    }

    pub fn settings(&self) -> &UnitSettings {
        &self.settings
    }

    pub fn targets(&self) -> &NutritionTargets {
        &self.targets
    }

    /// Number of distinct names resolved so far
    pub fn cached_lookups(&self) -> usize {
        self.cache.len()
    }

    /// Estimate totals for `(name, quantity)` pairs
    ///
    /// A `HashMap<String, String>` or a slice of tuples both work. Lines are
    /// reported in input order.
    pub fn estimate<I, N, Q>(
        &self,
        ingredients: I,
        targets: Option<&NutritionTargets>,
    ) -> NutritionReport
    where
        I: IntoIterator<Item = (N, Q)>,
        N: AsRef<str>,
        Q: AsRef<str>,
    {
        let lines: Vec<LineResult> = ingredients
            .into_iter()
            .map(|(name, quantity)| self.estimate_line(name.as_ref(), quantity.as_ref()))
            .collect();

        let nutrients: NutrientAmounts = lines.iter().map(|line| line.nutrients).sum();
        let unscored = lines.iter().filter_map(LineResult::to_unscored).collect();
        let targets = targets.unwrap_or(&self.targets);

        NutritionReport {
            totals: DailyNutritionTotals::score(nutrients, targets),
            lines,
            unscored,
        }
    }

    /// Per-person nutrients of a recipe
    ///
    /// Headline rows are skipped; the total is divided by the serving count.
    pub fn estimate_recipe(&self, recipe: &Recipe) -> MealNutrition {
        let lines: Vec<LineResult> = recipe
            .ingredients
            .iter()
            .filter(|ingredient| !ingredient.headline)
            .map(|ingredient| self.estimate_line(&ingredient.name, &ingredient.quantity))
            .collect();

        let servings = recipe.serving_count();
        let total: NutrientAmounts = lines.iter().map(|line| line.nutrients).sum();

        tracing::debug!(
            "Recipe '{}': {} of {} ingredients matched, {} servings",
            recipe.title,
            lines.iter().filter(|line| line.is_scored()).count(),
            lines.len(),
            servings
        );

        MealNutrition {
            title: recipe.title.clone(),
            servings,
            nutrients: total.scale(1.0 / servings),
            matched_count: lines.iter().filter(|line| line.is_scored()).count(),
            total_count: lines.len(),
            unscored: lines.iter().filter_map(LineResult::to_unscored).collect(),
        }
    }

    /// Sum one person's share of each recipe and score the day
    pub fn estimate_meal_plan(
        &self,
        recipes: &[Recipe],
        targets: Option<&NutritionTargets>,
    ) -> DailyNutritionReport {
        let meals: Vec<MealNutrition> =
            recipes.iter().map(|recipe| self.estimate_recipe(recipe)).collect();
        let nutrients: NutrientAmounts = meals.iter().map(|meal| meal.nutrients).sum();
        let targets = targets.unwrap_or(&self.targets);

        DailyNutritionReport {
            totals: DailyNutritionTotals::score(nutrients, targets),
            meals,
        }
    }

    fn estimate_line(&self, name: &str, quantity: &str) -> LineResult {
        let lookup = self.cache.lookup(&self.reference, name);
        // counts are weighed as the matched food, not the raw text
        let piece_grams = unit_weight_for(name, lookup.profile());
        let normalized = to_grams_with_weight(&parse_quantity(quantity), piece_grams, &self.settings);

        let mut line = LineResult {
            name: name.to_string(),
            quantity: quantity.to_string(),
            grams: normalized.grams,
            confidence: normalized.confidence,
            matched_food: None,
            matched_by: None,
            nutrients: NutrientAmounts::zero(),
            unscored: None,
        };

        match lookup {
            FoodLookup::NotFound => {
                tracing::warn!("No reference food for '{}'", name);
                line.unscored = Some(UnscoredReason::FoodNotFound);
            }
            FoodLookup::Found { profile, matched_by } => {
                line.matched_food = Some(profile.name.clone());
                line.matched_by = Some(matched_by);

                if normalized.is_unresolved() {
                    tracing::warn!("Could not quantify '{}' for '{}'", quantity, name);
                    line.unscored = Some(UnscoredReason::UnresolvedQuantity);
                } else if !(normalized.grams > 0.0) {
                    line.unscored = Some(UnscoredReason::ZeroQuantity);
                } else {
                    line.nutrients = profile.nutrients_for(normalized.grams);
                }
            }
        }

        tracing::debug!(
            "{} {} -> {:.1}g ({}) {:?}",
            name,
            quantity,
            line.grams,
            line.confidence.as_str(),
            line.matched_food
        );

        line
    }
}
