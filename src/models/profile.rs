//! Food nutrient profile
//!
//! One row of the reference table, per 100g of edible portion.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::NutrientAmounts;

/// Immutable per-100g nutrient record for one food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodNutrientProfile {
    pub id: String,
    /// Canonical name
    pub name: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub synonyms: BTreeSet<String>,
    pub per_100g: NutrientAmounts,
}

impl FoodNutrientProfile {
    /// Nutrients contained in the given weight of this food
    pub fn nutrients_for(&self, grams: f64) -> NutrientAmounts {
        self.per_100g.for_grams(grams)
    }
}
