//! Nutrition estimation module
//!
//! Handles quantity parsing, reference lookup, aggregation and scoring.

pub mod converter;
pub mod estimator;
pub mod reference;
pub mod scoring;
pub mod targets;
pub mod units;

pub use converter::{
    normalize_quantity, parse_quantity, to_grams, to_grams_with_weight, ParsedQuantity, UnitSettings,
};
pub use estimator::{
    DailyNutritionReport, LineResult, MealNutrition, NutritionEstimator, NutritionReport,
    UnscoredIngredient, UnscoredReason,
};
pub use reference::{FoodLookup, LookupCache, MatchKind, ReferenceError, ReferenceTable};
pub use scoring::{
    balance_score, round1, DailyNutritionTotals, NutritionSummary, PfcRatio, TargetAchievement,
};
pub use targets::{NutritionTargets, TargetsError, TargetsSpec};
pub use units::{
    categorize_unit, grams_per_unit, ml_per_unit, unit_weight, unit_weight_for, UnitCategory,
};
