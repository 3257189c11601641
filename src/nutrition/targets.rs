//! Daily nutrition targets
//!
//! Defaults follow the Japanese dietary reference intakes for an adult:
//! 2000 kcal with a 15/25/60 protein/fat/carbohydrate energy split, at most
//! 7.5 g salt and at least 21 g fiber.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{KCAL_PER_G_CARBOHYDRATE, KCAL_PER_G_FAT, KCAL_PER_G_PROTEIN};

/// Allowed distance of the macro percentage sum from 100
const MACRO_SUM_TOLERANCE: f64 = 0.01;

/// Target configuration errors, raised at construction time
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TargetsError {
    #[error("Macro percentages must sum to 100 (protein {protein} + fat {fat} + carb {carb} = {sum})")]
    MacroSum {
        protein: f64,
        fat: f64,
        carb: f64,
        sum: f64,
    },

    #[error("{field} must not be negative (got {value})")]
    NegativePercentage { field: &'static str, value: f64 },

    #[error("{field} must be greater than zero (got {value})")]
    NonPositive { field: &'static str, value: f64 },
}

/// Unvalidated target values, used to build or override [`NutritionTargets`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetsSpec {
    pub energy_kcal: f64,
    pub protein_pct: f64,
    pub fat_pct: f64,
    pub carb_pct: f64,
    pub salt_max_g: f64,
    pub fiber_min_g: f64,
    /// Total PFC deviation at which the balance score reaches zero
    pub deviation_ceiling: f64,
}

impl Default for TargetsSpec {
    fn default() -> Self {
        Self {
            energy_kcal: 2000.0,
            protein_pct: 15.0,
            fat_pct: 25.0,
            carb_pct: 60.0,
            salt_max_g: 7.5,
            fiber_min_g: 21.0,
            deviation_ceiling: 200.0,
        }
    }
}

/// Validated daily targets
///
/// Can only be obtained through validation, so every instance has macro
/// percentages summing to 100 and positive limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TargetsSpec", into = "TargetsSpec")]
pub struct NutritionTargets {
    spec: TargetsSpec,
}

impl NutritionTargets {
    pub fn new(spec: TargetsSpec) -> Result<Self, TargetsError> {
        for (field, value) in [
            ("protein_pct", spec.protein_pct),
            ("fat_pct", spec.fat_pct),
            ("carb_pct", spec.carb_pct),
        ] {
            if !(value >= 0.0) {
                return Err(TargetsError::NegativePercentage { field, value });
            }
        }

        for (field, value) in [
            ("energy_kcal", spec.energy_kcal),
            ("salt_max_g", spec.salt_max_g),
            ("fiber_min_g", spec.fiber_min_g),
            ("deviation_ceiling", spec.deviation_ceiling),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(TargetsError::NonPositive { field, value });
            }
        }

        let sum = spec.protein_pct + spec.fat_pct + spec.carb_pct;
        if (sum - 100.0).abs() > MACRO_SUM_TOLERANCE {
            return Err(TargetsError::MacroSum {
                protein: spec.protein_pct,
                fat: spec.fat_pct,
                carb: spec.carb_pct,
                sum,
            });
        }

        Ok(Self { spec })
    }

    /// The raw values, e.g. as a starting point for overrides
    pub fn spec(&self) -> TargetsSpec {
        self.spec
    }

    pub fn energy_kcal(&self) -> f64 {
        self.spec.energy_kcal
    }

    pub fn protein_pct(&self) -> f64 {
        self.spec.protein_pct
    }

    pub fn fat_pct(&self) -> f64 {
        self.spec.fat_pct
    }

    pub fn carb_pct(&self) -> f64 {
        self.spec.carb_pct
    }

    pub fn salt_max_g(&self) -> f64 {
        self.spec.salt_max_g
    }

    pub fn fiber_min_g(&self) -> f64 {
        self.spec.fiber_min_g
    }

    pub fn deviation_ceiling(&self) -> f64 {
        self.spec.deviation_ceiling
    }

    /// Target protein in grams
    pub fn protein_g(&self) -> f64 {
        self.spec.energy_kcal * self.spec.protein_pct / 100.0 / KCAL_PER_G_PROTEIN
    }

    /// Target fat in grams
    pub fn fat_g(&self) -> f64 {
        self.spec.energy_kcal * self.spec.fat_pct / 100.0 / KCAL_PER_G_FAT
    }

    /// Target carbohydrate in grams
    pub fn carb_g(&self) -> f64 {
        self.spec.energy_kcal * self.spec.carb_pct / 100.0 / KCAL_PER_G_CARBOHYDRATE
    }
}

impl Default for NutritionTargets {
    fn default() -> Self {
        Self { spec: TargetsSpec::default() }
    }
}

impl TryFrom<TargetsSpec> for NutritionTargets {
    type Error = TargetsError;

    fn try_from(spec: TargetsSpec) -> Result<Self, Self::Error> {
        Self::new(spec)
    }
}

impl From<NutritionTargets> for TargetsSpec {
    fn from(targets: NutritionTargets) -> Self {
        targets.spec
    }
}
