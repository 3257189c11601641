//! Shared nutrient data structure
//!
//! Used for per-100g reference profiles, per-line contributions, meal and
//! daily totals.

use serde::{Deserialize, Serialize};

/// Atwater energy factor for protein (kcal/g)
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
/// Atwater energy factor for fat (kcal/g)
pub const KCAL_PER_G_FAT: f64 = 9.0;
/// Atwater energy factor for carbohydrate (kcal/g)
pub const KCAL_PER_G_CARBOHYDRATE: f64 = 4.0;

/// Nutrient amounts
///
/// Micronutrients default to zero so tables carrying only the energy and
/// macronutrient columns still load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientAmounts {
    pub energy_kcal: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbohydrate_g: f64,
    pub fiber_g: f64,
    pub salt_equivalent_g: f64,

    #[serde(default)]
    pub sodium_mg: f64,
    #[serde(default)]
    pub calcium_mg: f64,
    #[serde(default)]
    pub iron_mg: f64,
    /// Retinol activity equivalent
    #[serde(default)]
    pub vitamin_a_ug: f64,
    #[serde(default)]
    pub vitamin_b1_mg: f64,
    #[serde(default)]
    pub vitamin_b2_mg: f64,
    #[serde(default)]
    pub vitamin_c_mg: f64,
    #[serde(default)]
    pub vitamin_d_ug: f64,
}

impl NutrientAmounts {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Scale every value by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            energy_kcal: self.energy_kcal * multiplier,
            protein_g: self.protein_g * multiplier,
            fat_g: self.fat_g * multiplier,
            carbohydrate_g: self.carbohydrate_g * multiplier,
            fiber_g: self.fiber_g * multiplier,
            salt_equivalent_g: self.salt_equivalent_g * multiplier,
            sodium_mg: self.sodium_mg * multiplier,
            calcium_mg: self.calcium_mg * multiplier,
            iron_mg: self.iron_mg * multiplier,
            vitamin_a_ug: self.vitamin_a_ug * multiplier,
            vitamin_b1_mg: self.vitamin_b1_mg * multiplier,
            vitamin_b2_mg: self.vitamin_b2_mg * multiplier,
            vitamin_c_mg: self.vitamin_c_mg * multiplier,
            vitamin_d_ug: self.vitamin_d_ug * multiplier,
        }
    }

    /// Amounts contained in `grams` of a food whose profile is per 100g
    pub fn for_grams(&self, grams: f64) -> Self {
        self.scale(grams / 100.0)
    }

    pub fn add(&self, other: &NutrientAmounts) -> Self {
        Self {
            energy_kcal: self.energy_kcal + other.energy_kcal,
            protein_g: self.protein_g + other.protein_g,
            fat_g: self.fat_g + other.fat_g,
            carbohydrate_g: self.carbohydrate_g + other.carbohydrate_g,
            fiber_g: self.fiber_g + other.fiber_g,
            salt_equivalent_g: self.salt_equivalent_g + other.salt_equivalent_g,
            sodium_mg: self.sodium_mg + other.sodium_mg,
            calcium_mg: self.calcium_mg + other.calcium_mg,
            iron_mg: self.iron_mg + other.iron_mg,
            vitamin_a_ug: self.vitamin_a_ug + other.vitamin_a_ug,
            vitamin_b1_mg: self.vitamin_b1_mg + other.vitamin_b1_mg,
            vitamin_b2_mg: self.vitamin_b2_mg + other.vitamin_b2_mg,
            vitamin_c_mg: self.vitamin_c_mg + other.vitamin_c_mg,
            vitamin_d_ug: self.vitamin_d_ug + other.vitamin_d_ug,
        }
    }

    /// Energy from protein, fat and carbohydrate using Atwater factors
    pub fn atwater_kcal(&self) -> (f64, f64, f64) {
        (
            self.protein_g * KCAL_PER_G_PROTEIN,
            self.fat_g * KCAL_PER_G_FAT,
            self.carbohydrate_g * KCAL_PER_G_CARBOHYDRATE,
        )
    }

    /// Iterate `(field name, value)` pairs
    pub fn fields(&self) -> [(&'static str, f64); 14] {
        [
            ("energy_kcal", self.energy_kcal),
            ("protein_g", self.protein_g),
            ("fat_g", self.fat_g),
            ("carbohydrate_g", self.carbohydrate_g),
            ("fiber_g", self.fiber_g),
            ("salt_equivalent_g", self.salt_equivalent_g),
            ("sodium_mg", self.sodium_mg),
            ("calcium_mg", self.calcium_mg),
            ("iron_mg", self.iron_mg),
            ("vitamin_a_ug", self.vitamin_a_ug),
            ("vitamin_b1_mg", self.vitamin_b1_mg),
            ("vitamin_b2_mg", self.vitamin_b2_mg),
            ("vitamin_c_mg", self.vitamin_c_mg),
            ("vitamin_d_ug", self.vitamin_d_ug),
        ]
    }
}

impl std::ops::Add for NutrientAmounts {
    type Output = NutrientAmounts;

    fn add(self, other: NutrientAmounts) -> NutrientAmounts {
        NutrientAmounts::add(&self, &other)
    }
}

impl std::ops::AddAssign for NutrientAmounts {
    fn add_assign(&mut self, other: NutrientAmounts) {
        *self = NutrientAmounts::add(self, &other);
    }
}

impl std::ops::Mul<f64> for NutrientAmounts {
    type Output = NutrientAmounts;

    fn mul(self, multiplier: f64) -> NutrientAmounts {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for NutrientAmounts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(NutrientAmounts::zero(), |acc, n| acc + n)
    }
}
