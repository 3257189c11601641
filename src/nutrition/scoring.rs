//! PFC ratio, balance score and target achievement
//!
//! The balance score compares the achieved protein/fat/carbohydrate energy
//! split with the target split:
//!
//! ```text
//! score = 1 - (|ΔP| + |ΔF| + |ΔC|) / deviation_ceiling      clamped to [0, 1]
//! ```
//!
//! The deltas are taken between integer percentages, so a meal that rounds
//! to the target split scores exactly 1.0.

use serde::{Deserialize, Serialize};

use super::targets::NutritionTargets;
use crate::models::NutrientAmounts;

/// Round half up to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round half up to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage of total Atwater energy from protein, fat and carbohydrate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PfcRatio {
    pub protein_pct: u32,
    pub fat_pct: u32,
    pub carb_pct: u32,
}

impl PfcRatio {
    /// `None` when the nutrients carry no macronutrient energy
    pub fn from_nutrients(nutrients: &NutrientAmounts) -> Option<Self> {
        let (protein, fat, carb) = nutrients.atwater_kcal();
        let total = protein + fat + carb;
        if !(total > 0.0) {
            return None;
        }

        let pct = |kcal: f64| (kcal / total * 100.0).round() as u32;
        Some(Self {
            protein_pct: pct(protein),
            fat_pct: pct(fat),
            carb_pct: pct(carb),
        })
    }

    /// Sum of absolute percentage-point differences from the target split
    pub fn deviation(&self, targets: &NutritionTargets) -> f64 {
        (f64::from(self.protein_pct) - targets.protein_pct()).abs()
            + (f64::from(self.fat_pct) - targets.fat_pct()).abs()
            + (f64::from(self.carb_pct) - targets.carb_pct()).abs()
    }
}

/// Balance score in [0.0, 1.0]; 0.0 without a PFC ratio
pub fn balance_score(pfc: Option<&PfcRatio>, targets: &NutritionTargets) -> f64 {
    match pfc {
        Some(pfc) => {
            let raw = 1.0 - pfc.deviation(targets) / targets.deviation_ceiling();
            raw.clamp(0.0, 1.0)
        }
        None => 0.0,
    }
}

/// Percentage of each absolute target reached
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetAchievement {
    pub energy_pct: u32,
    pub protein_pct: u32,
    pub fat_pct: u32,
    pub carbohydrate_pct: u32,
    /// Against the daily fiber minimum
    pub fiber_pct: u32,
    /// Against the daily salt maximum
    pub salt_pct: u32,
    pub salt_within_limit: bool,
    pub fiber_met: bool,
}

impl TargetAchievement {
    pub fn compute(nutrients: &NutrientAmounts, targets: &NutritionTargets) -> Self {
        let pct = |value: f64, target: f64| (value / target * 100.0).round().max(0.0) as u32;

        Self {
            energy_pct: pct(nutrients.energy_kcal, targets.energy_kcal()),
            protein_pct: pct(nutrients.protein_g, targets.protein_g()),
            fat_pct: pct(nutrients.fat_g, targets.fat_g()),
            carbohydrate_pct: pct(nutrients.carbohydrate_g, targets.carb_g()),
            fiber_pct: pct(nutrients.fiber_g, targets.fiber_min_g()),
            salt_pct: pct(nutrients.salt_equivalent_g, targets.salt_max_g()),
            salt_within_limit: nutrients.salt_equivalent_g <= targets.salt_max_g(),
            fiber_met: nutrients.fiber_g >= targets.fiber_min_g(),
        }
    }
}

/// Aggregated nutrients scored against targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyNutritionTotals {
    pub nutrients: NutrientAmounts,
    pub pfc: Option<PfcRatio>,
    pub balance_score: f64,
    pub achievement: TargetAchievement,
    pub targets: NutritionTargets,
}

impl DailyNutritionTotals {
    pub fn score(nutrients: NutrientAmounts, targets: &NutritionTargets) -> Self {
        let pfc = PfcRatio::from_nutrients(&nutrients);
        Self {
            balance_score: balance_score(pfc.as_ref(), targets),
            achievement: TargetAchievement::compute(&nutrients, targets),
            pfc,
            nutrients,
            targets: *targets,
        }
    }

    /// Display-ready values
    pub fn summary(&self) -> NutritionSummary {
        NutritionSummary {
            total_energy_kcal: round1(self.nutrients.energy_kcal),
            total_protein_g: round1(self.nutrients.protein_g),
            total_fat_g: round1(self.nutrients.fat_g),
            total_carbs_g: round1(self.nutrients.carbohydrate_g),
            total_fiber_g: round1(self.nutrients.fiber_g),
            total_salt_g: round1(self.nutrients.salt_equivalent_g),
            protein_pct: self.pfc.map(|p| p.protein_pct),
            fat_pct: self.pfc.map(|p| p.fat_pct),
            carb_pct: self.pfc.map(|p| p.carb_pct),
            total_sodium_mg: round1(self.nutrients.sodium_mg),
            total_calcium_mg: round1(self.nutrients.calcium_mg),
            total_iron_mg: round1(self.nutrients.iron_mg),
            total_vitamin_a_ug: round1(self.nutrients.vitamin_a_ug),
            total_vitamin_b1_mg: round2(self.nutrients.vitamin_b1_mg),
            total_vitamin_b2_mg: round2(self.nutrients.vitamin_b2_mg),
            total_vitamin_c_mg: round1(self.nutrients.vitamin_c_mg),
            total_vitamin_d_ug: round1(self.nutrients.vitamin_d_ug),
            balance_score: round2(self.balance_score),
            achievement: self.achievement,
            targets: self.targets,
        }
    }
}

/// Rounded summary for display and JSON output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionSummary {
    pub total_energy_kcal: f64,
    pub total_protein_g: f64,
    pub total_fat_g: f64,
    pub total_carbs_g: f64,
    pub total_fiber_g: f64,
    pub total_salt_g: f64,
    pub protein_pct: Option<u32>,
    pub fat_pct: Option<u32>,
    pub carb_pct: Option<u32>,
    pub total_sodium_mg: f64,
    pub total_calcium_mg: f64,
    pub total_iron_mg: f64,
    pub total_vitamin_a_ug: f64,
    /// Two decimals; daily amounts are around 1 mg
    pub total_vitamin_b1_mg: f64,
    pub total_vitamin_b2_mg: f64,
    pub total_vitamin_c_mg: f64,
    pub total_vitamin_d_ug: f64,
    pub balance_score: f64,
    pub achievement: TargetAchievement,
    pub targets: NutritionTargets,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::targets::TargetsSpec;

    fn macros(protein_g: f64, fat_g: f64, carbohydrate_g: f64) -> NutrientAmounts {
        NutrientAmounts {
            energy_kcal: protein_g * 4.0 + fat_g * 9.0 + carbohydrate_g * 4.0,
            protein_g,
            fat_g,
            carbohydrate_g,
            ..NutrientAmounts::zero()
        }
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round1(6.75), 6.8);
        assert_eq!(round1(6.74), 6.7);
        assert_eq!(round1(0.05), 0.1);
        assert_eq!(round2(0.125), 0.13);
    }

    #[test]
    fn test_pfc_ratio() {
        // 200 / 300 / 500 kcal
        let pfc = PfcRatio::from_nutrients(&macros(50.0, 33.333, 125.0)).unwrap();
        assert_eq!(pfc, PfcRatio { protein_pct: 20, fat_pct: 30, carb_pct: 50 });
    }

    #[test]
    fn test_pfc_ratio_without_macros() {
        assert_eq!(PfcRatio::from_nutrients(&NutrientAmounts::zero()), None);
    }

    #[test]
    fn test_perfect_match_scores_one() {
        let targets = NutritionTargets::default();
        // 300 / 500 / 1200 kcal = 15 / 25 / 60
        let totals = DailyNutritionTotals::score(macros(75.0, 55.5556, 300.0), &targets);
        assert_eq!(totals.balance_score, 1.0);
    }

    #[test]
    fn test_all_carbohydrate_scores_below_one() {
        let targets = NutritionTargets::default();
        let totals = DailyNutritionTotals::score(macros(0.0, 0.0, 250.0), &targets);
        assert_eq!(totals.pfc, Some(PfcRatio { protein_pct: 0, fat_pct: 0, carb_pct: 100 }));
        assert!(totals.balance_score < 1.0);
        assert!(totals.balance_score >= 0.0);
        // deviation 15 + 25 + 40 = 80 over a ceiling of 200
        assert!((totals.balance_score - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_score_bounded_for_any_split() {
        let targets = NutritionTargets::default();
        let tight = NutritionTargets::new(TargetsSpec {
            deviation_ceiling: 20.0,
            ..TargetsSpec::default()
        })
        .unwrap();

        for p in (0..=100).step_by(5) {
            for f in (0..=(100 - p)).step_by(5) {
                let c = 100 - p - f;
                let n = macros(p as f64 / 4.0, f as f64 / 9.0, c as f64 / 4.0);
                for t in [&targets, &tight] {
                    let score = DailyNutritionTotals::score(n, t).balance_score;
                    assert!((0.0..=1.0).contains(&score), "p={} f={} score={}", p, f, score);
                }
            }
        }
    }

    #[test]
    fn test_score_decreases_with_deviation() {
        let targets = NutritionTargets::default();
        let near = DailyNutritionTotals::score(macros(80.0 / 4.0, 250.0 / 9.0, 620.0 / 4.0), &targets);
        let far = DailyNutritionTotals::score(macros(300.0 / 4.0, 400.0 / 9.0, 300.0 / 4.0), &targets);
        assert!(near.balance_score > far.balance_score);
    }

    #[test]
    fn test_empty_scores_zero() {
        let totals = DailyNutritionTotals::score(NutrientAmounts::zero(), &NutritionTargets::default());
        assert_eq!(totals.balance_score, 0.0);
        assert_eq!(totals.achievement.energy_pct, 0);
        assert!(totals.achievement.salt_within_limit);
        assert!(!totals.achievement.fiber_met);
    }

    #[test]
    fn test_achievement() {
        let nutrients = NutrientAmounts {
            energy_kcal: 1856.0,
            protein_g: 75.0,
            fat_g: 30.0,
            carbohydrate_g: 150.0,
            fiber_g: 21.0,
            salt_equivalent_g: 9.0,
            ..NutrientAmounts::zero()
        };
        let a = TargetAchievement::compute(&nutrients, &NutritionTargets::default());
        assert_eq!(a.energy_pct, 93);
        assert_eq!(a.protein_pct, 100);
        assert_eq!(a.carbohydrate_pct, 50);
        assert_eq!(a.fiber_pct, 100);
        assert_eq!(a.salt_pct, 120);
        assert!(!a.salt_within_limit);
        assert!(a.fiber_met);
    }

    #[test]
    fn test_summary_rounds() {
        let nutrients = NutrientAmounts {
            energy_kcal: 281.85,
            salt_equivalent_g: 6.75,
            ..macros(24.6, 20.6, 0.6)
        };
        let summary = DailyNutritionTotals::score(nutrients, &NutritionTargets::default()).summary();
        assert_eq!(summary.total_energy_kcal, 281.9);
        assert_eq!(summary.total_salt_g, 6.8);
        assert_eq!(summary.total_protein_g, 24.6);
    }

    #[test]
    fn test_summary_carries_achievement_and_micronutrients() {
        let nutrients = NutrientAmounts {
            calcium_mg: 123.45,
            vitamin_b1_mg: 0.456,
            salt_equivalent_g: 3.75,
            ..macros(37.5, 27.8, 150.0)
        };
        let summary = DailyNutritionTotals::score(nutrients, &NutritionTargets::default()).summary();
        assert_eq!(summary.total_calcium_mg, 123.5);
        assert_eq!(summary.total_vitamin_b1_mg, 0.46);
        assert_eq!(summary.achievement.protein_pct, 50);
        assert_eq!(summary.achievement.carbohydrate_pct, 50);
        assert_eq!(summary.achievement.salt_pct, 50);
        assert!(summary.achievement.salt_within_limit);
    }
}
