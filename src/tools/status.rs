//! Status Tool
//!
//! Provides runtime status information and usage instructions.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::nutrition::NutritionEstimator;

/// Estimation instructions for AI assistants
pub const NUTRITION_INSTRUCTIONS: &str = r#"
# Fridge Nutrition Instructions

This guide explains how to estimate nutrition for Japanese recipe ingredients.

## Overview

Every ingredient is a food name plus a free-text quantity, exactly as written
in a recipe:

| name | quantity |
|------|----------|
| 鶏もも肉 | 300g |
| 卵 | 2個 |
| しょうゆ | 大さじ1と1/2 |
| 塩 | 少々 |

Quantities are converted to grams, foods are matched against the reference
table (日本食品標準成分表), and the totals are scored against daily targets.

---

## Tools

- `estimate_nutrition` - totals for a list of ingredients
- `estimate_meal_plan` - one person's share of several recipes, scored as a day
- `parse_quantity` - check how a quantity expression converts to grams
- `lookup_food` / `search_foods` - check which reference food a name resolves to
- `get_nutrition_targets` - the daily targets in use

---

## Quantity Expressions

| Expression | Grams | Confidence |
|------------|-------|------------|
| `300g`, `1.5kg` | as written | exact |
| `大さじ2`, `大さじ2杯`, `小さじ1/2`, `カップ1`, `1合`, `200ml` | water equivalent (15, 5, 200, 180 ml) | exact |
| `1個(60g)`, `1/2本（100ｇ）` | the annotated weight | exact |
| `2個`, `1/2本`, `1かけ` | default weight of one piece of that food | estimated |
| `2~3個`, `200g程度` | midpoint / hedged value | estimated |
| `3cm` | 5 g per cm | estimated |
| `少々`, `適量`, empty | 2 g | estimated |
| `2枚` for a food with no known piece weight | 0 g | unresolved |

Unresolved lines and unknown foods are listed under `unscored` with a reason
and do not count toward the totals. If a line matters, restate it with a gram
amount.

---

## Reading the Result

- `summary.total_*` - rounded totals
- `summary.protein_pct` / `fat_pct` / `carb_pct` - share of energy (Atwater 4/9/4)
- `summary.balance_score` - 1.0 when the split matches the target split, lower
  as it drifts away, 0.0 when nothing could be scored
- `summary.achievement` - percentage of each daily target reached, plus
  `salt_within_limit` and `fiber_met`
- `summary.total_calcium_mg`, `total_iron_mg`, `total_vitamin_*` - micronutrients

## Recipes

`estimate_meal_plan` takes recipes with a `serving` text such as `2人分` or
`4人前`. Totals are divided by the serving count so the day reflects one
person. Rows marked `headline` (section titles like `(A)`) are skipped.
"#;

/// Runtime status of the service
#[derive(Debug, Clone, Serialize)]
pub struct FridgeStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Reference table information
    pub reference_source: String,
    pub reference_foods: usize,
    pub cached_lookups: usize,

    /// Process information
    pub started_at: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    started_at: DateTime<Utc>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            started_at: Utc::now(),
        }
    }

    /// Get the current status
    pub fn get_status(&self, estimator: &NutritionEstimator) -> FridgeStatus {
        let build_info = BuildInfo::current();

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        FridgeStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            reference_source: estimator.reference().source().to_string(),
            reference_foods: estimator.reference().len(),
            cached_lookups: estimator.cached_lookups(),
            started_at: self.started_at,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}
