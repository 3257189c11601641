//! Unit vocabulary and conversion constants
//!
//! Japanese cooking units with their water-equivalent gram factors, counter
//! words, and the per-food default weight of one counted piece.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::models::FoodNutrientProfile;

/// Category of a unit token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitCategory {
    /// g, kg
    Mass,
    /// 大さじ, 小さじ, カップ, 合, ml, L (water-equivalent density)
    Volume,
    /// 個, 本, 枚 ... resolved through the unit-weight table
    Count,
    /// cm (a length of ginger, leek ...)
    Length,
    /// 少々, 適量 ... no measurable amount
    Vague,
    /// A number with no unit at all
    Bare,
    /// A unit token outside the vocabulary
    Unknown,
}

impl UnitCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitCategory::Mass => "mass",
            UnitCategory::Volume => "volume",
            UnitCategory::Count => "count",
            UnitCategory::Length => "length",
            UnitCategory::Vague => "vague",
            UnitCategory::Bare => "bare",
            UnitCategory::Unknown => "unknown",
        }
    }
}

// ============================================================================
// Volume Conversion Constants (milliliters, water-equivalent grams)
// ============================================================================

/// Milliliters per 小さじ (teaspoon)
pub const ML_PER_KOSAJI: f64 = 5.0;
/// Milliliters per 大さじ (tablespoon)
pub const ML_PER_OSAJI: f64 = 15.0;
/// Milliliters per カップ (Japanese cup)
pub const ML_PER_CUP: f64 = 200.0;
/// Milliliters per 合 (rice cup)
pub const ML_PER_GO: f64 = 180.0;
/// Milliliters per liter
pub const ML_PER_LITER: f64 = 1000.0;

// ============================================================================
// Weight Conversion Constants (grams)
// ============================================================================

/// Grams per kilogram
pub const G_PER_KG: f64 = 1000.0;

/// Default grams assigned to vague amounts such as 少々
pub const DEFAULT_VAGUE_GRAMS: f64 = 2.0;
/// Default grams per centimeter (ginger, garlic sprouts ...)
pub const DEFAULT_GRAMS_PER_CM: f64 = 5.0;
/// Bare numbers at or above this are read as grams, below it as a piece count
pub const BARE_NUMBER_GRAMS_THRESHOLD: f64 = 5.0;

/// Units that are written before the number (大さじ2)
pub const PREFIX_UNITS: &[&str] = &["大さじ", "小さじ", "カップ"];

/// Counter words resolved through the unit-weight table
pub const COUNT_UNITS: &[&str] = &[
    "個分", "個", "本", "枚", "丁", "切れ", "かけ", "片", "束", "袋", "パック", "缶", "玉", "株",
];

/// Amounts with no measurable quantity
pub const VAGUE_WORDS: &[&str] = &["少々", "適量", "適宜", "お好みで", "ひとつまみ", "少量"];

/// Trailing hedges that make an amount approximate ("200g程度")
pub const HEDGE_SUFFIXES: &[&str] = &["程度", "くらい", "ぐらい", "ほど", "前後", "強", "弱"];

// ============================================================================
// Unit Recognition
// ============================================================================

/// Conversion factor to grams for a mass unit
pub fn grams_per_unit(unit: &str) -> Option<f64> {
    let lower = unit.trim().to_lowercase();

    match lower.as_str() {
        "g" | "グラム" => Some(1.0),
        "kg" | "キロ" | "キログラム" => Some(G_PER_KG),
        _ => None,
    }
}

/// Conversion factor to milliliters for a volume unit
pub fn ml_per_unit(unit: &str) -> Option<f64> {
    let lower = unit.trim().to_lowercase();

    match lower.as_str() {
        "小さじ" => Some(ML_PER_KOSAJI),
        "大さじ" => Some(ML_PER_OSAJI),
        "カップ" => Some(ML_PER_CUP),
        "合" => Some(ML_PER_GO),
        "ml" | "cc" | "ミリリットル" => Some(1.0),
        "l" | "リットル" => Some(ML_PER_LITER),
        _ => None,
    }
}

/// Determine the category of a unit token
pub fn categorize_unit(unit: &str) -> UnitCategory {
    let trimmed = unit.trim();

    if trimmed.is_empty() {
        return UnitCategory::Bare;
    }

    if grams_per_unit(trimmed).is_some() {
        return UnitCategory::Mass;
    }

    if ml_per_unit(trimmed).is_some() {
        return UnitCategory::Volume;
    }

    if COUNT_UNITS.contains(&trimmed) {
        return UnitCategory::Count;
    }

    if trimmed.eq_ignore_ascii_case("cm") {
        return UnitCategory::Length;
    }

    if VAGUE_WORDS.contains(&trimmed) {
        return UnitCategory::Vague;
    }

    UnitCategory::Unknown
}

// ============================================================================
// Unit-Weight Table
// ============================================================================

/// Grams of one counted piece (1個, 1本, 1枚 ...) per food
static UNIT_WEIGHTS: LazyLock<HashMap<&'static str, f64>> = LazyLock::new(|| {
    HashMap::from([
        ("卵", 60.0),
        ("たまご", 60.0),
        ("玉子", 60.0),
        ("鶏卵", 60.0),
        ("トマト", 150.0),
        ("ミニトマト", 15.0),
        ("たまねぎ", 200.0),
        ("玉ねぎ", 200.0),
        ("じゃがいも", 150.0),
        ("にんじん", 150.0),
        ("人参", 150.0),
        ("きゅうり", 100.0),
        ("なす", 80.0),
        ("ピーマン", 30.0),
        ("パプリカ", 150.0),
        ("にんにく", 6.0),
        ("しょうが", 15.0),
        ("生姜", 15.0),
        ("大根", 1000.0),
        ("だいこん", 1000.0),
        ("キャベツ", 1000.0),
        ("白菜", 2000.0),
        ("はくさい", 2000.0),
        ("レタス", 300.0),
        ("ブロッコリー", 300.0),
        ("かぼちゃ", 1500.0),
        ("さつまいも", 250.0),
        ("れんこん", 200.0),
        ("ごぼう", 150.0),
        ("長ねぎ", 100.0),
        ("ねぎ", 100.0),
        ("バナナ", 120.0),
        ("りんご", 300.0),
        ("みかん", 80.0),
        ("レモン", 100.0),
        ("鶏もも肉", 250.0),
        ("鶏むね肉", 250.0),
        ("鶏ささみ", 50.0),
        ("ささみ", 50.0),
        ("豚ロース", 200.0),
        ("豚バラ", 200.0),
        ("鮭", 80.0),
        ("しろさけ", 80.0),
        ("サーモン", 80.0),
        ("さば", 150.0),
        ("豆腐", 300.0),
        ("油揚げ", 30.0),
        ("厚揚げ", 150.0),
        ("生揚げ", 150.0),
        ("納豆", 45.0),
        ("ちくわ", 30.0),
        ("しいたけ", 15.0),
        ("ソーセージ", 20.0),
        ("ウインナー", 20.0),
        ("ベーコン", 17.0),
        ("ハム", 10.0),
        ("チーズ", 18.0),
        ("食パン", 60.0),
        ("パン", 60.0),
    ])
});

/// Default weight in grams of one counted piece of `food_name`
///
/// Exact key match first, then containment in either direction with the
/// longest key winning. An empty name never matches.
pub fn unit_weight(food_name: &str) -> Option<f64> {
    let name = food_name.trim();
    if name.is_empty() {
        return None;
    }

    if let Some(weight) = UNIT_WEIGHTS.get(name) {
        return Some(*weight);
    }

    UNIT_WEIGHTS
        .iter()
        .filter(|(key, _)| name.contains(*key) || key.contains(name))
        .max_by(|(a, _), (b, _)| {
            a.chars()
                .count()
                .cmp(&b.chars().count())
                // HashMap order is random; break ties on the key itself
                .then_with(|| b.cmp(a))
        })
        .map(|(_, weight)| *weight)
}

/// Piece weight for a line whose food matched `profile`
///
/// Exact keys are tried for the written name, the canonical name and each
/// synonym before any containment match, so "プチトマト" resolved to
/// ミニトマト weighs 15 g rather than a whole トマト.
pub fn unit_weight_for(food_name: &str, profile: Option<&FoodNutrientProfile>) -> Option<f64> {
    let Some(profile) = profile else {
        return unit_weight(food_name);
    };

    let exact = std::iter::once(food_name.trim())
        .chain(std::iter::once(profile.name.as_str()))
        .chain(profile.synonyms.iter().map(String::as_str))
        .find_map(|name| UNIT_WEIGHTS.get(name).copied());

    exact
        .or_else(|| unit_weight(food_name))
        .or_else(|| unit_weight(&profile.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_mass_units() {
        assert_eq!(categorize_unit("g"), UnitCategory::Mass);
        assert_eq!(categorize_unit("G"), UnitCategory::Mass);
        assert_eq!(categorize_unit("kg"), UnitCategory::Mass);
        assert_eq!(categorize_unit("グラム"), UnitCategory::Mass);
    }

    #[test]
    fn test_categorize_volume_units() {
        assert_eq!(categorize_unit("大さじ"), UnitCategory::Volume);
        assert_eq!(categorize_unit("小さじ"), UnitCategory::Volume);
        assert_eq!(categorize_unit("カップ"), UnitCategory::Volume);
        assert_eq!(categorize_unit("合"), UnitCategory::Volume);
        assert_eq!(categorize_unit("ml"), UnitCategory::Volume);
        assert_eq!(categorize_unit("L"), UnitCategory::Volume);
    }

    #[test]
    fn test_categorize_other_units() {
        assert_eq!(categorize_unit("個"), UnitCategory::Count);
        assert_eq!(categorize_unit("個分"), UnitCategory::Count);
        assert_eq!(categorize_unit("切れ"), UnitCategory::Count);
        assert_eq!(categorize_unit("cm"), UnitCategory::Length);
        assert_eq!(categorize_unit("少々"), UnitCategory::Vague);
        assert_eq!(categorize_unit(""), UnitCategory::Bare);
        assert_eq!(categorize_unit("杯"), UnitCategory::Unknown);
    }

    #[test]
    fn test_volume_factors() {
        assert_eq!(ml_per_unit("大さじ"), Some(15.0));
        assert_eq!(ml_per_unit("小さじ"), Some(5.0));
        assert_eq!(ml_per_unit("カップ"), Some(200.0));
        assert_eq!(ml_per_unit("合"), Some(180.0));
        assert_eq!(ml_per_unit("g"), None);
    }

    #[test]
    fn test_unit_weight_exact() {
        assert_eq!(unit_weight("卵"), Some(60.0));
        assert_eq!(unit_weight("トマト"), Some(150.0));
        assert_eq!(unit_weight("鶏もも肉"), Some(250.0));
    }

    #[test]
    fn test_unit_weight_longest_key_wins() {
        // contains both "トマト" and "ミニトマト"
        assert_eq!(unit_weight("完熟ミニトマト"), Some(15.0));
        // contains "ねぎ" and "長ねぎ"
        assert_eq!(unit_weight("太い長ねぎ"), Some(100.0));
    }

    fn profile(name: &str, synonyms: &[&str]) -> FoodNutrientProfile {
        FoodNutrientProfile {
            id: "0".to_string(),
            name: name.to_string(),
            group: String::new(),
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
            per_100g: Default::default(),
        }
    }

    #[test]
    fn test_unit_weight_through_matched_food() {
        let potato = profile("じゃがいも", &["ジャガイモ", "馬鈴薯"]);
        assert_eq!(unit_weight("ジャガイモ"), None);
        assert_eq!(unit_weight_for("ジャガイモ", Some(&potato)), Some(150.0));

        let onion = profile("たまねぎ", &["玉ねぎ", "玉葱"]);
        assert_eq!(unit_weight_for("玉葱", Some(&onion)), Some(200.0));

        // the loose hit on トマト must not beat the matched food
        let mini = profile("ミニトマト", &["プチトマト"]);
        assert_eq!(unit_weight("プチトマト"), Some(150.0));
        assert_eq!(unit_weight_for("プチトマト", Some(&mini)), Some(15.0));

        let salmon = profile("しろさけ", &["鮭", "しゃけ"]);
        assert_eq!(unit_weight_for("しゃけ", Some(&salmon)), Some(80.0));
    }

    #[test]
    fn test_unit_weight_for_without_profile() {
        assert_eq!(unit_weight_for("卵", None), Some(60.0));
        assert_eq!(unit_weight_for("未知の食品", None), None);
    }

    #[test]
    fn test_unit_weight_missing() {
        assert_eq!(unit_weight("未知の食品"), None);
        assert_eq!(unit_weight(""), None);
        assert_eq!(unit_weight("  "), None);
    }
}
