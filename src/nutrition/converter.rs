//! Quantity parsing and gram conversion
//!
//! Turns free-text Japanese quantity expressions ("大さじ2", "1/2個(100g)",
//! "300g程度", "少々") into grams for a given food.

use serde::{Deserialize, Serialize};

use super::units::{
    categorize_unit, grams_per_unit, ml_per_unit, unit_weight, UnitCategory,
    BARE_NUMBER_GRAMS_THRESHOLD, DEFAULT_GRAMS_PER_CM, DEFAULT_VAGUE_GRAMS, HEDGE_SUFFIXES,
    PREFIX_UNITS, VAGUE_WORDS,
};
use crate::models::NormalizedQuantity;

/// Tunable fallbacks used when an expression carries no measurable amount
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitSettings {
    /// Grams assigned to 少々, 適量, empty or unknown units
    pub vague_grams: f64,
    /// Grams per centimeter for length-based amounts
    pub cm_grams: f64,
}

impl Default for UnitSettings {
    fn default() -> Self {
        Self {
            vague_grams: DEFAULT_VAGUE_GRAMS,
            cm_grams: DEFAULT_GRAMS_PER_CM,
        }
    }
}

/// A quantity expression split into amount and unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedQuantity {
    pub amount: f64,
    /// The unit token as written, after width folding ("大さじ", "個", "g")
    pub unit: String,
    pub category: UnitCategory,
    /// Range or hedge ("2~3個", "200g程度")
    pub approximate: bool,
    /// Total weight given in parentheses ("1個(60g)")
    pub annotated_grams: Option<f64>,
}

impl ParsedQuantity {
    fn new(amount: f64, unit: &str) -> Self {
        Self {
            amount,
            unit: unit.to_string(),
            category: categorize_unit(unit),
            approximate: false,
            annotated_grams: None,
        }
    }

    fn vague(unit: &str) -> Self {
        Self {
            amount: 1.0,
            unit: unit.to_string(),
            category: UnitCategory::Vague,
            approximate: false,
            annotated_grams: None,
        }
    }
}

/// Fold full-width ASCII and wave dashes to their half-width forms
///
/// Recipe text mixes "３個", "１／２本" and "100ｇ" freely.
pub fn normalize_width(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{FF01}'..='\u{FF5E}' => {
                char::from_u32(c as u32 - 0xFEE0).unwrap_or(c)
            }
            '\u{3000}' => ' ',
            '〜' => '~',
            _ => c,
        })
        .collect()
}

/// Split a parenthetical gram annotation off the end of an expression
///
/// "1/2個(100g)" -> ("1/2個", Some(100.0))
fn split_annotation(text: &str) -> (String, Option<f64>) {
    if let Some(paren_start) = text.find('(') {
        if let Some(paren_len) = text[paren_start..].find(')') {
            let paren_end = paren_start + paren_len;
            let annotation = &text[paren_start + 1..paren_end];
            let outside = format!("{}{}", &text[..paren_start], &text[paren_end + 1..]);
            return (outside.trim().to_string(), parse_gram_annotation(annotation));
        }
    }
    (text.to_string(), None)
}

/// Parse a gram annotation like "60g", "約60g" or "1.2kg"
fn parse_gram_annotation(s: &str) -> Option<f64> {
    let trimmed = s.trim().trim_start_matches('約').trim();
    let lower = trimmed.to_lowercase();

    for (suffix, factor) in [("kg", 1000.0), ("g", 1.0), ("グラム", 1.0)] {
        if let Some(num_part) = lower.strip_suffix(suffix) {
            if let Some(val) = parse_number(num_part.trim()) {
                return Some(val * factor);
            }
        }
    }

    None
}

/// Parse a number that may be a fraction, a mixed number, 半 or a range
///
/// Ranges ("2~3") yield their midpoint.
pub fn parse_number(s: &str) -> Option<f64> {
    parse_number_with_range(s).map(|(value, _)| value)
}

fn parse_number_with_range(s: &str) -> Option<(f64, bool)> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Some((low, high)) = s.split_once('~') {
        let low = parse_simple_number(low)?;
        let high = parse_simple_number(high)?;
        return Some(((low + high) / 2.0, true));
    }

    parse_simple_number(s).map(|v| (v, false))
}

fn parse_simple_number(s: &str) -> Option<f64> {
    let s = s.trim();

    if s == "半" {
        return Some(0.5);
    }

    // "1と1/2"
    if let Some((whole, frac)) = s.split_once('と') {
        let value = parse_simple_number(whole)? + parse_simple_number(frac)?;
        return value.is_finite().then_some(value);
    }

    if let Some((num, den)) = s.split_once('/') {
        let num: f64 = num.trim().parse().ok()?;
        let den: f64 = den.trim().parse().ok()?;
        if den == 0.0 {
            return None;
        }
        let value = num / den;
        return value.is_finite().then_some(value);
    }

    let value: f64 = s.parse().ok()?;
    value.is_finite().then_some(value)
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '/' | '~' | 'と' | '半')
}

/// Strip trailing hedges such as "程度"; returns whether any were found
fn strip_hedges(text: &str) -> (&str, bool) {
    let mut rest = text.trim();
    let mut hedged = false;
    let mut changed = true;

    while changed {
        changed = false;
        for suffix in HEDGE_SUFFIXES {
            if let Some(stripped) = rest.strip_suffix(suffix) {
                rest = stripped.trim_end();
                hedged = true;
                changed = true;
            }
        }
    }

    (rest, hedged)
}

/// Parse a quantity expression into amount and unit
///
/// Examples:
/// - "大さじ2" -> 2 × 大さじ
/// - "1/2本" -> 0.5 × 本
/// - "300g" -> 300 × g
/// - "少々" -> vague
pub fn parse_quantity(text: &str) -> ParsedQuantity {
    let folded = normalize_width(text);
    let (without_annotation, annotated_grams) = split_annotation(folded.trim());
    let (body, hedged) = strip_hedges(&without_annotation);
    let body = body.trim().trim_start_matches('約').trim();

    let mut parsed = parse_body(body);
    parsed.approximate |= hedged;
    parsed.annotated_grams = annotated_grams;
    parsed
}

fn parse_body(body: &str) -> ParsedQuantity {
    if body.is_empty() {
        return ParsedQuantity::vague("");
    }

    if VAGUE_WORDS.contains(&body) {
        return ParsedQuantity::vague(body);
    }

    // Unit-first form: 大さじ2, 小さじ1/2杯, カップ1
    for unit in PREFIX_UNITS {
        if let Some(rest) = body.strip_prefix(unit) {
            return parse_after_prefix_unit(unit, rest.trim());
        }
    }

    // Number-first form: 300g, 3個, 1/2本
    let split_at = body
        .char_indices()
        .find(|(_, c)| !is_number_char(*c))
        .map(|(i, _)| i)
        .unwrap_or(body.len());
    let (number, unit) = body.split_at(split_at);
    let unit = unit.trim();

    if number.is_empty() {
        // A counter with no number ("個") still means one of it
        return ParsedQuantity::new(1.0, unit);
    }

    match parse_number_with_range(number) {
        Some((amount, approximate)) => ParsedQuantity {
            approximate,
            ..ParsedQuantity::new(amount, unit)
        },
        None => ParsedQuantity {
            category: UnitCategory::Unknown,
            ..ParsedQuantity::new(1.0, body)
        },
    }
}

/// Amount following a prefix unit. Only a trailing 杯 is understood; any
/// other leftover text ("山盛り", "強") makes the amount approximate.
fn parse_after_prefix_unit(unit: &str, rest: &str) -> ParsedQuantity {
    let split_at = rest
        .char_indices()
        .find(|(_, c)| !is_number_char(*c))
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    let (number, leftover) = rest.split_at(split_at);
    let leftover = leftover.trim();
    let extra_text = !(leftover.is_empty() || leftover == "杯");

    if number.is_empty() {
        return ParsedQuantity {
            approximate: extra_text,
            ..ParsedQuantity::new(1.0, unit)
        };
    }

    match parse_number_with_range(number) {
        Some((amount, ranged)) => ParsedQuantity {
            approximate: ranged || extra_text,
            ..ParsedQuantity::new(amount, unit)
        },
        None => ParsedQuantity {
            approximate: true,
            ..ParsedQuantity::new(1.0, unit)
        },
    }
}

/// Convert a parsed quantity of `food_name` to grams
pub fn to_grams(
    parsed: &ParsedQuantity,
    food_name: &str,
    settings: &UnitSettings,
) -> NormalizedQuantity {
    to_grams_with_weight(parsed, unit_weight(food_name), settings)
}

/// Convert a parsed quantity to grams with a known weight for one piece
///
/// Counts resolve through `piece_grams`; without it they are unresolved.
pub fn to_grams_with_weight(
    parsed: &ParsedQuantity,
    piece_grams: Option<f64>,
    settings: &UnitSettings,
) -> NormalizedQuantity {
    let normalized = if let Some(grams) = parsed.annotated_grams {
        NormalizedQuantity::exact(grams)
    } else {
        match parsed.category {
            UnitCategory::Mass => match grams_per_unit(&parsed.unit) {
                Some(factor) => NormalizedQuantity::exact(parsed.amount * factor),
                None => NormalizedQuantity::estimated(settings.vague_grams),
            },
            UnitCategory::Volume => match ml_per_unit(&parsed.unit) {
                Some(ml) => NormalizedQuantity::exact(parsed.amount * ml),
                None => NormalizedQuantity::estimated(settings.vague_grams),
            },
            UnitCategory::Count => count_to_grams(parsed.amount, piece_grams),
            UnitCategory::Length => NormalizedQuantity::estimated(parsed.amount * settings.cm_grams),
            UnitCategory::Bare => {
                if parsed.amount >= BARE_NUMBER_GRAMS_THRESHOLD {
                    NormalizedQuantity::estimated(parsed.amount)
                } else {
                    count_to_grams(parsed.amount, piece_grams)
                }
            }
            UnitCategory::Vague | UnitCategory::Unknown => {
                NormalizedQuantity::estimated(settings.vague_grams)
            }
        }
    };

    if parsed.approximate {
        NormalizedQuantity {
            confidence: normalized.confidence.weakened(),
            ..normalized
        }
    } else {
        normalized
    }
}

fn count_to_grams(amount: f64, piece_grams: Option<f64>) -> NormalizedQuantity {
    match piece_grams {
        Some(weight) => NormalizedQuantity::estimated(amount * weight),
        None => {
            tracing::debug!("No piece weight; count of {} cannot be resolved", amount);
            NormalizedQuantity::unresolved()
        }
    }
}

/// Parse a quantity expression and convert it to grams in one step
pub fn normalize_quantity(
    text: &str,
    food_name: &str,
    settings: &UnitSettings,
) -> NormalizedQuantity {
    to_grams(&parse_quantity(text), food_name, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Confidence;

    fn grams(text: &str, food: &str) -> NormalizedQuantity {
        normalize_quantity(text, food, &UnitSettings::default())
    }

    #[test]
    fn test_parse_tablespoon() {
        let parsed = parse_quantity("大さじ2");
        assert_eq!(parsed.amount, 2.0);
        assert_eq!(parsed.unit, "大さじ");
        assert_eq!(parsed.category, UnitCategory::Volume);
    }

    #[test]
    fn test_parse_prefix_unit_without_number() {
        let parsed = parse_quantity("カップ");
        assert_eq!(parsed.amount, 1.0);
        assert_eq!(parsed.unit, "カップ");
    }

    #[test]
    fn test_parse_counter_and_fraction() {
        let parsed = parse_quantity("3個");
        assert_eq!(parsed.amount, 3.0);
        assert_eq!(parsed.unit, "個");
        assert_eq!(parsed.category, UnitCategory::Count);

        let parsed = parse_quantity("1/2本");
        assert_eq!(parsed.amount, 0.5);
        assert_eq!(parsed.unit, "本");

        let parsed = parse_quantity("小さじ1/2");
        assert_eq!(parsed.amount, 0.5);
        assert_eq!(parsed.unit, "小さじ");
    }

    #[test]
    fn test_prefix_unit_with_cup_counter() {
        let q = grams("大さじ2杯", "しょうゆ");
        assert_eq!(q.grams, 30.0);
        assert_eq!(q.confidence, Confidence::Exact);

        let q = grams("小さじ1/2杯", "塩");
        assert_eq!(q.grams, 2.5);
        assert_eq!(q.confidence, Confidence::Exact);

        let q = grams("大さじ1と1/2杯", "みりん");
        assert_eq!(q.grams, 22.5);
        assert_eq!(q.confidence, Confidence::Exact);
    }

    #[test]
    fn test_prefix_unit_with_extra_text_is_estimated() {
        let q = grams("大さじ1山盛り", "砂糖");
        assert_eq!(q.grams, 15.0);
        assert_eq!(q.confidence, Confidence::Estimated);

        let q = grams("カップ1強", "水");
        assert_eq!(q.grams, 200.0);
        assert_eq!(q.confidence, Confidence::Estimated);

        // a number that does not parse falls back to one unit
        let q = grams("大さじ1/0", "酢");
        assert_eq!(q.grams, 15.0);
        assert_eq!(q.confidence, Confidence::Estimated);
    }

    #[test]
    fn test_overflowing_fraction_is_rejected() {
        let huge = format!("{}/2", "9".repeat(400));
        assert_eq!(parse_number(&huge), None);
        assert_eq!(parse_number(&format!("1と{}", huge)), None);

        let q = grams(&format!("{}個", huge), "卵");
        assert!(q.grams.is_finite());
        assert_eq!(q.confidence, Confidence::Estimated);
    }

    #[test]
    fn test_count_with_explicit_piece_weight() {
        let settings = UnitSettings::default();
        let q = to_grams_with_weight(&parse_quantity("5個"), Some(15.0), &settings);
        assert_eq!(q.grams, 75.0);
        assert_eq!(q.confidence, Confidence::Estimated);

        assert!(to_grams_with_weight(&parse_quantity("2枚"), None, &settings).is_unresolved());
        assert_eq!(to_grams_with_weight(&parse_quantity("300g"), None, &settings).grams, 300.0);
    }

    #[test]
    fn test_parse_mixed_and_half() {
        assert_eq!(parse_quantity("1と1/2カップ").amount, 1.5);
        assert_eq!(parse_quantity("半個").amount, 0.5);
    }

    #[test]
    fn test_parse_full_width() {
        let parsed = parse_quantity("３００ｇ");
        assert_eq!(parsed.amount, 300.0);
        assert_eq!(parsed.category, UnitCategory::Mass);

        let parsed = parse_quantity("１／２個");
        assert_eq!(parsed.amount, 0.5);
        assert_eq!(parsed.unit, "個");
    }

    #[test]
    fn test_parse_range_is_approximate() {
        let parsed = parse_quantity("2〜3個");
        assert_eq!(parsed.amount, 2.5);
        assert!(parsed.approximate);
    }

    #[test]
    fn test_parse_hedge_and_annotation() {
        let parsed = parse_quantity("200g程度");
        assert_eq!(parsed.amount, 200.0);
        assert_eq!(parsed.unit, "g");
        assert!(parsed.approximate);

        let parsed = parse_quantity("1/2個(100g)");
        assert_eq!(parsed.amount, 0.5);
        assert_eq!(parsed.unit, "個");
        assert_eq!(parsed.annotated_grams, Some(100.0));

        let parsed = parse_quantity("1枚（約250ｇ）");
        assert_eq!(parsed.annotated_grams, Some(250.0));
    }

    #[test]
    fn test_parse_vague_and_empty() {
        assert_eq!(parse_quantity("少々").category, UnitCategory::Vague);
        assert_eq!(parse_quantity("").category, UnitCategory::Vague);
        assert_eq!(parse_quantity("   ").category, UnitCategory::Vague);
    }

    #[test]
    fn test_mass_is_exact() {
        for value in [1.0, 5.5, 42.0, 300.0, 1234.0] {
            let q = grams(&format!("{}g", value), "なんでも");
            assert_eq!(q.grams, value);
            assert_eq!(q.confidence, Confidence::Exact);
        }
        let q = grams("1.5kg", "豚肉");
        assert_eq!(q.grams, 1500.0);
        assert_eq!(q.confidence, Confidence::Exact);
    }

    #[test]
    fn test_volume_is_water_equivalent_and_exact() {
        for (unit, ml) in [("大さじ", 15.0), ("小さじ", 5.0), ("カップ", 200.0), ("合", 180.0)] {
            for count in [1.0, 2.0, 3.0] {
                let text = if unit == "合" {
                    format!("{}{}", count, unit)
                } else {
                    format!("{}{}", unit, count)
                };
                let q = grams(&text, "牛乳");
                assert!((q.grams - count * ml).abs() < 1e-9, "{}", text);
                assert_eq!(q.confidence, Confidence::Exact);
            }
        }
        assert_eq!(grams("200ml", "水").grams, 200.0);
        assert_eq!(grams("200cc", "水").grams, 200.0);
    }

    #[test]
    fn test_count_uses_unit_weight() {
        let q = grams("3個", "卵");
        assert_eq!(q.grams, 180.0);
        assert_eq!(q.confidence, Confidence::Estimated);

        let q = grams("1個", "トマト");
        assert_eq!(q.grams, 150.0);

        let q = grams("1枚", "鶏もも肉");
        assert_eq!(q.grams, 250.0);
    }

    #[test]
    fn test_count_for_unknown_food_is_unresolved() {
        let q = grams("1個", "未知の食品");
        assert_eq!(q.grams, 0.0);
        assert!(q.is_unresolved());
    }

    #[test]
    fn test_vague_and_unknown_fall_back_to_minimal_default() {
        let q = grams("少々", "塩");
        assert_eq!(q.grams, DEFAULT_VAGUE_GRAMS);
        assert_eq!(q.confidence, Confidence::Estimated);

        let q = grams("1杯", "ご飯");
        assert_eq!(q.grams, DEFAULT_VAGUE_GRAMS);
        assert_eq!(q.confidence, Confidence::Estimated);

        let settings = UnitSettings { vague_grams: 0.5, ..UnitSettings::default() };
        assert_eq!(normalize_quantity("適量", "こしょう", &settings).grams, 0.5);
    }

    #[test]
    fn test_length_and_bare_numbers() {
        assert_eq!(grams("2cm", "しょうが").grams, 10.0);
        assert_eq!(grams("150", "豚肉").grams, 150.0);
        assert_eq!(grams("2", "卵").grams, 120.0);
        assert!(grams("2", "謎の肉").is_unresolved());
    }

    #[test]
    fn test_annotation_wins_over_unit() {
        let q = grams("1/2個(100g)", "キャベツ");
        assert_eq!(q.grams, 100.0);
        assert_eq!(q.confidence, Confidence::Exact);
    }

    #[test]
    fn test_approximate_downgrades_exact() {
        let q = grams("300g程度", "豚肉");
        assert_eq!(q.grams, 300.0);
        assert_eq!(q.confidence, Confidence::Estimated);

        let q = grams("200~300g", "豚肉");
        assert_eq!(q.grams, 250.0);
        assert_eq!(q.confidence, Confidence::Estimated);
    }

    #[test]
    fn test_deterministic() {
        for text in ["大さじ2", "3個", "少々", "1/2本", "2〜3枚", "謎"] {
            assert_eq!(grams(text, "卵"), grams(text, "卵"));
        }
    }
}
