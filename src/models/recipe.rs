//! Recipe input model
//!
//! Recipes arrive from a meal-planning or recipe-parsing component. Only the
//! fields nutrition estimation needs are modelled here.

use serde::{Deserialize, Serialize};

/// One ingredient row of a recipe
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    /// Section heading rows such as "(A)" or "★タレ" carry no quantity
    #[serde(default)]
    pub headline: bool,
}

impl RecipeIngredient {
    pub fn new(name: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
            headline: false,
        }
    }
}

/// A recipe with its serving description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    /// Free text such as "2人分" or "4人前"
    #[serde(default)]
    pub serving: String,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
}

impl Recipe {
    /// Number of people the recipe serves
    ///
    /// Takes the first number in the serving text, never less than 1.
    /// Text without a number ("たっぷり") counts as one serving.
    pub fn serving_count(&self) -> f64 {
        let digits: String = self
            .serving
            .chars()
            .map(fold_digit)
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();

        match digits.trim_end_matches('.').parse::<f64>() {
            Ok(n) if n.is_finite() => n.max(1.0),
            _ => 1.0,
        }
    }
}

fn fold_digit(c: char) -> char {
    match c {
        '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
        '．' => '.',
        _ => c,
    }
}
