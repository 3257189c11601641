//! Data models
//!
//! Plain data shared by the estimator, the MCP tools and the CLI.

mod nutrition;
mod profile;
mod quantity;
mod recipe;

pub use nutrition::{
    NutrientAmounts, KCAL_PER_G_CARBOHYDRATE, KCAL_PER_G_FAT, KCAL_PER_G_PROTEIN,
};
pub use profile::FoodNutrientProfile;
pub use quantity::{Confidence, NormalizedQuantity};
pub use recipe::{Recipe, RecipeIngredient};
