//! Utility to estimate nutrition for an ingredient file
//!
//! The file holds a JSON object of food name to quantity text:
//! `{"卵": "3個", "牛乳": "大さじ2"}`

use std::collections::BTreeMap;
use std::sync::Arc;

use fridge_nutrition::config::AppConfig;
use fridge_nutrition::nutrition::{NutritionEstimator, ReferenceTable};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <ingredients.json>", args[0]);
        std::process::exit(2);
    }

    let content = std::fs::read_to_string(&args[1])?;
    let ingredients: BTreeMap<String, String> = serde_json::from_str(&content)?;

    let config = AppConfig::load()?;
    let reference = ReferenceTable::load(config.reference_path.as_deref())?;
    let estimator = NutritionEstimator::new(Arc::new(reference))
        .with_settings(config.units)
        .with_targets(config.targets);

    let report = estimator.estimate(&ingredients, None);

    println!("Ingredients:");
    for line in &report.lines {
        println!(
            "  {} {} -> {:.1}g ({}) {}",
            line.name,
            line.quantity,
            line.grams,
            line.confidence.as_str(),
            line.matched_food.as_deref().unwrap_or("-")
        );
    }

    println!();
    println!("{}", serde_json::to_string_pretty(&report.summary())?);

    if !report.unscored.is_empty() {
        println!();
        println!("Unscored:");
        for item in &report.unscored {
            println!("  {} {} ({})", item.name, item.quantity, item.reason.as_str());
        }
    }

    Ok(())
}
