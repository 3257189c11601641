//! Normalized ingredient quantities

use serde::{Deserialize, Serialize};

/// How much a gram value can be trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Mass given directly, or volume with a known density
    Exact,
    /// Derived from a default unit weight, a vague amount or a range
    Estimated,
    /// Could not be quantified; the line must be left out of totals
    Unresolved,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Exact => "exact",
            Confidence::Estimated => "estimated",
            Confidence::Unresolved => "unresolved",
        }
    }

    /// Downgrade `Exact` to `Estimated`; other states are kept
    pub fn weakened(self) -> Self {
        match self {
            Confidence::Exact => Confidence::Estimated,
            other => other,
        }
    }
}

/// A quantity expression converted to grams
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedQuantity {
    pub grams: f64,
    pub confidence: Confidence,
}

impl NormalizedQuantity {
    pub fn exact(grams: f64) -> Self {
        Self { grams, confidence: Confidence::Exact }
    }

    pub fn estimated(grams: f64) -> Self {
        Self { grams, confidence: Confidence::Estimated }
    }

    /// Zero grams, flagged for exclusion from aggregation
    pub fn unresolved() -> Self {
        Self { grams: 0.0, confidence: Confidence::Unresolved }
    }

    pub fn is_unresolved(&self) -> bool {
        self.confidence == Confidence::Unresolved
    }
}
