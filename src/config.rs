//! Runtime configuration
//!
//! Read from a JSON file, all keys optional:
//!
//! ```json
//! {
//!   "reference_path": "data/my_foods.json",
//!   "targets": { "energy_kcal": 1800, "protein_pct": 20, "fat_pct": 25, "carb_pct": 55 },
//!   "units": { "vague_grams": 1.0, "cm_grams": 5.0 }
//! }
//! ```
//!
//! `FRIDGE_NUTRITION_CONFIG` points at the file; without it
//! `config/fridge-nutrition.json` under the project root is used when present.
//! `FRIDGE_REFERENCE_PATH` overrides `reference_path`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::nutrition::{NutritionTargets, UnitSettings};

pub const CONFIG_PATH_ENV: &str = "FRIDGE_NUTRITION_CONFIG";
pub const REFERENCE_PATH_ENV: &str = "FRIDGE_REFERENCE_PATH";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Reference table file; the bundled table when unset
    pub reference_path: Option<PathBuf>,
    pub targets: NutritionTargets,
    pub units: UnitSettings,
}

impl AppConfig {
    /// Load from the environment and the config file, if any
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
        let reference_override = std::env::var(REFERENCE_PATH_ENV).ok().map(PathBuf::from);
        Self::load_from(explicit, reference_override)
    }

    /// Load with the environment already resolved
    ///
    /// An explicit config path must exist; the default one may be missing.
    pub fn load_from(
        config_path: Option<PathBuf>,
        reference_override: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::from_path(&path)?,
            None => {
                let path = default_config_path();
                if path.exists() {
                    Self::from_path(&path)?
                } else {
                    tracing::debug!("No config file at {}, using defaults", path.display());
                    Self::default()
                }
            }
        };

        if let Some(path) = reference_override {
            config.reference_path = Some(path);
        }

        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig = serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

/// Directory holding `config/` and `data/`
///
/// The executable's directory, or the project root when running from
/// `target/debug` or `target/release`.
pub fn project_root() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path
}

pub fn default_config_path() -> PathBuf {
    project_root().join("config").join("fridge-nutrition.json")
}
