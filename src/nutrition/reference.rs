//! Food composition reference table
//!
//! Per-100g nutrient profiles loaded once at startup, either from the table
//! compiled into the binary or from a JSON file. The table is immutable after
//! construction and is shared between threads as `Arc<ReferenceTable>`.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{FoodNutrientProfile, NutrientAmounts};

/// Reference data compiled into the binary
const BUNDLED_TABLE: &str = include_str!("../../data/mext_foods.json");

/// Reference table load errors
///
/// Any of these leaves the estimator without data, so they are fatal at
/// startup.
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("Failed to read reference table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed reference table: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Reference table contains no foods")]
    Empty,

    #[error("Food at position {index} has a blank {field}")]
    BlankField { index: usize, field: &'static str },

    #[error("Duplicate food name or synonym: {0}")]
    DuplicateName(String),

    #[error("Duplicate food id: {0}")]
    DuplicateId(String),

    #[error("Invalid {field} for {food}: {value}")]
    InvalidValue {
        food: String,
        field: &'static str,
        value: f64,
    },
}

/// How a food name was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// Exact canonical name
    Name,
    /// Exact synonym
    Synonym,
    /// Substring of, or superstring of, a canonical name
    Partial,
}

/// Outcome of resolving a food name
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FoodLookup<'a> {
    Found {
        profile: &'a FoodNutrientProfile,
        matched_by: MatchKind,
    },
    NotFound,
}

impl<'a> FoodLookup<'a> {
    pub fn profile(&self) -> Option<&'a FoodNutrientProfile> {
        match *self {
            FoodLookup::Found { profile, .. } => Some(profile),
            FoodLookup::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, FoodLookup::Found { .. })
    }
}

/// On-disk form of one food
#[derive(Debug, Deserialize)]
struct FoodRecord {
    id: String,
    name: String,
    #[serde(default)]
    group: String,
    #[serde(default)]
    synonyms: Vec<String>,
    #[serde(flatten)]
    per_100g: NutrientAmounts,
}

#[derive(Debug, Deserialize)]
struct TableFile {
    #[serde(default)]
    source: String,
    foods: Vec<FoodRecord>,
}

/// Immutable food composition table with name, synonym and id indexes
#[derive(Debug)]
pub struct ReferenceTable {
    source: String,
    foods: Vec<FoodNutrientProfile>,
    name_index: HashMap<String, usize>,
    synonym_index: HashMap<String, usize>,
    id_index: HashMap<String, usize>,
}

impl ReferenceTable {
    /// Load the table compiled into the binary
    pub fn bundled() -> Result<Self, ReferenceError> {
        Self::from_json_str(BUNDLED_TABLE)
    }

    /// Load a table from a JSON file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ReferenceError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ReferenceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Load from `path` when given, otherwise the bundled table
    pub fn load(path: Option<&Path>) -> Result<Self, ReferenceError> {
        let table = match path {
            Some(path) => Self::from_path(path)?,
            None => Self::bundled()?,
        };
        tracing::info!(
            "Loaded {} reference foods ({})",
            table.len(),
            if table.source.is_empty() { "unnamed source" } else { table.source.as_str() }
        );
        Ok(table)
    }

    /// Parse and validate a JSON table
    pub fn from_json_str(json: &str) -> Result<Self, ReferenceError> {
        let file: TableFile = serde_json::from_str(json)?;
        Self::from_records(file.source, file.foods)
    }

    fn from_records(source: String, records: Vec<FoodRecord>) -> Result<Self, ReferenceError> {
        if records.is_empty() {
            return Err(ReferenceError::Empty);
        }

        let mut foods = Vec::with_capacity(records.len());
        let mut name_index = HashMap::new();
        let mut synonym_index = HashMap::new();
        let mut id_index = HashMap::new();

        for (index, record) in records.into_iter().enumerate() {
            let name = record.name.trim().to_string();
            let id = record.id.trim().to_string();
            if name.is_empty() {
                return Err(ReferenceError::BlankField { index, field: "name" });
            }
            if id.is_empty() {
                return Err(ReferenceError::BlankField { index, field: "id" });
            }

            let per_100g = record.per_100g;
            for (field, value) in per_100g.fields() {
                if !value.is_finite() || value < 0.0 {
                    return Err(ReferenceError::InvalidValue { food: name, field, value });
                }
            }

            if name_index.contains_key(&name) || synonym_index.contains_key(&name) {
                return Err(ReferenceError::DuplicateName(name));
            }
            if id_index.insert(id.clone(), index).is_some() {
                return Err(ReferenceError::DuplicateId(id));
            }
            name_index.insert(name.clone(), index);

            let mut synonyms = BTreeSet::new();
            for synonym in record.synonyms {
                let synonym = synonym.trim().to_string();
                if synonym.is_empty() || synonym == name {
                    continue;
                }
                if name_index.contains_key(&synonym) {
                    return Err(ReferenceError::DuplicateName(synonym));
                }
                match synonym_index.get(&synonym) {
                    Some(existing) if *existing != index => {
                        return Err(ReferenceError::DuplicateName(synonym));
                    }
                    _ => {}
                }
                synonym_index.insert(synonym.clone(), index);
                synonyms.insert(synonym);
            }

            foods.push(FoodNutrientProfile {
                id,
                name,
                group: record.group,
                synonyms,
                per_100g,
            });
        }

        Ok(Self {
            source,
            foods,
            name_index,
            synonym_index,
            id_index,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }

    pub fn foods(&self) -> &[FoodNutrientProfile] {
        &self.foods
    }

    /// Resolve a food name to its profile
    ///
    /// Matching order: canonical name, synonym, then partial match against
    /// canonical names where the shortest canonical name wins (table order
    /// breaks ties).
    pub fn lookup(&self, name: &str) -> FoodLookup<'_> {
        self.to_lookup(self.resolve(name))
    }

    pub fn lookup_by_id(&self, id: &str) -> Option<&FoodNutrientProfile> {
        self.id_index.get(id.trim()).map(|&i| &self.foods[i])
    }

    /// Foods whose canonical name contains `query`, in table order
    pub fn search(&self, query: &str, limit: usize) -> Vec<&FoodNutrientProfile> {
        let query = query.trim();
        self.foods
            .iter()
            .filter(|food| food.name.contains(query))
            .take(limit)
            .collect()
    }

    fn resolve(&self, name: &str) -> Option<(usize, MatchKind)> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        if let Some(&index) = self.name_index.get(name) {
            return Some((index, MatchKind::Name));
        }

        if let Some(&index) = self.synonym_index.get(name) {
            return Some((index, MatchKind::Synonym));
        }

        self.foods
            .iter()
            .enumerate()
            .filter(|(_, food)| food.name.contains(name) || name.contains(food.name.as_str()))
            // min_by_key keeps the first of equal keys, i.e. table order
            .min_by_key(|(_, food)| food.name.chars().count())
            .map(|(index, _)| (index, MatchKind::Partial))
    }

    fn to_lookup(&self, resolved: Option<(usize, MatchKind)>) -> FoodLookup<'_> {
        match resolved {
            Some((index, matched_by)) => FoodLookup::Found {
                profile: &self.foods[index],
                matched_by,
            },
            None => FoodLookup::NotFound,
        }
    }
}

/// Memoizes name resolution for one reference table
///
/// Both hits and misses are remembered; entries never expire because the
/// table never changes.
#[derive(Debug, Default)]
pub struct LookupCache {
    entries: RwLock<HashMap<String, Option<(usize, MatchKind)>>>,
}

impl LookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `name` against `table`, consulting the cache first
    ///
    /// The cache must only ever be used with a single table.
    pub fn lookup<'t>(&self, table: &'t ReferenceTable, name: &str) -> FoodLookup<'t> {
        let key = name.trim();

        let cached = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied();

        let resolved = match cached {
            Some(resolved) => resolved,
            None => {
                let resolved = table.resolve(key);
                self.entries
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(key.to_string(), resolved);
                resolved
            }
        };

        table.to_lookup(resolved)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
