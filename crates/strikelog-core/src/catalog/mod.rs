// ABOUTME: Technique catalog lookup table keyed by normalized name and id
// ABOUTME: Loads the builtin table or a versioned JSON asset; never mutated after load
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Technique Catalog
//!
//! Static, read-only mapping from technique names to their category, side,
//! targets and ranges. Lookups are case-insensitive and treat `-`, `_` and
//! repeated whitespace as a single space, so `"flying-knee"`, `"Flying Knee"`
//! and the id `"flying_knee"` all resolve to the same entry.

mod builtin;

pub use builtin::BUILTIN_CATALOG_VERSION;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{AppError, AppResult};
use crate::models::{Category, Technique};

/// On-disk catalog representation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Catalog version
    pub version: u32,
    /// Technique entries
    pub techniques: Vec<Technique>,
}

/// Immutable technique lookup table
#[derive(Debug, Clone)]
pub struct TechniqueCatalog {
    version: u32,
    techniques: Vec<Technique>,
    index: HashMap<String, usize>,
}

impl TechniqueCatalog {
    /// Build a catalog from entries
    ///
    /// # Errors
    ///
    /// Returns an error if two entries share an id or a normalized name
    pub fn new(version: u32, techniques: Vec<Technique>) -> AppResult<Self> {
        let mut index = HashMap::with_capacity(techniques.len() * 2);
        for (position, technique) in techniques.iter().enumerate() {
            if technique.id.trim().is_empty() || technique.name.trim().is_empty() {
                return Err(AppError::invalid_input(
                    "Catalog entries need a non-empty id and name",
                ));
            }
            let name_key = normalize_name(&technique.name);
            let id_key = normalize_name(&technique.id);
            if index.insert(name_key, position).is_some() {
                return Err(AppError::invalid_input("Duplicate technique in catalog")
                    .with_resource_id(technique.name.clone()));
            }
            // The id usually normalizes to the name; only a clash with another entry is an error
            if let Some(existing) = index.insert(id_key, position) {
                if existing != position {
                    return Err(AppError::invalid_input("Duplicate technique id in catalog")
                        .with_resource_id(technique.id.clone()));
                }
            }
        }
        debug!(version, count = techniques.len(), "Technique catalog loaded");
        Ok(Self {
            version,
            techniques,
            index,
        })
    }

    /// The compiled-in catalog
    #[must_use]
    pub fn builtin() -> Self {
        let techniques = builtin::techniques();
        let mut index = HashMap::with_capacity(techniques.len() * 2);
        for (position, technique) in techniques.iter().enumerate() {
            index.insert(normalize_name(&technique.name), position);
            index.insert(normalize_name(&technique.id), position);
        }
        Self {
            version: BUILTIN_CATALOG_VERSION,
            techniques,
            index,
        }
    }

    /// Parse a JSON catalog document
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or entries collide
    pub fn from_json(json: &str) -> AppResult<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.version, file.techniques)
    }

    /// Load a JSON catalog from disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let json = fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("Failed to read catalog {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    /// Catalog version
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Number of techniques
    #[must_use]
    pub fn len(&self) -> usize {
        self.techniques.len()
    }

    /// True if the catalog holds no techniques
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.techniques.is_empty()
    }

    /// Look up a technique by display name or id
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Technique> {
        self.index
            .get(&normalize_name(name))
            .and_then(|&position| self.techniques.get(position))
    }

    /// True if the name resolves to a catalog entry
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// All techniques in table order
    pub fn iter(&self) -> impl Iterator<Item = &Technique> {
        self.techniques.iter()
    }

    /// Techniques in one category
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Technique> {
        self.techniques
            .iter()
            .filter(move |technique| technique.category == category)
    }

    /// Serializable snapshot of the catalog
    #[must_use]
    pub fn to_file(&self) -> CatalogFile {
        CatalogFile {
            version: self.version,
            techniques: self.techniques.clone(),
        }
    }
}

impl Default for TechniqueCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Normalize a technique name for lookup
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
