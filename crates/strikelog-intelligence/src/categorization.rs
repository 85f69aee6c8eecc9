// ABOUTME: Contract for categorizing technique names missing from the catalog
// ABOUTME: Includes offline (no-op) and fixed-table implementations used for previews and tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unknown Technique Categorization
//!
//! Technique names that the catalog does not know are sent to a
//! [`TechniqueCategorizer`], which returns a category guess and a confidence in
//! `[0, 1]` for each name. The attribution engine decides what confidence is
//! good enough; categorizers only report.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strikelog_core::catalog::normalize_name;
use strikelog_core::errors::AppResult;

/// One categorizer guess
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Categorization {
    /// Technique name as submitted
    pub name: String,
    /// Suggested category, free text as returned by the categorizer
    pub category: String,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
}

impl Categorization {
    /// Create a categorization result
    #[must_use]
    pub fn new(name: impl Into<String>, category: impl Into<String>, confidence: f64) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            confidence,
        }
    }
}

/// Resolves free-text technique names to categories
#[async_trait]
pub trait TechniqueCategorizer: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Categorize a batch of technique names
    ///
    /// Results may come back in any order and may omit names the
    /// categorizer could not place.
    async fn categorize(&self, names: &[String]) -> AppResult<Vec<Categorization>>;
}

/// Categorizer that never resolves anything; used for offline previews
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCategorizer;

#[async_trait]
impl TechniqueCategorizer for NoopCategorizer {
    fn name(&self) -> &'static str {
        "noop"
    }

    async fn categorize(&self, _names: &[String]) -> AppResult<Vec<Categorization>> {
        Ok(Vec::new())
    }
}

/// Categorizer backed by a fixed lookup table
#[derive(Debug, Clone, Default)]
pub struct StaticCategorizer {
    entries: HashMap<String, (String, f64)>,
}

impl StaticCategorizer {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a name → category mapping with a confidence
    #[must_use]
    pub fn with_entry(mut self, name: &str, category: impl Into<String>, confidence: f64) -> Self {
        self.entries
            .insert(normalize_name(name), (category.into(), confidence));
        self
    }
}

#[async_trait]
impl TechniqueCategorizer for StaticCategorizer {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn categorize(&self, names: &[String]) -> AppResult<Vec<Categorization>> {
        Ok(names
            .iter()
            .filter_map(|name| {
                self.entries
                    .get(&normalize_name(name))
                    .map(|(category, confidence)| {
                        Categorization::new(name.clone(), category.clone(), *confidence)
                    })
            })
            .collect())
    }
}
