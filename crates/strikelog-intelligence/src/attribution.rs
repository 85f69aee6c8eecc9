// ABOUTME: XP attribution engine converting a workout's combos into XP per technique category
// ABOUTME: Applies category base values, technique bonuses, mode multipliers and categorizer results
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # XP Attribution
//!
//! For every combo the engine computes a base XP, scales it by the training
//! mode, and credits the result to technique categories:
//!
//! 1. Combos without techniques (skipping, running) earn a fixed activity XP
//!    credited to Footwork.
//! 2. Each technique earns its category's base value, multiplied by 1.1 when
//!    it reaches several targets, 1.1 when it works from several ranges and
//!    1.25 when its name marks an advanced variation (spinning, jump, switch,
//!    flying).
//! 3. Reps mode multiplies by sets, rounds mode by rounds, time mode by the
//!    duration in minutes (at least one), distance mode leaves XP unchanged.
//! 4. Names missing from the catalog are sent to a [`TechniqueCategorizer`]
//!    once per distinct name. Guesses below the confidence floor, unparseable
//!    categories and failed calls leave the technique unattributed; none of
//!    them abort the workout.
//!
//! Preview and commit paths share [`XpAttributionEngine::attribute_with_resolutions`];
//! the only difference is whether unknown names were resolved beforehand.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::slice;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strikelog_core::catalog::{normalize_name, TechniqueCatalog};
use strikelog_core::constants::{categorization, xp};
use strikelog_core::errors::{AppError, AppResult};
use strikelog_core::models::{Category, Combo, Technique, TrainingMode};
use tracing::{debug, info, warn};

use crate::categorization::{Categorization, TechniqueCategorizer};

/// How combos without techniques are scored
///
/// Both policies start from the fixed activity base; they differ only in
/// whether the training mode multiplier applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityXpPolicy {
    /// Activity XP is multiplied like technique XP
    #[default]
    ModeScaled,
    /// Activity XP is always exactly the fixed base value
    Flat,
}

impl fmt::Display for ActivityXpPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModeScaled => f.write_str("mode_scaled"),
            Self::Flat => f.write_str("flat"),
        }
    }
}

impl FromStr for ActivityXpPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mode_scaled" | "scaled" => Ok(Self::ModeScaled),
            "flat" => Ok(Self::Flat),
            other => Err(AppError::invalid_input(format!(
                "Unknown activity XP policy: {other}"
            ))),
        }
    }
}

/// Base XP per category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XpTable {
    values: BTreeMap<Category, f64>,
    fallback: f64,
}

impl XpTable {
    /// The standard table
    #[must_use]
    pub fn standard() -> Self {
        let values = BTreeMap::from([
            (Category::Punches, xp::PUNCHES),
            (Category::Kicks, xp::KICKS),
            (Category::Elbows, xp::ELBOWS),
            (Category::Knees, xp::KNEES),
            (Category::Footwork, xp::FOOTWORK),
            (Category::Clinch, xp::CLINCH),
            (Category::Defensive, xp::DEFENSIVE),
            (Category::Sweeps, xp::SWEEPS),
            (Category::Feints, xp::FEINTS),
        ]);
        Self {
            values,
            fallback: xp::FALLBACK,
        }
    }

    /// A table with only the fallback value
    #[must_use]
    pub fn empty() -> Self {
        Self {
            values: BTreeMap::new(),
            fallback: xp::FALLBACK,
        }
    }

    /// Override one category's base value
    #[must_use]
    pub fn with_value(mut self, category: Category, value: f64) -> Self {
        self.values.insert(category, value);
        self
    }

    /// Base XP for a category, falling back when the table has no entry
    ///
    /// [`XpTable::standard`] covers every [`Category`], so the fallback only
    /// applies to custom tables built with [`XpTable::empty`] or
    /// partial overrides. Categorizer guesses naming something that is not a
    /// [`Category`] are skipped before they reach the table.
    #[must_use]
    pub fn base_for(&self, category: Category) -> f64 {
        self.values.get(&category).copied().unwrap_or(self.fallback)
    }
}

impl Default for XpTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Engine tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributionConfig {
    /// Base XP per category
    pub table: XpTable,
    /// Scoring of combos without techniques
    pub activity_policy: ActivityXpPolicy,
    /// Minimum categorizer confidence that earns XP
    pub min_confidence: f64,
}

impl Default for AttributionConfig {
    fn default() -> Self {
        Self {
            table: XpTable::standard(),
            activity_policy: ActivityXpPolicy::default(),
            min_confidence: categorization::MIN_CONFIDENCE,
        }
    }
}

impl AttributionConfig {
    /// Validate the tuning values
    ///
    /// # Errors
    ///
    /// Returns an error if the confidence floor is outside `[0, 1]`
    pub fn validate(&self) -> AppResult<()> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(AppError::out_of_range(format!(
                "Minimum confidence must be within [0, 1], got {}",
                self.min_confidence
            )));
        }
        Ok(())
    }
}

/// Why a technique earned no XP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// Categorizer returned no guess for the name
    Unresolved,
    /// Guess was below the confidence floor
    LowConfidence {
        /// Suggested category
        category: String,
        /// Reported confidence
        confidence: f64,
    },
    /// Guess named a category that does not exist
    UnknownCategory {
        /// Suggested category
        category: String,
    },
    /// The categorizer call failed
    CategorizerFailed {
        /// Error message
        error: String,
    },
}

/// A technique that did not contribute XP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedTechnique {
    /// Technique name as entered
    pub name: String,
    /// Why it was skipped
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Outcome of resolving unknown technique names
#[derive(Debug, Clone, Default)]
pub struct Resolutions {
    entries: HashMap<String, Result<Category, SkipReason>>,
}

impl Resolutions {
    /// No names resolved; every unknown technique is skipped as unresolved
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Record a successful resolution
    pub fn insert_resolved(&mut self, name: &str, category: Category) {
        self.entries.insert(normalize_name(name), Ok(category));
    }

    /// Record a skipped name
    pub fn insert_skipped(&mut self, name: &str, reason: SkipReason) {
        self.entries.insert(normalize_name(name), Err(reason));
    }

    /// Resolution for a name, if one was attempted
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Result<Category, SkipReason>> {
        self.entries.get(&normalize_name(name))
    }

    /// Number of names attempted
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing was attempted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// XP per category for one workout; categories never touched read as 0
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryXp {
    raw: BTreeMap<Category, f64>,
}

impl CategoryXp {
    /// Empty mapping
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add unrounded XP to a category
    pub fn add(&mut self, category: Category, amount: f64) {
        if amount > 0.0 && amount.is_finite() {
            *self.raw.entry(category).or_insert(0.0) += amount;
        }
    }

    /// Merge another mapping into this one
    pub fn merge(&mut self, other: &Self) {
        for (&category, &amount) in &other.raw {
            self.add(category, amount);
        }
    }

    /// Unrounded XP for a category
    #[must_use]
    pub fn raw(&self, category: Category) -> f64 {
        self.raw.get(&category).copied().unwrap_or(0.0)
    }

    /// XP for a category, rounded half away from zero
    #[must_use]
    pub fn get(&self, category: Category) -> u64 {
        self.raw(category).round() as u64
    }

    /// Rounded XP for every category, including zeros
    #[must_use]
    pub fn all(&self) -> BTreeMap<Category, u64> {
        Category::ALL
            .iter()
            .map(|&category| (category, self.get(category)))
            .collect()
    }

    /// Categories with a positive rounded gain, in category order
    #[must_use]
    pub fn gains(&self) -> Vec<(Category, u64)> {
        Category::ALL
            .iter()
            .map(|&category| (category, self.get(category)))
            .filter(|&(_, amount)| amount > 0)
            .collect()
    }

    /// Sum of rounded gains
    #[must_use]
    pub fn total(&self) -> u64 {
        self.gains().iter().map(|&(_, amount)| amount).sum()
    }

    /// True if no category gained XP
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.gains().is_empty()
    }
}

/// XP detail for one combo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboBreakdown {
    /// Position of the combo in the workout
    pub index: usize,
    /// XP before the mode multiplier
    pub base_xp: f64,
    /// Mode multiplier applied
    pub multiplier: f64,
    /// XP credited, by category
    pub category_xp: CategoryXp,
    /// Techniques in this combo that earned nothing
    pub skipped: Vec<String>,
}

impl ComboBreakdown {
    /// Unrounded XP credited by this combo
    #[must_use]
    pub fn total_raw(&self) -> f64 {
        Category::ALL
            .iter()
            .map(|&category| self.category_xp.raw(category))
            .sum()
    }
}

/// Full attribution result for a workout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributionReport {
    /// XP per category across the workout
    pub category_xp: CategoryXp,
    /// Per-combo detail
    pub combos: Vec<ComboBreakdown>,
    /// Distinct technique names that earned nothing
    pub skipped: Vec<SkippedTechnique>,
}

/// Turns combos into category XP
#[derive(Debug, Clone)]
pub struct XpAttributionEngine {
    catalog: Arc<TechniqueCatalog>,
    config: AttributionConfig,
}

impl XpAttributionEngine {
    /// Engine with the default configuration
    #[must_use]
    pub fn new(catalog: Arc<TechniqueCatalog>) -> Self {
        Self {
            catalog,
            config: AttributionConfig::default(),
        }
    }

    /// Engine with a custom configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn with_config(catalog: Arc<TechniqueCatalog>, config: AttributionConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self { catalog, config })
    }

    /// Catalog used for lookups
    #[must_use]
    pub fn catalog(&self) -> &TechniqueCatalog {
        &self.catalog
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &AttributionConfig {
        &self.config
    }

    /// Multiplier for technique names marking advanced variations
    #[must_use]
    pub fn name_bonus(name: &str) -> f64 {
        let lowered = name.to_lowercase();
        if xp::ADVANCED_KEYWORDS
            .iter()
            .any(|keyword| lowered.contains(keyword))
        {
            xp::ADVANCED_BONUS
        } else {
            1.0
        }
    }

    /// XP for one catalog technique, before the mode multiplier
    #[must_use]
    pub fn technique_xp(&self, technique: &Technique) -> f64 {
        let mut value = self.config.table.base_for(technique.category);
        if technique.is_multi_target() {
            value *= xp::MULTI_TARGET_BONUS;
        }
        if technique.is_multi_range() {
            value *= xp::MULTI_RANGE_BONUS;
        }
        value * Self::name_bonus(&technique.name)
    }

    /// XP for a categorizer-resolved technique; no target or range data exists for it
    #[must_use]
    pub fn resolved_technique_xp(&self, name: &str, category: Category) -> f64 {
        self.config.table.base_for(category) * Self::name_bonus(name)
    }

    /// Volume multiplier for a combo's training mode
    #[must_use]
    pub fn mode_multiplier(combo: &Combo) -> f64 {
        match combo.mode {
            TrainingMode::Reps => f64::from(combo.params.sets_or_zero()),
            TrainingMode::Rounds => f64::from(combo.params.rounds_or_zero()),
            TrainingMode::Time => combo.params.total_minutes().max(xp::MIN_TIME_MINUTES),
            TrainingMode::Distance => 1.0,
        }
    }

    /// Distinct technique names in the combos that the catalog does not know
    #[must_use]
    pub fn unknown_techniques(&self, combos: &[Combo]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut unknown = Vec::new();
        for name in combos.iter().flat_map(|combo| combo.techniques.iter()) {
            if self.catalog.contains(name) {
                continue;
            }
            if seen.insert(normalize_name(name)) {
                unknown.push(name.clone());
            }
        }
        unknown
    }

    /// Resolve unknown names with one categorizer call per distinct name
    ///
    /// Failures are logged and recorded, never returned.
    pub async fn resolve_unknowns(
        &self,
        combos: &[Combo],
        categorizer: &dyn TechniqueCategorizer,
    ) -> Resolutions {
        let mut resolutions = Resolutions::empty();
        for name in self.unknown_techniques(combos) {
            match categorizer.categorize(slice::from_ref(&name)).await {
                Ok(results) => match self.judge(&name, &results) {
                    Ok(category) => {
                        debug!(
                            technique = %name,
                            category = %category,
                            categorizer = categorizer.name(),
                            "Resolved unknown technique"
                        );
                        resolutions.insert_resolved(&name, category);
                    }
                    Err(reason) => {
                        debug!(
                            technique = %name,
                            reason = ?reason,
                            categorizer = categorizer.name(),
                            "Unknown technique left unattributed"
                        );
                        resolutions.insert_skipped(&name, reason);
                    }
                },
                Err(e) => {
                    warn!(
                        technique = %name,
                        categorizer = categorizer.name(),
                        error = %e,
                        "Technique categorization failed, skipping technique"
                    );
                    resolutions.insert_skipped(
                        &name,
                        SkipReason::CategorizerFailed {
                            error: e.to_string(),
                        },
                    );
                }
            }
        }
        resolutions
    }

    /// Apply the confidence floor and category parsing to categorizer output
    fn judge(&self, name: &str, results: &[Categorization]) -> Result<Category, SkipReason> {
        let wanted = normalize_name(name);
        let guess = results
            .iter()
            .find(|result| normalize_name(&result.name) == wanted)
            .or_else(|| match results {
                [only] => Some(only),
                _ => None,
            })
            .ok_or(SkipReason::Unresolved)?;

        if !guess.confidence.is_finite() || guess.confidence < self.config.min_confidence {
            return Err(SkipReason::LowConfidence {
                category: guess.category.clone(),
                confidence: guess.confidence,
            });
        }
        guess
            .category
            .parse::<Category>()
            .map_err(|_| SkipReason::UnknownCategory {
                category: guess.category.clone(),
            })
    }

    /// Attribute XP, resolving unknown techniques through `categorizer`
    pub async fn attribute(
        &self,
        combos: &[Combo],
        categorizer: &dyn TechniqueCategorizer,
    ) -> AttributionReport {
        let resolutions = self.resolve_unknowns(combos, categorizer).await;
        self.attribute_with_resolutions(combos, &resolutions)
    }

    /// Attribute XP using already-resolved unknown techniques
    #[must_use]
    pub fn attribute_with_resolutions(
        &self,
        combos: &[Combo],
        resolutions: &Resolutions,
    ) -> AttributionReport {
        let mut report = AttributionReport::default();
        let mut skipped_seen = HashSet::new();

        for (index, combo) in combos.iter().enumerate() {
            let breakdown = self.score_combo(index, combo, resolutions);
            for name in &breakdown.skipped {
                if skipped_seen.insert(normalize_name(name)) {
                    let reason = match resolutions.get(name) {
                        Some(Err(reason)) => reason.clone(),
                        _ => SkipReason::Unresolved,
                    };
                    report.skipped.push(SkippedTechnique {
                        name: name.clone(),
                        reason,
                    });
                }
            }
            report.category_xp.merge(&breakdown.category_xp);
            report.combos.push(breakdown);
        }

        info!(
            combos = combos.len(),
            total_xp = report.category_xp.total(),
            skipped = report.skipped.len(),
            "Workout XP attributed"
        );
        report
    }

    fn score_combo(&self, index: usize, combo: &Combo, resolutions: &Resolutions) -> ComboBreakdown {
        let mut base: BTreeMap<Category, f64> = BTreeMap::new();
        let mut skipped = Vec::new();

        let multiplier = if combo.is_activity() {
            *base.entry(Category::Footwork).or_insert(0.0) += xp::ACTIVITY_BASE;
            match self.config.activity_policy {
                ActivityXpPolicy::ModeScaled => Self::mode_multiplier(combo),
                ActivityXpPolicy::Flat => 1.0,
            }
        } else {
            for name in &combo.techniques {
                if let Some(technique) = self.catalog.lookup(name) {
                    *base.entry(technique.category).or_insert(0.0) += self.technique_xp(technique);
                    continue;
                }
                match resolutions.get(name) {
                    Some(Ok(category)) => {
                        *base.entry(*category).or_insert(0.0) +=
                            self.resolved_technique_xp(name, *category);
                    }
                    Some(Err(_)) | None => skipped.push(name.clone()),
                }
            }
            Self::mode_multiplier(combo)
        };

        let mut category_xp = CategoryXp::new();
        for (&category, &amount) in &base {
            category_xp.add(category, amount * multiplier);
        }
        let base_xp = base.values().sum();

        debug!(
            combo = index,
            training_type = %combo.training_type,
            mode = %combo.mode,
            base_xp,
            multiplier,
            "Scored combo"
        );

        ComboBreakdown {
            index,
            base_xp,
            multiplier,
            category_xp,
            skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strikelog_core::models::TrainingType;

    fn engine() -> XpAttributionEngine {
        XpAttributionEngine::new(Arc::new(TechniqueCatalog::builtin()))
    }

    fn combo(names: &[&str], mode: TrainingMode) -> Combo {
        Combo::new(
            TrainingType::Pads,
            names.iter().map(|&name| name.to_owned()).collect(),
            mode,
        )
    }

    #[test]
    fn test_name_bonus_keywords() {
        assert!((XpAttributionEngine::name_bonus("Spinning Elbow") - 1.25).abs() < 1e-12);
        assert!((XpAttributionEngine::name_bonus("JUMPING switch kick") - 1.25).abs() < 1e-12);
        assert!((XpAttributionEngine::name_bonus("Jab") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_mode_multipliers() {
        let reps = combo(&["Jab"], TrainingMode::Reps).with_sets(3);
        let rounds = combo(&["Jab"], TrainingMode::Rounds).with_rounds(4);
        let short = combo(&["Jab"], TrainingMode::Time).with_duration(0, 20);
        let long = combo(&["Jab"], TrainingMode::Time).with_duration(2, 30);
        let distance = combo(&["Jab"], TrainingMode::Distance);

        assert!((XpAttributionEngine::mode_multiplier(&reps) - 3.0).abs() < 1e-12);
        assert!((XpAttributionEngine::mode_multiplier(&rounds) - 4.0).abs() < 1e-12);
        assert!((XpAttributionEngine::mode_multiplier(&short) - 1.0).abs() < 1e-12);
        assert!((XpAttributionEngine::mode_multiplier(&long) - 2.5).abs() < 1e-12);
        assert!((XpAttributionEngine::mode_multiplier(&distance) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_sets_yield_zero() {
        let report = engine().attribute_with_resolutions(
            &[combo(&["Jab"], TrainingMode::Reps)],
            &Resolutions::empty(),
        );
        assert!(report.category_xp.is_empty());
    }

    #[test]
    fn test_single_range_punch() {
        // Jab: 2 targets, 1 range
        let report = engine().attribute_with_resolutions(
            &[combo(&["Jab"], TrainingMode::Rounds).with_rounds(1)],
            &Resolutions::empty(),
        );
        assert!((report.category_xp.raw(Category::Punches) - 88.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_without_resolution_is_skipped() {
        let report = engine().attribute_with_resolutions(
            &[combo(&["Tornado Kick", "Jab"], TrainingMode::Distance)],
            &Resolutions::empty(),
        );
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].reason, SkipReason::Unresolved);
        assert_eq!(report.category_xp.get(Category::Kicks), 0);
        assert_eq!(report.category_xp.get(Category::Punches), 88);
    }

    #[test]
    fn test_table_fallback() {
        let table = XpTable::empty().with_value(Category::Punches, 10.0);
        assert!((table.base_for(Category::Punches) - 10.0).abs() < 1e-12);
        assert!((table.base_for(Category::Sweeps) - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_config_validation() {
        let config = AttributionConfig {
            min_confidence: 1.5,
            ..AttributionConfig::default()
        };
        assert!(
            XpAttributionEngine::with_config(Arc::new(TechniqueCatalog::builtin()), config).is_err()
        );
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("flat".parse::<ActivityXpPolicy>().unwrap(), ActivityXpPolicy::Flat);
        assert_eq!(
            "Mode_Scaled".parse::<ActivityXpPolicy>().unwrap(),
            ActivityXpPolicy::ModeScaled
        );
        assert!("double".parse::<ActivityXpPolicy>().is_err());
    }
}
