// ABOUTME: XP attribution and level progression algorithms for Strikelog
// ABOUTME: Pure computations plus the async categorizer contract for unknown techniques
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Strikelog Intelligence
//!
//! Algorithms that turn logged combos into XP and XP into levels. Nothing in
//! this crate touches storage; callers feed it combos and persist the results.

/// Geometric level curve
pub mod leveling;

/// Categorizer contract for techniques missing from the catalog
pub mod categorization;

/// Workout XP attribution
pub mod attribution;

pub use attribution::{
    ActivityXpPolicy, AttributionConfig, AttributionReport, CategoryXp, ComboBreakdown,
    Resolutions, SkipReason, SkippedTechnique, XpAttributionEngine, XpTable,
};
pub use categorization::{Categorization, NoopCategorizer, StaticCategorizer, TechniqueCategorizer};
pub use leveling::{level_for_xp, progress_percent, threshold, LevelCurve, LevelInfo, MAX_LEVEL};
