// ABOUTME: Geometric level progression curve mapping cumulative XP to level and progress
// ABOUTME: Pure, deterministic functions; thresholds are rounded integers anchored at 1000 XP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Level Progression
//!
//! `threshold(L) = round(BASE_XP * MULTIPLIER^(L-1))` for `L >= 2`, with
//! `threshold(1) = 0`. The level for a given XP total is estimated with the
//! closed-form logarithm and then snapped onto the integer thresholds, so that
//! `threshold(level) <= xp < threshold(level + 1)` holds exactly and the
//! result is monotonic in `xp` regardless of floating-point noise in `ln`.

use serde::{Deserialize, Serialize};
use strikelog_core::constants::leveling::{BASE_XP, MULTIPLIER, STARTING_LEVEL};
use strikelog_core::errors::{AppError, AppResult};

/// Highest level the curve will report
pub const MAX_LEVEL: u32 = 1_000;

/// Level curve parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelCurve {
    base_xp: f64,
    multiplier: f64,
}

/// Snapshot of a category's position on the curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelInfo {
    /// Cumulative XP
    pub xp: u64,
    /// Current level
    pub level: u32,
    /// XP at which the current level started
    pub current_threshold: u64,
    /// XP needed for the next level
    pub next_threshold: u64,
    /// XP still missing to reach the next level
    pub xp_to_next_level: u64,
    /// Progress through the current level, 0-100
    pub progress_percent: f64,
}

impl LevelCurve {
    /// The production curve: 1000 XP anchor, 20% growth per level
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            base_xp: BASE_XP,
            multiplier: MULTIPLIER,
        }
    }

    /// Build a custom curve
    ///
    /// # Errors
    ///
    /// Returns an error unless `base_xp >= 1` and `multiplier > 1`, both finite
    pub fn new(base_xp: f64, multiplier: f64) -> AppResult<Self> {
        if !base_xp.is_finite() || base_xp < 1.0 {
            return Err(AppError::out_of_range(format!(
                "Level curve base XP must be a finite value >= 1, got {base_xp}"
            )));
        }
        if !multiplier.is_finite() || multiplier <= 1.0 {
            return Err(AppError::out_of_range(format!(
                "Level curve multiplier must be a finite value > 1, got {multiplier}"
            )));
        }
        Ok(Self {
            base_xp,
            multiplier,
        })
    }

    /// XP required to reach `level`
    #[must_use]
    pub fn threshold(&self, level: u32) -> u64 {
        if level <= STARTING_LEVEL {
            return 0;
        }
        let exponent = i32::try_from(level - 1).unwrap_or(i32::MAX);
        // Float-to-int casts saturate, so overflowing thresholds clamp to u64::MAX
        (self.base_xp * self.multiplier.powi(exponent)).round() as u64
    }

    /// Level reached with `xp` cumulative XP
    #[must_use]
    pub fn level_for_xp(&self, xp: u64) -> u32 {
        if xp == 0 {
            return STARTING_LEVEL;
        }

        let estimate = ((xp as f64 / self.base_xp).ln() / self.multiplier.ln() + 1.0).floor();
        let mut level = if estimate.is_nan() || estimate < f64::from(STARTING_LEVEL) {
            STARTING_LEVEL
        } else {
            estimate.min(f64::from(MAX_LEVEL)) as u32
        };

        while level > STARTING_LEVEL && self.threshold(level) > xp {
            level -= 1;
        }
        while level < MAX_LEVEL && self.threshold(level + 1) <= xp {
            level += 1;
        }
        level
    }

    /// Level for an XP value coming from untyped input
    ///
    /// # Errors
    ///
    /// Returns an error if `xp` is negative, NaN or infinite
    pub fn level_for_raw_xp(&self, xp: f64) -> AppResult<u32> {
        if !xp.is_finite() || xp < 0.0 {
            return Err(AppError::invalid_input(format!(
                "XP must be a finite, non-negative number, got {xp}"
            )));
        }
        Ok(self.level_for_xp(xp.floor() as u64))
    }

    /// Progress through the current level as a percentage in `[0, 100]`
    #[must_use]
    pub fn progress_percent(&self, xp: u64) -> f64 {
        let level = self.level_for_xp(xp);
        let current = self.threshold(level);
        let next = self.threshold(level + 1);
        if next <= current {
            return 100.0;
        }
        let progress = xp.saturating_sub(current) as f64 / (next - current) as f64 * 100.0;
        progress.clamp(0.0, 100.0)
    }

    /// Full position on the curve
    #[must_use]
    pub fn level_info(&self, xp: u64) -> LevelInfo {
        let level = self.level_for_xp(xp);
        let next_threshold = self.threshold(level + 1);
        LevelInfo {
            xp,
            level,
            current_threshold: self.threshold(level),
            next_threshold,
            xp_to_next_level: next_threshold.saturating_sub(xp),
            progress_percent: self.progress_percent(xp),
        }
    }
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self::standard()
    }
}

/// XP required to reach `level` on the standard curve
#[must_use]
pub fn threshold(level: u32) -> u64 {
    LevelCurve::standard().threshold(level)
}

/// Level for `xp` on the standard curve
#[must_use]
pub fn level_for_xp(xp: u64) -> u32 {
    LevelCurve::standard().level_for_xp(xp)
}

/// Progress percentage for `xp` on the standard curve
#[must_use]
pub fn progress_percent(xp: u64) -> f64 {
    LevelCurve::standard().progress_percent(xp)
}
