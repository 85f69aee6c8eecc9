// ABOUTME: Per-category progress, XP history entries and finalized workout records
// ABOUTME: Progress rows pair cumulative XP with the level derived from it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Category, Combo};
use crate::constants::leveling::STARTING_LEVEL;

/// Cumulative XP and level for one user and one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryProgress {
    /// Category this row tracks
    pub category: Category,
    /// Cumulative XP
    pub xp: u64,
    /// Level derived from `xp`
    pub level: u32,
}

impl CategoryProgress {
    /// Fresh progress for a new account
    #[must_use]
    pub const fn new(category: Category) -> Self {
        Self {
            category,
            xp: 0,
            level: STARTING_LEVEL,
        }
    }
}

/// Level movement for one category caused by a finalized workout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelChange {
    /// Category that gained XP
    pub category: Category,
    /// XP added by the workout
    pub xp_gained: u64,
    /// XP before the workout
    pub previous_xp: u64,
    /// XP after the workout
    pub new_xp: u64,
    /// Level before the workout
    pub previous_level: u32,
    /// Level after the workout
    pub new_level: u32,
}

impl LevelChange {
    /// True if the workout pushed the category over at least one threshold
    #[must_use]
    pub const fn leveled_up(&self) -> bool {
        self.new_level > self.previous_level
    }
}

/// Append-only record of XP gained in one category by one workout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpHistoryEntry {
    /// Row id
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Workout that produced the XP
    pub workout_id: Uuid,
    /// Category credited
    pub category: Category,
    /// XP gained
    pub xp_gained: u64,
    /// When the workout was finalized
    pub created_at: DateTime<Utc>,
}

/// A finalized workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    /// Workout id
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Free-text notes
    pub notes: Option<String>,
    /// Total XP across categories
    pub total_xp: u64,
    /// Combos in the order they were trained
    pub combos: Vec<Combo>,
    /// When the workout was finalized
    pub created_at: DateTime<Utc>,
}
