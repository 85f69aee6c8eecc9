// ABOUTME: Technique catalog entry and its enumerated metadata (category, side, target, range)
// ABOUTME: Defines parsing and display for the nine technique categories used by XP tracking
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Technique category; every category carries its own XP and level track
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Straight and hooking hand strikes
    Punches,
    /// Round, push and axe kicks
    Kicks,
    /// Elbow strikes
    Elbows,
    /// Knee strikes
    Knees,
    /// Stance, steps, pivots and conditioning movement
    Footwork,
    /// Clinch entries, controls and off-balancing
    Clinch,
    /// Blocks, parries, slips and checks
    Defensive,
    /// Sweeps, dumps and trips
    Sweeps,
    /// Fakes and set-up feints
    Feints,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Self; 9] = [
        Self::Punches,
        Self::Kicks,
        Self::Elbows,
        Self::Knees,
        Self::Footwork,
        Self::Clinch,
        Self::Defensive,
        Self::Sweeps,
        Self::Feints,
    ];

    /// Canonical display / storage name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Punches => "Punches",
            Self::Kicks => "Kicks",
            Self::Elbows => "Elbows",
            Self::Knees => "Knees",
            Self::Footwork => "Footwork",
            Self::Clinch => "Clinch",
            Self::Defensive => "Defensive",
            Self::Sweeps => "Sweeps",
            Self::Feints => "Feints",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    /// Case-insensitive; singular forms ("kick", "elbow") are accepted since
    /// categorizer output is free text
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "punches" | "punch" => Ok(Self::Punches),
            "kicks" | "kick" => Ok(Self::Kicks),
            "elbows" | "elbow" => Ok(Self::Elbows),
            "knees" | "knee" => Ok(Self::Knees),
            "footwork" => Ok(Self::Footwork),
            "clinch" | "clinching" => Ok(Self::Clinch),
            "defensive" | "defense" | "defence" => Ok(Self::Defensive),
            "sweeps" | "sweep" => Ok(Self::Sweeps),
            "feints" | "feint" => Ok(Self::Feints),
            other => Err(AppError::invalid_input(format!(
                "Unknown technique category: {other}"
            ))),
        }
    }
}

/// Which side of the stance throws the technique
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Front hand / leg
    Lead,
    /// Back hand / leg
    Rear,
    /// Thrown from either side
    Both,
    /// Side does not apply (footwork, clinch controls)
    NotApplicable,
}

/// Body region a technique can land on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// Head
    Head,
    /// Torso
    Body,
    /// Legs
    Legs,
}

/// Distance band a technique works from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Range {
    /// Kicking distance
    Long,
    /// Punching distance
    Medium,
    /// Elbow and knee distance
    Close,
    /// Locked up in the clinch
    Clinch,
}

/// Immutable catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technique {
    /// Stable key, snake case
    pub id: String,
    /// Display name as users type it
    pub name: String,
    /// Throwing side
    pub side: Side,
    /// Regions the technique can land on
    pub targets: BTreeSet<Target>,
    /// Distance bands the technique works from
    pub ranges: BTreeSet<Range>,
    /// XP category
    pub category: Category,
}

impl Technique {
    /// Build a technique from slices of targets and ranges
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: Category,
        side: Side,
        targets: &[Target],
        ranges: &[Range],
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            side,
            targets: targets.iter().copied().collect(),
            ranges: ranges.iter().copied().collect(),
            category,
        }
    }

    /// True when the technique reaches more than one target region
    #[must_use]
    pub fn is_multi_target(&self) -> bool {
        self.targets.len() > 1
    }

    /// True when the technique works from more than one range band
    #[must_use]
    pub fn is_multi_range(&self) -> bool {
        self.ranges.len() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parsing_accepts_aliases() {
        assert_eq!("Kicks".parse::<Category>().unwrap(), Category::Kicks);
        assert_eq!("kick".parse::<Category>().unwrap(), Category::Kicks);
        assert_eq!(" DEFENSE ".parse::<Category>().unwrap(), Category::Defensive);
        assert!("grappling".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_round_trips_through_display() {
        for category in Category::ALL {
            assert_eq!(category.to_string().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_multi_target_and_range() {
        let knee = Technique::new(
            "flying_knee",
            "Flying Knee",
            Category::Knees,
            Side::Rear,
            &[Target::Head, Target::Body],
            &[Range::Medium, Range::Close],
        );
        assert!(knee.is_multi_target());
        assert!(knee.is_multi_range());

        let jab = Technique::new(
            "jab",
            "Jab",
            Category::Punches,
            Side::Lead,
            &[Target::Head, Target::Head],
            &[Range::Medium],
        );
        assert!(!jab.is_multi_target());
        assert!(!jab.is_multi_range());
    }
}
