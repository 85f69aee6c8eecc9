// ABOUTME: Combo model: an ordered technique sequence with a training type and mode
// ABOUTME: Mode parameters are optional; missing values count as zero for XP multipliers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::limits::MAX_TECHNIQUE_NAME_LEN;
use crate::errors::{AppError, AppResult};

/// Separators accepted between technique names in a delimited combo string
const TECHNIQUE_SEPARATORS: &[char] = &[',', '+', '>', '→'];

/// Kind of training session a combo belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingType {
    /// Solo shadowboxing
    Shadowboxing,
    /// Heavy bag work
    HeavyBag,
    /// Pad work with a holder
    Pads,
    /// Partner drilling
    Drills,
    /// Sparring rounds
    Sparring,
    /// Rope skipping
    Skipping,
    /// Roadwork
    Running,
}

impl TrainingType {
    /// Canonical storage name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Shadowboxing => "shadowboxing",
            Self::HeavyBag => "heavy_bag",
            Self::Pads => "pads",
            Self::Drills => "drills",
            Self::Sparring => "sparring",
            Self::Skipping => "skipping",
            Self::Running => "running",
        }
    }
}

impl fmt::Display for TrainingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrainingType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "shadowboxing" | "shadow_boxing" => Ok(Self::Shadowboxing),
            "heavy_bag" | "bag" | "bag_work" => Ok(Self::HeavyBag),
            "pads" | "pad_work" | "mitts" => Ok(Self::Pads),
            "drills" | "drilling" => Ok(Self::Drills),
            "sparring" => Ok(Self::Sparring),
            "skipping" | "jump_rope" => Ok(Self::Skipping),
            "running" | "roadwork" => Ok(Self::Running),
            other => Err(AppError::invalid_input(format!(
                "Unknown training type: {other}"
            ))),
        }
    }
}

/// How a combo's volume is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingMode {
    /// Timed rounds
    Rounds,
    /// Continuous block of minutes and seconds
    Time,
    /// Sets of repetitions
    Reps,
    /// Distance covered
    Distance,
}

impl TrainingMode {
    /// Canonical storage name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rounds => "rounds",
            Self::Time => "time",
            Self::Reps => "reps",
            Self::Distance => "distance",
        }
    }
}

impl fmt::Display for TrainingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrainingMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rounds" => Ok(Self::Rounds),
            "time" => Ok(Self::Time),
            "reps" => Ok(Self::Reps),
            "distance" => Ok(Self::Distance),
            other => Err(AppError::invalid_input(format!(
                "Unknown training mode: {other}"
            ))),
        }
    }
}

/// Mode-specific volume; every field is optional
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeParams {
    /// Number of sets (reps mode)
    pub sets: Option<u32>,
    /// Repetitions per set (reps mode)
    pub reps: Option<u32>,
    /// Number of rounds (rounds mode)
    pub rounds: Option<u32>,
    /// Round length in seconds (rounds mode)
    pub round_seconds: Option<u32>,
    /// Whole minutes (time mode)
    pub minutes: Option<u32>,
    /// Remaining seconds (time mode)
    pub seconds: Option<u32>,
    /// Distance in kilometres (distance mode)
    pub distance_km: Option<f64>,
}

impl ModeParams {
    /// Sets, 0 when missing
    #[must_use]
    pub fn sets_or_zero(&self) -> u32 {
        self.sets.unwrap_or(0)
    }

    /// Rounds, 0 when missing
    #[must_use]
    pub fn rounds_or_zero(&self) -> u32 {
        self.rounds.unwrap_or(0)
    }

    /// Total time-mode duration in fractional minutes, 0 when missing
    #[must_use]
    pub fn total_minutes(&self) -> f64 {
        f64::from(self.minutes.unwrap_or(0)) + f64::from(self.seconds.unwrap_or(0)) / 60.0
    }
}

/// A user-authored combo or non-technique activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combo {
    /// Training type
    #[serde(rename = "type")]
    pub training_type: TrainingType,
    /// Ordered technique names; empty for pure activities like skipping
    #[serde(default)]
    pub techniques: Vec<String>,
    /// Volume measurement mode
    pub mode: TrainingMode,
    /// Volume parameters for the mode
    #[serde(flatten)]
    pub params: ModeParams,
}

impl Combo {
    /// Create a combo from technique names
    #[must_use]
    pub fn new(training_type: TrainingType, techniques: Vec<String>, mode: TrainingMode) -> Self {
        Self {
            training_type,
            techniques,
            mode,
            params: ModeParams::default(),
        }
    }

    /// Create an activity combo without techniques
    #[must_use]
    pub fn activity(training_type: TrainingType, mode: TrainingMode) -> Self {
        Self::new(training_type, Vec::new(), mode)
    }

    /// Parse a delimited technique string such as `"Jab, Cross + Lead Hook"`
    ///
    /// # Errors
    ///
    /// Returns an error if a technique name is longer than the accepted maximum
    pub fn from_delimited(
        training_type: TrainingType,
        techniques: &str,
        mode: TrainingMode,
    ) -> AppResult<Self> {
        let names = parse_technique_list(techniques)?;
        Ok(Self::new(training_type, names, mode))
    }

    /// Set the volume parameters
    #[must_use]
    pub const fn with_params(mut self, params: ModeParams) -> Self {
        self.params = params;
        self
    }

    /// Set the number of sets
    #[must_use]
    pub const fn with_sets(mut self, sets: u32) -> Self {
        self.params.sets = Some(sets);
        self
    }

    /// Set the number of rounds
    #[must_use]
    pub const fn with_rounds(mut self, rounds: u32) -> Self {
        self.params.rounds = Some(rounds);
        self
    }

    /// Set the time-mode duration
    #[must_use]
    pub const fn with_duration(mut self, minutes: u32, seconds: u32) -> Self {
        self.params.minutes = Some(minutes);
        self.params.seconds = Some(seconds);
        self
    }

    /// True for pure activities with no technique list
    #[must_use]
    pub fn is_activity(&self) -> bool {
        self.techniques.is_empty()
    }

    /// Technique names joined for storage and display
    #[must_use]
    pub fn techniques_joined(&self) -> String {
        self.techniques.join(", ")
    }
}

/// Split a delimited technique string into trimmed, non-empty names
///
/// # Errors
///
/// Returns an error if any name exceeds the maximum technique name length
pub fn parse_technique_list(input: &str) -> AppResult<Vec<String>> {
    input
        .split(TECHNIQUE_SEPARATORS)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            if name.chars().count() > MAX_TECHNIQUE_NAME_LEN {
                Err(AppError::invalid_input(format!(
                    "Technique name exceeds {MAX_TECHNIQUE_NAME_LEN} characters"
                ))
                .with_resource_id(name))
            } else {
                Ok(name.to_owned())
            }
        })
        .collect()
}
