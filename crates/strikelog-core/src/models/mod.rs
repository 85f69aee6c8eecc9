// ABOUTME: Core data models for techniques, combos, progress and workout history
// ABOUTME: Re-exports every model type so callers can import from `models` directly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain models shared by the intelligence crate and the persistence layer

mod combo;
mod progress;
mod technique;

pub use combo::{parse_technique_list, Combo, ModeParams, TrainingMode, TrainingType};
pub use progress::{CategoryProgress, LevelChange, WorkoutRecord, XpHistoryEntry};
pub use technique::{Category, Range, Side, Target, Technique};
