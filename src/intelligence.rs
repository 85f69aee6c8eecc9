// ABOUTME: Intelligence module re-exports from strikelog-intelligence crate
// ABOUTME: Level curve, XP attribution engine and categorizer contract
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use strikelog_intelligence::*;

pub use strikelog_intelligence::{attribution, categorization, leveling};
