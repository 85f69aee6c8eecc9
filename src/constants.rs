// ABOUTME: Application constants re-exported from strikelog-core
// ABOUTME: XP values, leveling parameters, limits and environment variable names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use strikelog_core::constants::*;
