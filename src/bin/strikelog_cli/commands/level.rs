// ABOUTME: Level lookup command for strikelog-cli
// ABOUTME: Shows where an XP total lands on the standard level curve
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use strikelog::intelligence::LevelCurve;

use crate::helpers::display::display_level_info;

/// Print level, thresholds and progress for `xp`
pub fn show(xp: u64) {
    display_level_info(&LevelCurve::standard().level_info(xp));
}
