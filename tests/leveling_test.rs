// ABOUTME: Integration tests for the level curve properties used by category progress
// ABOUTME: Checks monotonic levels, threshold bracketing and progress bounds over wide XP ranges
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use strikelog::intelligence::{level_for_xp, progress_percent, threshold, LevelCurve};

/// XP samples spread from zero to well past level 60
fn xp_samples() -> impl Iterator<Item = u64> {
    (0..2_000_u64)
        .map(|i| i * 37)
        .chain((0..200_u32).map(|i| 1_200_u64.saturating_mul(1_u64 << (i % 40))))
        .chain([u64::MAX / 2, u64::MAX])
}

#[test]
fn test_new_account_state() {
    assert_eq!(level_for_xp(0), 1);
    assert!(progress_percent(0).abs() < f64::EPSILON);
    assert_eq!(threshold(0), 0);
    assert_eq!(threshold(1), 0);
}

#[test]
fn test_level_is_monotonic() {
    let mut samples: Vec<u64> = xp_samples().collect();
    samples.sort_unstable();
    let levels: Vec<u32> = samples.iter().map(|&xp| level_for_xp(xp)).collect();
    assert!(levels.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn test_thresholds_bracket_xp() {
    for xp in (0..200_000_u64).step_by(97) {
        let level = level_for_xp(xp);
        assert!(threshold(level) <= xp, "xp {xp} below its level {level}");
        assert!(xp < threshold(level + 1), "xp {xp} reached level {}", level + 1);
    }
}

#[test]
fn test_exact_thresholds_reach_their_level() {
    for level in 1..=60 {
        assert_eq!(level_for_xp(threshold(level)), level);
        if level > 1 {
            assert_eq!(level_for_xp(threshold(level) - 1), level - 1);
        }
    }
}

#[test]
fn test_progress_stays_in_bounds() {
    for xp in xp_samples() {
        let percent = progress_percent(xp);
        assert!((0.0..=100.0).contains(&percent), "xp {xp} gave {percent}");
    }
}

#[test]
fn test_custom_curve_follows_same_rules() {
    let curve = LevelCurve::new(500.0, 1.5).unwrap();
    assert_eq!(curve.threshold(2), 750);
    assert_eq!(curve.level_for_xp(749), 1);
    assert_eq!(curve.level_for_xp(750), 2);
    let info = curve.level_info(900);
    assert_eq!(info.level, 2);
    assert!(info.progress_percent > 0.0 && info.progress_percent < 100.0);
}
