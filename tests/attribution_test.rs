// ABOUTME: Integration tests for XP attribution across catalog, categorizer and activity combos
// ABOUTME: Covers rounding, confidence floors, categorizer failures and activity XP policies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::slice;
use std::sync::Arc;

use strikelog::intelligence::{
    ActivityXpPolicy, AttributionConfig, NoopCategorizer, Resolutions, SkipReason,
    StaticCategorizer, XpAttributionEngine,
};
use strikelog::models::{Category, Combo, TechniqueCatalog, TrainingMode, TrainingType};

use common::{create_test_engine, init_test_logging, reps_combo, rounds_combo, FailingCategorizer};

fn engine_with_policy(policy: ActivityXpPolicy) -> XpAttributionEngine {
    let config = AttributionConfig {
        activity_policy: policy,
        ..AttributionConfig::default()
    };
    XpAttributionEngine::with_config(Arc::new(TechniqueCatalog::builtin()), config).unwrap()
}

#[tokio::test]
async fn test_flying_knee_two_sets() {
    init_test_logging();
    let engine = create_test_engine();
    let report = engine
        .attribute(&[reps_combo(&["Flying Knee"], 2)], &NoopCategorizer)
        .await;

    assert!((report.category_xp.raw(Category::Knees) - 302.5).abs() < 1e-9);
    assert_eq!(report.category_xp.get(Category::Knees), 303);
    assert_eq!(report.category_xp.gains(), vec![(Category::Knees, 303)]);
    assert!(report.skipped.is_empty());
}

#[tokio::test]
async fn test_mixed_combo_splits_by_category() {
    init_test_logging();
    let engine = create_test_engine();
    let report = engine
        .attribute(&[rounds_combo(&["Jab", "Cross", "Low Kick"], 3)], &NoopCategorizer)
        .await;

    // Jab and Cross are 88 each, Low Kick is 132
    assert_eq!(report.category_xp.get(Category::Punches), 528);
    assert_eq!(report.category_xp.get(Category::Kicks), 396);
    assert_eq!(report.category_xp.total(), 924);
    assert_eq!(report.combos.len(), 1);
    assert!((report.combos[0].multiplier - 3.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_catalog_lookup_ignores_case_and_spacing() {
    let engine = create_test_engine();
    let report = engine
        .attribute(&[reps_combo(&["  flying   KNEE "], 2)], &NoopCategorizer)
        .await;
    assert_eq!(report.category_xp.get(Category::Knees), 303);
}

#[tokio::test]
async fn test_confident_guess_is_credited() {
    let engine = create_test_engine();
    let categorizer = StaticCategorizer::new().with_entry("Tornado Kick", "Kicks", 0.92);
    let report = engine
        .attribute(&[reps_combo(&["Tornado Kick"], 1)], &categorizer)
        .await;

    assert_eq!(report.category_xp.get(Category::Kicks), 120);
    assert!(report.skipped.is_empty());
}

#[tokio::test]
async fn test_low_confidence_combo_earns_nothing() {
    let engine = create_test_engine();
    let categorizer = StaticCategorizer::new()
        .with_entry("Tornado Kick", "Kicks", 0.4)
        .with_entry("Cartwheel Kick", "Kicks", 0.69);
    let report = engine
        .attribute(&[reps_combo(&["Tornado Kick", "Cartwheel Kick"], 5)], &categorizer)
        .await;

    assert!(report.category_xp.is_empty());
    assert_eq!(report.category_xp.total(), 0);
    assert_eq!(report.skipped.len(), 2);
    assert!(matches!(
        report.skipped[0].reason,
        SkipReason::LowConfidence { .. }
    ));
}

#[tokio::test]
async fn test_confidence_at_floor_is_accepted() {
    let engine = create_test_engine();
    let categorizer = StaticCategorizer::new().with_entry("Tornado Kick", "Kicks", 0.7);
    let report = engine
        .attribute(&[reps_combo(&["Tornado Kick"], 1)], &categorizer)
        .await;
    assert_eq!(report.category_xp.get(Category::Kicks), 120);
}

#[tokio::test]
async fn test_unknown_category_guess_is_skipped() {
    let engine = create_test_engine();
    let categorizer = StaticCategorizer::new().with_entry("Armbar", "Grappling", 0.95);
    let report = engine
        .attribute(&[reps_combo(&["Armbar", "Jab"], 1)], &categorizer)
        .await;

    assert_eq!(report.category_xp.gains(), vec![(Category::Punches, 88)]);
    assert_eq!(
        report.skipped[0].reason,
        SkipReason::UnknownCategory {
            category: "Grappling".into()
        }
    );
}

#[tokio::test]
async fn test_categorizer_failure_skips_only_unknowns() {
    init_test_logging();
    let engine = create_test_engine();
    let report = engine
        .attribute(
            &[rounds_combo(&["Jab", "Tornado Kick"], 1)],
            &FailingCategorizer,
        )
        .await;

    assert_eq!(report.category_xp.get(Category::Punches), 88);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].name, "Tornado Kick");
    assert!(matches!(
        report.skipped[0].reason,
        SkipReason::CategorizerFailed { .. }
    ));
}

#[tokio::test]
async fn test_repeated_unknown_reported_once() {
    let engine = create_test_engine();
    let combos = vec![
        reps_combo(&["Tornado Kick"], 1),
        reps_combo(&["tornado kick", "Jab"], 1),
    ];
    let report = engine.attribute(&combos, &NoopCategorizer).await;
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(engine.unknown_techniques(&combos).len(), 1);
}

#[test]
fn test_skipping_flat_policy_is_always_fifty() {
    let engine = engine_with_policy(ActivityXpPolicy::Flat);
    let combos = [
        Combo::activity(TrainingType::Skipping, TrainingMode::Time).with_duration(10, 0),
        Combo::activity(TrainingType::Skipping, TrainingMode::Rounds).with_rounds(6),
        Combo::activity(TrainingType::Skipping, TrainingMode::Reps).with_sets(4),
        Combo::activity(TrainingType::Skipping, TrainingMode::Distance),
    ];
    for combo in combos {
        let report = engine.attribute_with_resolutions(
            slice::from_ref(&combo),
            &Resolutions::empty(),
        );
        assert_eq!(report.category_xp.gains(), vec![(Category::Footwork, 50)]);
    }
}

#[test]
fn test_skipping_mode_scaled_policy_uses_multiplier() {
    let engine = engine_with_policy(ActivityXpPolicy::ModeScaled);
    let combos = [
        Combo::activity(TrainingType::Skipping, TrainingMode::Time).with_duration(3, 0),
        Combo::activity(TrainingType::Running, TrainingMode::Distance),
    ];
    let report =
        engine.attribute_with_resolutions(&combos, &Resolutions::empty());
    assert_eq!(report.category_xp.get(Category::Footwork), 200);
}

#[test]
fn test_short_time_block_counts_as_one_minute() {
    let engine = create_test_engine();
    let combo = Combo::new(TrainingType::Shadowboxing, vec!["Jab".into()], TrainingMode::Time)
        .with_duration(0, 20);
    let report = engine
        .attribute_with_resolutions(&[combo], &Resolutions::empty());
    assert_eq!(report.category_xp.get(Category::Punches), 88);
}

#[test]
fn test_missing_sets_contribute_zero() {
    let engine = create_test_engine();
    let combo = Combo::new(TrainingType::Pads, vec!["Jab".into()], TrainingMode::Reps);
    let report = engine
        .attribute_with_resolutions(&[combo], &Resolutions::empty());
    assert!(report.category_xp.is_empty());
    assert!(report.skipped.is_empty());
}
