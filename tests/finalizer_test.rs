// ABOUTME: Integration tests for previewing and finalizing workout drafts
// ABOUTME: Checks draft lifecycle, level-up summaries, categorizer resolution and progress polling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use strikelog::database::Database;
use strikelog::drafts::WorkoutDraftStore;
use strikelog::errors::{AppResult, ErrorCode};
use strikelog::intelligence::{
    Categorization, SkipReason, StaticCategorizer, TechniqueCategorizer,
};
use strikelog::models::Category;
use strikelog::services::WorkoutFinalizer;
use strikelog::utils::RetryPolicy;
use tokio::sync::Notify;
use uuid::Uuid;

use common::{create_test_database_with_user, create_test_engine, reps_combo, rounds_combo};

fn offline_finalizer(database: Database) -> WorkoutFinalizer {
    WorkoutFinalizer::offline(database, WorkoutDraftStore::new(), create_test_engine())
}

fn quick_retry() -> RetryPolicy {
    RetryPolicy::new(
        3,
        Duration::from_millis(1),
        Duration::from_millis(5),
        Duration::from_millis(200),
    )
}

/// Answers "Kicks" for every name, but only once `release` is notified
#[derive(Default)]
struct GatedCategorizer {
    entered: Arc<Notify>,
    release: Arc<Notify>,
    calls: AtomicU32,
}

#[async_trait]
impl TechniqueCategorizer for GatedCategorizer {
    fn name(&self) -> &'static str {
        "gated"
    }

    async fn categorize(&self, names: &[String]) -> AppResult<Vec<Categorization>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.release.notified().await;
        Ok(names
            .iter()
            .map(|name| Categorization::new(name.clone(), "Kicks", 0.9))
            .collect())
    }
}

#[tokio::test]
async fn test_preview_matches_finalize_and_writes_nothing() {
    let (database, user_id) = create_test_database_with_user().await.unwrap();
    let finalizer = offline_finalizer(database.clone());
    finalizer
        .drafts()
        .add_combo(user_id, rounds_combo(&["Jab", "Cross", "Low Kick"], 3));

    let preview = finalizer.preview(user_id).unwrap();
    assert_eq!(preview.category_xp.total(), 924);
    assert!(database.xp_history(user_id, None, 0).await.unwrap().is_empty());
    assert!(finalizer.drafts().get(user_id).is_some());

    let summary = finalizer.finalize(user_id).await.unwrap();
    assert_eq!(summary.total_xp, preview.category_xp.total());
    assert_eq!(summary.category_xp.get(&Category::Punches), Some(&528));
    assert_eq!(summary.category_xp.get(&Category::Kicks), Some(&396));
    assert!(finalizer.drafts().get(user_id).is_none());
}

#[tokio::test]
async fn test_level_up_is_reported() {
    let (database, user_id) = create_test_database_with_user().await.unwrap();
    let finalizer = offline_finalizer(database.clone());
    // 151.25 per set
    finalizer
        .drafts()
        .add_combo(user_id, reps_combo(&["Flying Knee"], 9));

    let summary = finalizer.finalize(user_id).await.unwrap();
    let level_ups: Vec<_> = summary.level_ups().collect();
    assert_eq!(level_ups.len(), 1);
    assert_eq!(level_ups[0].category, Category::Knees);
    assert_eq!(level_ups[0].new_xp, 1361);
    assert_eq!(level_ups[0].new_level, 2);

    let knees = database
        .get_category_progress(user_id, Category::Knees)
        .await
        .unwrap();
    assert_eq!(knees.level, 2);
}

#[tokio::test]
async fn test_categorizer_resolves_unknowns_on_finalize() {
    let (database, user_id) = create_test_database_with_user().await.unwrap();
    let categorizer = StaticCategorizer::new().with_entry("Tornado Kick", "Kicks", 0.9);
    let finalizer = WorkoutFinalizer::new(
        database,
        WorkoutDraftStore::new(),
        create_test_engine(),
        Arc::new(categorizer),
    );
    finalizer
        .drafts()
        .add_combo(user_id, reps_combo(&["Tornado Kick"], 2));

    // Previews never call the categorizer
    let preview = finalizer.preview(user_id).unwrap();
    assert!(preview.category_xp.is_empty());
    assert_eq!(preview.skipped[0].reason, SkipReason::Unresolved);

    let summary = finalizer.finalize(user_id).await.unwrap();
    assert_eq!(summary.category_xp.get(&Category::Kicks), Some(&240));
    assert!(summary.skipped_techniques.is_empty());
}

#[tokio::test]
async fn test_missing_and_empty_drafts_are_rejected() {
    let (database, user_id) = create_test_database_with_user().await.unwrap();
    let finalizer = offline_finalizer(database);

    let error = finalizer.finalize(user_id).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);
    let error = finalizer.preview(user_id).unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);

    finalizer.drafts().set_notes(user_id, Some("forgot the combos".into()));
    let error = finalizer.finalize(user_id).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
    assert!(finalizer.drafts().get(user_id).is_some());
}

#[tokio::test]
async fn test_uninitialized_user_times_out_and_keeps_draft() {
    let (database, _) = create_test_database_with_user().await.unwrap();
    let finalizer = offline_finalizer(database.clone()).with_retry_policy(quick_retry());
    let stranger = Uuid::new_v4();
    finalizer
        .drafts()
        .add_combo(stranger, reps_combo(&["Jab"], 1));

    let error = finalizer.finalize(stranger).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::Timeout);
    assert!(finalizer.drafts().get(stranger).is_some());
    assert!(database.list_workouts(stranger, 0).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_finalize_can_be_retried() {
    let (database, _) = create_test_database_with_user().await.unwrap();
    let finalizer = offline_finalizer(database.clone()).with_retry_policy(quick_retry());
    let user_id = Uuid::new_v4();
    finalizer
        .drafts()
        .add_combo(user_id, reps_combo(&["Jab"], 2));

    assert!(finalizer.finalize(user_id).await.is_err());

    database.initialize_user_progress(user_id).await.unwrap();
    let summary = finalizer.finalize(user_id).await.unwrap();
    assert_eq!(summary.total_xp, 176);
    assert!(finalizer.drafts().is_empty());
}

#[tokio::test]
async fn test_combos_added_during_finalize_stay_in_draft() {
    let (database, user_id) = create_test_database_with_user().await.unwrap();
    let categorizer = Arc::new(GatedCategorizer::default());
    let finalizer = WorkoutFinalizer::new(
        database.clone(),
        WorkoutDraftStore::new(),
        create_test_engine(),
        categorizer.clone(),
    );
    finalizer
        .drafts()
        .add_combo(user_id, reps_combo(&["Jab", "Tornado Kick"], 1));

    let background = finalizer.clone();
    let handle = tokio::spawn(async move { background.finalize(user_id).await });

    categorizer.entered.notified().await;
    finalizer
        .drafts()
        .add_combo(user_id, reps_combo(&["Cross"], 3));
    categorizer.release.notify_one();

    let summary = handle.await.unwrap().unwrap();
    // Jab 88 + Tornado Kick 120
    assert_eq!(summary.total_xp, 208);

    let remaining = finalizer.drafts().get(user_id).unwrap();
    assert_eq!(remaining.combos, vec![reps_combo(&["Cross"], 3)]);

    let summary = finalizer.finalize(user_id).await.unwrap();
    assert_eq!(summary.total_xp, 264);
    assert!(finalizer.drafts().get(user_id).is_none());
    assert_eq!(database.list_workouts(user_id, 0).await.unwrap().len(), 2);
    assert_eq!(categorizer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_uninitialized_user_never_reaches_categorizer() {
    let (database, _) = create_test_database_with_user().await.unwrap();
    let categorizer = Arc::new(GatedCategorizer::default());
    let finalizer = WorkoutFinalizer::new(
        database,
        WorkoutDraftStore::new(),
        create_test_engine(),
        categorizer.clone(),
    )
    .with_retry_policy(quick_retry());
    let stranger = Uuid::new_v4();
    finalizer
        .drafts()
        .add_combo(stranger, reps_combo(&["Tornado Kick"], 1));

    let error = finalizer.finalize(stranger).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::Timeout);
    assert_eq!(categorizer.calls.load(Ordering::SeqCst), 0);
}
