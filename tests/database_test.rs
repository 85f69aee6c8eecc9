// ABOUTME: Integration tests for category progress persistence and workout finalization
// ABOUTME: Verifies cumulative XP, level recomputation, history ordering and file-backed databases
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use strikelog::database::Database;
use strikelog::errors::ErrorCode;
use strikelog::intelligence::{threshold, CategoryXp};
use strikelog::models::Category;
use tempfile::TempDir;
use uuid::Uuid;

use common::{create_test_database, create_test_database_with_user, reps_combo, rounds_combo};

fn xp_for(entries: &[(Category, f64)]) -> CategoryXp {
    let mut xp = CategoryXp::new();
    for &(category, amount) in entries {
        xp.add(category, amount);
    }
    xp
}

#[tokio::test]
async fn test_new_user_starts_at_level_one() {
    let (database, user_id) = create_test_database_with_user().await.unwrap();

    let progress = database.get_progress(user_id).await.unwrap();
    assert_eq!(progress.len(), Category::ALL.len());
    assert!(progress.iter().all(|row| row.xp == 0 && row.level == 1));
    assert!(database.has_progress(user_id).await.unwrap());
}

#[tokio::test]
async fn test_uninitialized_user_has_no_progress() {
    let database = create_test_database().await.unwrap();
    let user_id = Uuid::new_v4();

    assert!(!database.has_progress(user_id).await.unwrap());
    assert!(database.get_progress(user_id).await.unwrap().is_empty());
    let error = database
        .get_category_progress(user_id, Category::Kicks)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_xp_accumulates_across_workouts() {
    let (database, user_id) = create_test_database_with_user().await.unwrap();

    let first = database
        .finalize_workout(
            user_id,
            None,
            &[rounds_combo(&["Low Kick"], 5)],
            &xp_for(&[(Category::Kicks, 660.0)]),
        )
        .await
        .unwrap();
    assert_eq!(first.level_changes[0].new_level, 1);

    let second = database
        .finalize_workout(
            user_id,
            None,
            &[rounds_combo(&["Low Kick"], 10)],
            &xp_for(&[(Category::Kicks, 1320.0)]),
        )
        .await
        .unwrap();
    let change = &second.level_changes[0];
    assert_eq!(change.previous_xp, 660);
    assert_eq!(change.new_xp, 1980);
    assert_eq!(change.previous_level, 1);
    // 1980 sits between 1728 (level 4) and 2074 (level 5)
    assert_eq!(change.new_level, 4);

    let kicks = database
        .get_category_progress(user_id, Category::Kicks)
        .await
        .unwrap();
    assert_eq!(kicks.xp, 1980);
    assert_eq!(kicks.level, 4);
    assert!(threshold(kicks.level) <= kicks.xp);
}

#[tokio::test]
async fn test_zero_gain_categories_untouched() {
    let (database, user_id) = create_test_database_with_user().await.unwrap();

    let result = database
        .finalize_workout(
            user_id,
            Some("light day"),
            &[reps_combo(&["Jab"], 1)],
            &xp_for(&[(Category::Punches, 88.0), (Category::Elbows, 0.0)]),
        )
        .await
        .unwrap();
    assert_eq!(result.level_changes.len(), 1);
    assert_eq!(result.total_xp, 88);

    let history = database.xp_history(user_id, None, 0).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].category, Category::Punches);
    assert_eq!(history[0].workout_id, result.workout_id);

    let elbows = database
        .get_category_progress(user_id, Category::Elbows)
        .await
        .unwrap();
    assert_eq!(elbows.xp, 0);
}

#[tokio::test]
async fn test_history_is_newest_first_and_filterable() {
    let (database, user_id) = create_test_database_with_user().await.unwrap();

    let first = database
        .finalize_workout(
            user_id,
            None,
            &[reps_combo(&["Flying Knee"], 2)],
            &xp_for(&[(Category::Knees, 302.5)]),
        )
        .await
        .unwrap();
    let second = database
        .finalize_workout(
            user_id,
            None,
            &[rounds_combo(&["Jab", "Low Kick"], 1)],
            &xp_for(&[(Category::Punches, 88.0), (Category::Kicks, 132.0)]),
        )
        .await
        .unwrap();

    let history = database.xp_history(user_id, None, 0).await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].workout_id, second.workout_id);
    assert_eq!(history[2].workout_id, first.workout_id);
    assert!(history
        .windows(2)
        .all(|pair| pair[0].created_at >= pair[1].created_at));

    let knees = database
        .xp_history(user_id, Some(Category::Knees), 0)
        .await
        .unwrap();
    assert_eq!(knees.len(), 1);
    assert_eq!(knees[0].xp_gained, 303);

    let limited = database.xp_history(user_id, None, 1).await.unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].workout_id, second.workout_id);
}

#[tokio::test]
async fn test_list_workouts_includes_combos() {
    let (database, user_id) = create_test_database_with_user().await.unwrap();
    let combos = vec![
        rounds_combo(&["Jab", "Cross", "Low Kick"], 3),
        reps_combo(&["Flying Knee"], 2),
    ];

    let result = database
        .finalize_workout(
            user_id,
            Some("bag and pads"),
            &combos,
            &xp_for(&[
                (Category::Punches, 528.0),
                (Category::Kicks, 396.0),
                (Category::Knees, 302.5),
            ]),
        )
        .await
        .unwrap();
    assert_eq!(result.total_xp, 528 + 396 + 303);

    let workouts = database.list_workouts(user_id, 0).await.unwrap();
    assert_eq!(workouts.len(), 1);
    assert_eq!(workouts[0].id, result.workout_id);
    assert_eq!(workouts[0].total_xp, result.total_xp);
    assert_eq!(workouts[0].combos, combos);

    let other_user = database.list_workouts(Uuid::new_v4(), 0).await.unwrap();
    assert!(other_user.is_empty());

    let error = database.get_workout(Uuid::new_v4()).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_file_database_persists_between_connections() {
    common::init_test_logging();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("strikelog.db");
    let url = format!("sqlite:{}", path.display());
    let user_id = Uuid::new_v4();

    {
        let database = Database::new(&url).await.unwrap();
        database.initialize_user_progress(user_id).await.unwrap();
        database
            .finalize_workout(
                user_id,
                None,
                &[reps_combo(&["Jab"], 1)],
                &xp_for(&[(Category::Punches, 88.0)]),
            )
            .await
            .unwrap();
        database.pool().close().await;
    }

    let reopened = Database::new(&url).await.unwrap();
    let punches = reopened
        .get_category_progress(user_id, Category::Punches)
        .await
        .unwrap();
    assert_eq!(punches.xp, 88);
}
