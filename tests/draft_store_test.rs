// ABOUTME: Integration tests for the per-user workout draft store
// ABOUTME: Covers combo editing, index errors, notes and isolation between concurrent users
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use strikelog::drafts::{WorkoutDraft, WorkoutDraftStore};
use strikelog::errors::ErrorCode;
use tokio::task::JoinSet;
use uuid::Uuid;

use common::{reps_combo, rounds_combo};

#[test]
fn test_add_update_remove() {
    let store = WorkoutDraftStore::new();
    let user_id = Uuid::new_v4();

    assert_eq!(store.add_combo(user_id, reps_combo(&["Jab"], 3)), 0);
    assert_eq!(store.add_combo(user_id, reps_combo(&["Cross"], 3)), 1);

    store
        .update_combo(user_id, 1, rounds_combo(&["Low Kick"], 2))
        .unwrap();
    let removed = store.remove_combo(user_id, 0).unwrap();
    assert_eq!(removed, reps_combo(&["Jab"], 3));

    let draft = store.get(user_id).unwrap();
    assert_eq!(draft.combos, vec![rounds_combo(&["Low Kick"], 2)]);
}

#[test]
fn test_index_errors() {
    let store = WorkoutDraftStore::new();
    let user_id = Uuid::new_v4();
    store.add_combo(user_id, reps_combo(&["Jab"], 1));

    let error = store.remove_combo(user_id, 1).unwrap_err();
    assert_eq!(error.code, ErrorCode::ValueOutOfRange);
    let error = store
        .update_combo(user_id, 5, reps_combo(&["Cross"], 1))
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ValueOutOfRange);
    let error = store.move_combo(user_id, 0, 1).unwrap_err();
    assert_eq!(error.code, ErrorCode::ValueOutOfRange);

    // Failed edits leave the draft alone
    assert_eq!(store.get(user_id).unwrap().combos.len(), 1);
}

#[test]
fn test_missing_draft_is_not_found() {
    let store = WorkoutDraftStore::new();
    let user_id = Uuid::new_v4();

    let error = store.remove_combo(user_id, 0).unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);
    assert!(store.get(user_id).is_none());
    assert!(!store.discard(user_id));
}

#[test]
fn test_notes_and_take() {
    let store = WorkoutDraftStore::new();
    let user_id = Uuid::new_v4();

    store.set_notes(user_id, Some("sparring prep".into()));
    store.add_combo(user_id, reps_combo(&["Jab"], 1));
    assert_eq!(store.len(), 1);

    let draft = store.take(user_id).unwrap();
    assert_eq!(draft.notes.as_deref(), Some("sparring prep"));
    assert_eq!(draft.combos.len(), 1);
    assert!(store.is_empty());
    assert!(store.take(user_id).is_none());
}

#[test]
fn test_insert_replaces_and_discard_removes() {
    let store = WorkoutDraftStore::new();
    let user_id = Uuid::new_v4();
    store.add_combo(user_id, reps_combo(&["Jab"], 1));

    store.insert(user_id, WorkoutDraft::default());
    assert!(store.get(user_id).unwrap().is_empty());

    assert!(store.discard(user_id));
    assert!(store.is_empty());
}

#[test]
fn test_workout_file_format() {
    let json = r#"{
        "notes": "bag work",
        "combos": [
            {"type": "heavy_bag", "techniques": ["Jab", "Cross"], "mode": "rounds", "rounds": 3}
        ]
    }"#;
    let draft: WorkoutDraft = serde_json::from_str(json).unwrap();
    assert_eq!(draft.notes.as_deref(), Some("bag work"));
    assert_eq!(draft.combos, vec![rounds_combo(&["Jab", "Cross"], 3)]);

    let empty: WorkoutDraft = serde_json::from_str("{}").unwrap();
    assert!(empty.is_empty());
}

#[tokio::test]
async fn test_concurrent_users_do_not_interfere() {
    let store = WorkoutDraftStore::new();
    let users: Vec<Uuid> = (0..8).map(|_| Uuid::new_v4()).collect();

    let mut tasks = JoinSet::new();
    for &user_id in &users {
        let store = store.clone();
        tasks.spawn(async move {
            for sets in 1..=25 {
                store.add_combo(user_id, reps_combo(&["Jab"], sets));
            }
        });
    }
    while let Some(result) = tasks.join_next().await {
        result.unwrap();
    }

    assert_eq!(store.len(), users.len());
    for user_id in users {
        let draft = store.get(user_id).unwrap();
        assert_eq!(draft.combos.len(), 25);
    }
}
