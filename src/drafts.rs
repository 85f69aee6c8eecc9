// ABOUTME: Per-user in-progress workout drafts held in a concurrent map
// ABOUTME: Supports combo add, edit, remove and reorder plus notes before finalization
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Workout Drafts
//!
//! A draft is the list of combos a user is building before finalizing the
//! workout. Drafts of different users never share state; each lives under
//! its own key in a `DashMap` shard.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::mapref::one::RefMut;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::Combo;

/// Combos and notes of a workout that has not been finalized yet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDraft {
    /// Free-text notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Combos in the order they were performed
    #[serde(default)]
    pub combos: Vec<Combo>,
}

impl WorkoutDraft {
    /// Whether the draft has no combos
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.combos.is_empty()
    }
}

/// Concurrent store of drafts keyed by user id
#[derive(Debug, Clone, Default)]
pub struct WorkoutDraftStore {
    drafts: Arc<DashMap<Uuid, WorkoutDraft>>,
}

impl WorkoutDraftStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a user's draft wholesale
    pub fn insert(&self, user_id: Uuid, draft: WorkoutDraft) {
        self.drafts.insert(user_id, draft);
    }

    /// Append a combo, creating the draft if needed; returns its index
    pub fn add_combo(&self, user_id: Uuid, combo: Combo) -> usize {
        let mut draft = self.drafts.entry(user_id).or_default();
        draft.combos.push(combo);
        let index = draft.combos.len() - 1;
        debug!(user.id = %user_id, index, "Combo added to draft");
        index
    }

    /// Replace the combo at `index`
    ///
    /// # Errors
    ///
    /// Returns an error if the user has no draft or `index` is out of range
    pub fn update_combo(&self, user_id: Uuid, index: usize, combo: Combo) -> AppResult<()> {
        let mut draft = self.draft_mut(user_id)?;
        let len = draft.combos.len();
        let slot = draft
            .combos
            .get_mut(index)
            .ok_or_else(|| index_error(index, len))?;
        *slot = combo;
        Ok(())
    }

    /// Remove and return the combo at `index`
    ///
    /// # Errors
    ///
    /// Returns an error if the user has no draft or `index` is out of range
    pub fn remove_combo(&self, user_id: Uuid, index: usize) -> AppResult<Combo> {
        let mut draft = self.draft_mut(user_id)?;
        let len = draft.combos.len();
        if index >= len {
            return Err(index_error(index, len));
        }
        Ok(draft.combos.remove(index))
    }

    /// Move the combo at `from` so it ends up at `to`
    ///
    /// # Errors
    ///
    /// Returns an error if the user has no draft or either index is out of range
    pub fn move_combo(&self, user_id: Uuid, from: usize, to: usize) -> AppResult<()> {
        let mut draft = self.draft_mut(user_id)?;
        let len = draft.combos.len();
        if from >= len {
            return Err(index_error(from, len));
        }
        if to >= len {
            return Err(index_error(to, len));
        }
        let combo = draft.combos.remove(from);
        draft.combos.insert(to, combo);
        Ok(())
    }

    /// Set or clear the draft notes, creating the draft if needed
    pub fn set_notes(&self, user_id: Uuid, notes: Option<String>) {
        let notes = notes.filter(|n| !n.trim().is_empty());
        self.drafts.entry(user_id).or_default().notes = notes;
    }

    /// Snapshot of a user's draft
    #[must_use]
    pub fn get(&self, user_id: Uuid) -> Option<WorkoutDraft> {
        self.drafts.get(&user_id).map(|draft| draft.clone())
    }

    /// Drop a user's draft; returns whether one existed
    pub fn discard(&self, user_id: Uuid) -> bool {
        self.drafts.remove(&user_id).is_some()
    }

    /// Remove and return a user's draft
    pub fn take(&self, user_id: Uuid) -> Option<WorkoutDraft> {
        self.drafts.remove(&user_id).map(|(_, draft)| draft)
    }

    /// Clear the part of a draft that was just persisted
    ///
    /// Runs under the entry lock so edits made while `committed` was being
    /// saved are not lost. An unchanged draft is removed. Combos appended
    /// after the snapshot stay in the draft, as do notes that changed. A
    /// draft whose committed combos were edited or reordered is left as is.
    /// Returns the remaining draft, if any.
    pub fn clear_committed(&self, user_id: Uuid, committed: &WorkoutDraft) -> Option<WorkoutDraft> {
        let Entry::Occupied(mut entry) = self.drafts.entry(user_id) else {
            return None;
        };
        if entry.get() == committed {
            entry.remove();
            return None;
        }

        let draft = entry.get_mut();
        if !draft.combos.starts_with(&committed.combos) {
            warn!(
                user.id = %user_id,
                "Draft changed during finalize, keeping it unchanged"
            );
            return Some(draft.clone());
        }
        draft.combos.drain(..committed.combos.len());
        if draft.notes == committed.notes {
            draft.notes = None;
        }
        if draft.is_empty() && draft.notes.is_none() {
            entry.remove();
            return None;
        }
        debug!(
            user.id = %user_id,
            remaining = draft.combos.len(),
            "Combos added during finalize kept in draft"
        );
        Some(draft.clone())
    }

    /// Number of users with a draft
    #[must_use]
    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    /// Whether no user has a draft
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    fn draft_mut(&self, user_id: Uuid) -> AppResult<RefMut<'_, Uuid, WorkoutDraft>> {
        self.drafts.get_mut(&user_id).ok_or_else(|| {
            AppError::not_found("Workout draft").with_user_id(user_id)
        })
    }
}

fn index_error(index: usize, len: usize) -> AppError {
    AppError::out_of_range(format!(
        "Combo index {index} is out of range for a draft with {len} combos"
    ))
}
