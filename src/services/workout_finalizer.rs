// ABOUTME: Turns a user's workout draft into persisted XP, levels and history
// ABOUTME: Preview runs the attribution engine offline; finalize resolves unknowns and commits atomically
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strikelog_intelligence::{
    AttributionReport, NoopCategorizer, Resolutions, SkippedTechnique, TechniqueCategorizer,
    XpAttributionEngine,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::database::{is_retryable_error, Database};
use crate::drafts::{WorkoutDraft, WorkoutDraftStore};
use crate::errors::{AppError, AppResult};
use crate::logging::XpLogger;
use crate::models::{Category, LevelChange};
use crate::utils::RetryPolicy;

/// Outcome of a finalized workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSummary {
    /// Id of the stored workout
    pub workout_id: Uuid,
    /// Rounded XP per category that gained anything
    pub category_xp: BTreeMap<Category, u64>,
    /// Level movement per credited category
    pub level_changes: Vec<LevelChange>,
    /// Sum of all category gains
    pub total_xp: u64,
    /// Techniques that earned nothing, with the reason
    pub skipped_techniques: Vec<SkippedTechnique>,
}

impl WorkoutSummary {
    /// Categories that reached a new level
    pub fn level_ups(&self) -> impl Iterator<Item = &LevelChange> {
        self.level_changes.iter().filter(|change| change.leveled_up())
    }
}

/// Previews and commits workout drafts
#[derive(Clone)]
pub struct WorkoutFinalizer {
    database: Database,
    drafts: WorkoutDraftStore,
    engine: Arc<XpAttributionEngine>,
    categorizer: Arc<dyn TechniqueCategorizer>,
    retry: RetryPolicy,
}

impl WorkoutFinalizer {
    /// Create a finalizer with the default retry policy
    #[must_use]
    pub fn new(
        database: Database,
        drafts: WorkoutDraftStore,
        engine: Arc<XpAttributionEngine>,
        categorizer: Arc<dyn TechniqueCategorizer>,
    ) -> Self {
        Self {
            database,
            drafts,
            engine,
            categorizer,
            retry: RetryPolicy::default(),
        }
    }

    /// Finalizer that never consults a categorizer
    #[must_use]
    pub fn offline(
        database: Database,
        drafts: WorkoutDraftStore,
        engine: Arc<XpAttributionEngine>,
    ) -> Self {
        Self::new(database, drafts, engine, Arc::new(NoopCategorizer))
    }

    /// Override the retry policy
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Draft store this finalizer reads from
    #[must_use]
    pub const fn drafts(&self) -> &WorkoutDraftStore {
        &self.drafts
    }

    /// XP a draft would earn, without categorizer calls or writes
    ///
    /// Techniques missing from the catalog are reported as skipped.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the user has no draft
    pub fn preview(&self, user_id: Uuid) -> AppResult<AttributionReport> {
        let draft = self.draft_for(user_id)?;
        Ok(self
            .engine
            .attribute_with_resolutions(&draft.combos, &Resolutions::empty()))
    }

    /// Attribute, persist and clear the user's draft
    ///
    /// The draft is only cleared after the transaction commits, so a failed
    /// finalize can be retried without rebuilding the workout. Combos added
    /// while the workout was being scored stay in the draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the draft is missing or empty, the user's
    /// progress rows never appear, or the transaction fails
    #[instrument(skip(self), fields(user.id = %user_id, categorizer = self.categorizer.name()))]
    pub async fn finalize(&self, user_id: Uuid) -> AppResult<WorkoutSummary> {
        let draft = self.draft_for(user_id)?;
        if draft.is_empty() {
            return Err(AppError::invalid_input("Workout draft has no combos").with_user_id(user_id));
        }

        let database = &self.database;
        self.retry
            .poll_until("category progress rows", move || database.has_progress(user_id))
            .await
            .map_err(|e| e.with_user_id(user_id))?;

        let report = self
            .engine
            .attribute(&draft.combos, self.categorizer.as_ref())
            .await;

        let notes = draft.notes.as_deref();
        let combos = draft.combos.as_slice();
        let category_xp = &report.category_xp;
        let finalized = self
            .retry
            .retry_if("finalize workout", is_retryable_error, move || {
                database.finalize_workout(user_id, notes, combos, category_xp)
            })
            .await?;

        self.drafts.clear_committed(user_id, &draft);

        for change in &finalized.level_changes {
            XpLogger::log_xp_gain(user_id, change.category, change.xp_gained, change.new_xp);
            if change.leveled_up() {
                XpLogger::log_level_up(user_id, change);
            }
        }
        XpLogger::log_workout_finalized(
            user_id,
            finalized.workout_id,
            draft.combos.len(),
            finalized.total_xp,
        );
        if !report.skipped.is_empty() {
            info!(
                user.id = %user_id,
                skipped = report.skipped.len(),
                "Some techniques earned no XP"
            );
        }

        Ok(WorkoutSummary {
            workout_id: finalized.workout_id,
            category_xp: report.category_xp.gains().into_iter().collect(),
            level_changes: finalized.level_changes,
            total_xp: finalized.total_xp,
            skipped_techniques: report.skipped,
        })
    }

    fn draft_for(&self, user_id: Uuid) -> AppResult<WorkoutDraft> {
        self.drafts
            .get(user_id)
            .ok_or_else(|| AppError::not_found("Workout draft").with_user_id(user_id))
    }
}
