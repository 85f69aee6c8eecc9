// ABOUTME: Workout commands for strikelog-cli
// ABOUTME: Offline XP preview, atomic finalization and recent workout listing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::path::Path;

use anyhow::{bail, Result};
use strikelog::config::AppConfig;
use strikelog::drafts::WorkoutDraftStore;
use strikelog::intelligence::Resolutions;
use strikelog::services::WorkoutFinalizer;
use uuid::Uuid;

use crate::helpers::display::{display_report, display_summary, display_workouts};
use crate::helpers::setup::{
    build_categorizer, build_engine, load_workout, open_database, retry_policy,
};

/// XP a workout file would earn; no categorizer calls, no writes
pub async fn preview(config: &AppConfig, file: &Path) -> Result<()> {
    let draft = load_workout(file).await?;
    let engine = build_engine(config)?;
    let report = engine.attribute_with_resolutions(&draft.combos, &Resolutions::empty());
    display_report(&report);
    Ok(())
}

/// Commit a workout file for a user
pub async fn finalize(config: &AppConfig, user_id: Uuid, file: &Path) -> Result<()> {
    let draft = load_workout(file).await?;
    if draft.is_empty() {
        bail!("Workout file {} has no combos", file.display());
    }

    let database = open_database(config).await?;
    let drafts = WorkoutDraftStore::new();
    drafts.insert(user_id, draft);

    let finalizer = WorkoutFinalizer::new(
        database,
        drafts,
        build_engine(config)?,
        build_categorizer(config),
    )
    .with_retry_policy(retry_policy(config));

    let summary = finalizer.finalize(user_id).await?;
    display_summary(&summary);
    Ok(())
}

/// Recent workouts, newest first
pub async fn list(config: &AppConfig, user_id: Uuid, limit: u32) -> Result<()> {
    let database = open_database(config).await?;
    let workouts = database.list_workouts(user_id, limit).await?;
    display_workouts(&workouts);
    Ok(())
}
