// ABOUTME: User progress commands for strikelog-cli
// ABOUTME: Seeds category progress rows and prints progress and XP history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::{bail, Result};
use strikelog::config::AppConfig;
use strikelog::models::Category;
use tracing::info;
use uuid::Uuid;

use crate::helpers::display::{display_history, display_progress};
use crate::helpers::setup::open_database;

/// Create the nine category rows for a user
pub async fn init(config: &AppConfig, user_id: Uuid) -> Result<()> {
    let database = open_database(config).await?;
    database.initialize_user_progress(user_id).await?;
    info!(user.id = %user_id, "User progress initialized");
    println!("Progress initialized for user {user_id}");
    Ok(())
}

/// Print every category's XP and level
pub async fn progress(config: &AppConfig, user_id: Uuid) -> Result<()> {
    let database = open_database(config).await?;
    let progress = database.get_progress(user_id).await?;
    if progress.is_empty() {
        bail!("User {user_id} has no progress; run `strikelog-cli user init {user_id}` first");
    }
    display_progress(&progress);
    Ok(())
}

/// Print XP history, newest first
pub async fn history(
    config: &AppConfig,
    user_id: Uuid,
    category: Option<&str>,
    limit: u32,
) -> Result<()> {
    let category = category.map(str::parse::<Category>).transpose()?;
    let database = open_database(config).await?;
    let entries = database.xp_history(user_id, category, limit).await?;
    display_history(&entries);
    Ok(())
}
