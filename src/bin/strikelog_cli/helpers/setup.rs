// ABOUTME: Builds the runtime pieces a command needs from the loaded configuration
// ABOUTME: Opens the database, loads the catalog, picks a categorizer and reads workout files
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use strikelog::categorizer::LlmTechniqueCategorizer;
use strikelog::config::AppConfig;
use strikelog::database::Database;
use strikelog::drafts::WorkoutDraft;
use strikelog::intelligence::{NoopCategorizer, TechniqueCategorizer, XpAttributionEngine};
use strikelog::llm::GeminiProvider;
use strikelog::utils::RetryPolicy;
use tokio::fs;
use tracing::info;

/// Connect to the configured database and run migrations
pub async fn open_database(config: &AppConfig) -> Result<Database> {
    info!("Connecting to database: {}", config.database_url);
    let database = Database::connect(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;
    Ok(database)
}

/// Attribution engine over the configured catalog
pub fn build_engine(config: &AppConfig) -> Result<Arc<XpAttributionEngine>> {
    let catalog = config.xp.load_catalog()?;
    let engine = XpAttributionEngine::with_config(Arc::new(catalog), config.xp.attribution_config())
        .context("Invalid XP attribution settings")?;
    Ok(Arc::new(engine))
}

/// Gemini-backed categorizer when a key is configured, otherwise none
pub fn build_categorizer(config: &AppConfig) -> Arc<dyn TechniqueCategorizer> {
    match &config.llm {
        Some(llm) => {
            info!("Unknown techniques will be categorized with Gemini");
            Arc::new(LlmTechniqueCategorizer::new(Arc::new(
                GeminiProvider::from_config(llm),
            )))
        }
        None => Arc::new(NoopCategorizer),
    }
}

/// Retry bounds from configuration
pub fn retry_policy(config: &AppConfig) -> RetryPolicy {
    RetryPolicy::from(&config.retry)
}

/// Read a workout JSON file: `{"notes": "...", "combos": [...]}`
pub async fn load_workout(path: &Path) -> Result<WorkoutDraft> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read workout file {}", path.display()))?;
    let draft: WorkoutDraft = serde_json::from_str(&content)
        .with_context(|| format!("Invalid workout file {}", path.display()))?;
    Ok(draft)
}
