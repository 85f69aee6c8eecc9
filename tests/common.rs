// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides quiet logging, in-memory databases, seeded users and fixture combos
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `strikelog`

use std::env;
use std::sync::{Arc, Once};

use anyhow::Result;
use async_trait::async_trait;
use strikelog::database::Database;
use strikelog::errors::{AppError, AppResult};
use strikelog::intelligence::{Categorization, TechniqueCategorizer, XpAttributionEngine};
use strikelog::models::{Combo, TechniqueCatalog, TrainingMode, TrainingType};
use tracing::Level;
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        // Another test binary may already have installed a subscriber
        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Fresh in-memory database
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Ok(Database::new("sqlite::memory:").await?)
}

/// In-memory database with one initialized user
pub async fn create_test_database_with_user() -> Result<(Database, Uuid)> {
    let database = create_test_database().await?;
    let user_id = Uuid::new_v4();
    database.initialize_user_progress(user_id).await?;
    Ok((database, user_id))
}

/// Engine over the builtin catalog with default settings
pub fn create_test_engine() -> Arc<XpAttributionEngine> {
    Arc::new(XpAttributionEngine::new(Arc::new(TechniqueCatalog::builtin())))
}

/// Pads combo with the given techniques, scored per set
pub fn reps_combo(techniques: &[&str], sets: u32) -> Combo {
    Combo::new(
        TrainingType::Pads,
        techniques.iter().map(|&name| name.to_owned()).collect(),
        TrainingMode::Reps,
    )
    .with_sets(sets)
}

/// Heavy bag combo scored per round
pub fn rounds_combo(techniques: &[&str], rounds: u32) -> Combo {
    Combo::new(
        TrainingType::HeavyBag,
        techniques.iter().map(|&name| name.to_owned()).collect(),
        TrainingMode::Rounds,
    )
    .with_rounds(rounds)
}

/// Categorizer that always fails, for exercising the skip path
#[derive(Debug, Default)]
pub struct FailingCategorizer;

#[async_trait]
impl TechniqueCategorizer for FailingCategorizer {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn categorize(&self, _names: &[String]) -> AppResult<Vec<Categorization>> {
        Err(AppError::external_service("test", "categorizer unavailable"))
    }
}
