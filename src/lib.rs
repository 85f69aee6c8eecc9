// ABOUTME: Main library entry point for the Strikelog martial arts training tracker
// ABOUTME: Wires XP attribution, leveling, categorization, drafts and SQLite persistence together
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Strikelog
//!
//! Experience points and levels for striking martial arts training.
//!
//! A workout is a list of combos (technique sequences with a training type
//! and a volume mode). Finalizing a workout turns each technique into XP for
//! one of nine categories, adds that XP to the user's running totals and
//! recomputes the category levels on an exponential curve.
//!
//! ## Architecture
//!
//! - **`strikelog-core`**: errors, constants, models and the technique catalog
//! - **`strikelog-intelligence`**: XP attribution engine and level curve
//! - **[`llm`] / [`categorizer`]**: generative-model guesses for unknown techniques
//! - **[`drafts`]**: per-user workouts under construction
//! - **[`database`]**: `SQLite` progress, workouts and XP history
//! - **[`services`]**: preview and atomic finalization of drafts
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use strikelog::database::Database;
//! use strikelog::drafts::WorkoutDraftStore;
//! use strikelog::errors::AppResult;
//! use strikelog::intelligence::XpAttributionEngine;
//! use strikelog::models::{Combo, TechniqueCatalog, TrainingMode, TrainingType};
//! use strikelog::services::WorkoutFinalizer;
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let database = Database::new("sqlite::memory:").await?;
//!     let user_id = Uuid::new_v4();
//!     database.initialize_user_progress(user_id).await?;
//!
//!     let engine = Arc::new(XpAttributionEngine::new(Arc::new(TechniqueCatalog::builtin())));
//!     let finalizer = WorkoutFinalizer::offline(database, WorkoutDraftStore::new(), engine);
//!     finalizer.drafts().add_combo(
//!         user_id,
//!         Combo::new(TrainingType::Pads, vec!["Flying Knee".into()], TrainingMode::Reps).with_sets(2),
//!     );
//!
//!     let summary = finalizer.finalize(user_id).await?;
//!     println!("Earned {} XP", summary.total_xp);
//!     Ok(())
//! }
//! ```

/// Generative-model categorizer for techniques missing from the catalog
pub mod categorizer;

/// Environment-based configuration
pub mod config;

/// Application constants and configuration values
pub mod constants;

/// `SQLite` persistence with transactional workout finalization
pub mod database;

/// Per-user workout drafts
pub mod drafts;

/// Unified error handling with standard error codes
pub mod errors;

/// XP attribution and level progression
pub mod intelligence;

/// LLM provider abstraction
pub mod llm;

/// Structured logging setup and XP event helpers
pub mod logging;

/// Domain models and the technique catalog
pub mod models;

/// Workout preview and finalization
pub mod services;

/// Retry and polling helpers
pub mod utils;
