// ABOUTME: SQLite persistence for category progress, workouts and XP history
// ABOUTME: Opens the pool, runs idempotent migrations and converts rows into domain models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database
//!
//! One `SQLite` pool backs everything Strikelog persists:
//!
//! - `category_progress`: one `(xp, level)` row per user and category
//! - `workouts` / `workout_combos`: finalized workouts and their combos
//! - `xp_history`: one row per category credited by a workout
//!
//! Writes that touch more than one table run inside a single transaction,
//! see [`transactions`].

mod progress;
pub mod transactions;
mod workouts;

pub use transactions::{is_retryable_error, SqliteTransactionGuard, TransactionGuard};
pub use workouts::FinalizedWorkout;

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use strikelog_intelligence::LevelCurve;
use tokio::fs;
use tracing::{debug, info};

use crate::config::DatabaseUrl;
use crate::errors::{AppError, AppResult};

/// How long a connection waits on a locked database before reporting busy
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Pool size for file databases
const MAX_FILE_CONNECTIONS: u32 = 5;

/// Database handle
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    curve: LevelCurve,
}

impl Database {
    /// Connect to the database and run migrations
    ///
    /// Accepts `sqlite:path/to/file.db`, `sqlite://path` or `sqlite::memory:`.
    /// Parent directories of file databases are created when missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the connection fails, or
    /// migrations fail
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let url = DatabaseUrl::parse_url(database_url)
            .map_err(|e| AppError::config(format!("Invalid database URL: {e}")))?;
        Self::connect(&url).await
    }

    /// Connect using an already parsed URL
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or migrations fail
    pub async fn connect(url: &DatabaseUrl) -> AppResult<Self> {
        if let DatabaseUrl::SQLite { path } = url {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                create_parent_dir(parent).await?;
            }
        }

        let options = SqliteConnectOptions::from_str(&url.to_connection_string())
            .map_err(|e| AppError::config(format!("Invalid SQLite connection string: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);

        // An in-memory database lives as long as its single connection
        let pool_options = if url.is_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(MAX_FILE_CONNECTIONS)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| db_error("Failed to connect to database", e))?;

        let db = Self {
            pool,
            curve: LevelCurve::standard(),
        };
        db.migrate().await?;
        info!(database = %url, "Database ready");
        Ok(db)
    }

    /// Fresh in-memory database, mostly useful for tests and previews
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or migrations fail
    pub async fn in_memory() -> AppResult<Self> {
        Self::connect(&DatabaseUrl::Memory).await
    }

    /// Get a reference to the underlying pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Level curve used when XP is credited
    #[must_use]
    pub const fn level_curve(&self) -> &LevelCurve {
        &self.curve
    }

    /// Run all migrations; safe to call repeatedly
    ///
    /// # Errors
    ///
    /// Returns an error if any table or index cannot be created
    pub async fn migrate(&self) -> AppResult<()> {
        self.create_progress_tables().await?;
        self.create_workout_tables().await?;
        self.create_history_tables().await?;
        debug!("Database migrations applied");
        Ok(())
    }

    async fn create_progress_tables(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS category_progress (
                user_id TEXT NOT NULL,
                category TEXT NOT NULL,
                xp INTEGER NOT NULL DEFAULT 0 CHECK (xp >= 0),
                level INTEGER NOT NULL DEFAULT 1 CHECK (level >= 1),
                updated_at TEXT NOT NULL,
                PRIMARY KEY (user_id, category)
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to create category_progress table", e))?;
        Ok(())
    }

    async fn create_workout_tables(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workouts (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                notes TEXT,
                total_xp INTEGER NOT NULL DEFAULT 0 CHECK (total_xp >= 0),
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to create workouts table", e))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workout_combos (
                workout_id TEXT NOT NULL REFERENCES workouts(id) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                training_type TEXT NOT NULL,
                techniques TEXT NOT NULL,
                mode TEXT NOT NULL,
                params TEXT NOT NULL,
                PRIMARY KEY (workout_id, position)
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to create workout_combos table", e))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_workouts_user_created ON workouts(user_id, created_at)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to create workouts index", e))?;
        Ok(())
    }

    async fn create_history_tables(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS xp_history (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                workout_id TEXT NOT NULL REFERENCES workouts(id) ON DELETE CASCADE,
                category TEXT NOT NULL,
                xp_gained INTEGER NOT NULL CHECK (xp_gained > 0),
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to create xp_history table", e))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_xp_history_user_created ON xp_history(user_id, created_at)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to create xp_history index", e))?;
        Ok(())
    }
}

async fn create_parent_dir(parent: &Path) -> AppResult<()> {
    fs::create_dir_all(parent).await.map_err(|e| {
        AppError::config(format!(
            "Failed to create database directory {}: {e}",
            parent.display()
        ))
    })
}

/// Convert a sqlx error, keeping its code so lock errors stay retryable
fn db_error(operation: &str, error: sqlx::Error) -> AppError {
    let mut converted = AppError::from(error);
    converted.message = format!("{operation}: {}", converted.message);
    converted
}

/// XP values are unsigned in the domain and `INTEGER` in `SQLite`
fn to_db_int(value: u64, field: &str) -> AppResult<i64> {
    i64::try_from(value)
        .map_err(|_| AppError::out_of_range(format!("{field} value {value} exceeds storage range")))
}

fn from_db_int(value: i64, field: &str) -> AppResult<u64> {
    u64::try_from(value)
        .map_err(|_| AppError::database(format!("Stored {field} is negative: {value}")))
}

fn from_db_level(value: i64) -> AppResult<u32> {
    u32::try_from(value)
        .map_err(|_| AppError::database(format!("Stored level is out of range: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = Database::in_memory().await.unwrap();
        db.migrate().await.unwrap();
        db.migrate().await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_postgres_url() {
        let result = Database::new("postgresql://localhost/strikelog").await;
        assert!(result.is_err());
    }

    #[test]
    fn test_int_conversions() {
        assert_eq!(to_db_int(42, "xp").unwrap(), 42);
        assert!(to_db_int(u64::MAX, "xp").is_err());
        assert!(from_db_int(-1, "xp").is_err());
        assert_eq!(from_db_level(3).unwrap(), 3);
    }
}
