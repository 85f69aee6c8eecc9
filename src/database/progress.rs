// ABOUTME: Category progress seeding and lookups plus the XP history viewer queries
// ABOUTME: Every user has exactly one (xp, level) row per technique category
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use strikelog_core::constants::limits::{DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT};
use tracing::debug;
use uuid::Uuid;

use super::{db_error, from_db_int, from_db_level, Database};
use crate::errors::{AppError, AppResult};
use crate::models::{Category, CategoryProgress, XpHistoryEntry};

impl Database {
    /// Seed the nine category rows for a user at zero XP, level 1
    ///
    /// Existing rows are left untouched, so calling this twice is harmless.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn initialize_user_progress(&self, user_id: Uuid) -> AppResult<()> {
        let now = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin progress seeding", e))?;

        for category in Category::ALL {
            sqlx::query(
                r"
                INSERT OR IGNORE INTO category_progress (user_id, category, xp, level, updated_at)
                VALUES ($1, $2, 0, 1, $3)
                ",
            )
            .bind(user_id.to_string())
            .bind(category.as_str())
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to seed category progress", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit progress seeding", e))?;
        debug!(user.id = %user_id, "Category progress initialized");
        Ok(())
    }

    /// Whether all category rows exist for a user
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn has_progress(&self, user_id: Uuid) -> AppResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM category_progress WHERE user_id = $1")
                .bind(user_id.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_error("Failed to count category progress", e))?;
        Ok(count >= i64::try_from(Category::ALL.len()).unwrap_or(i64::MAX))
    }

    /// All category progress rows for a user, in category display order
    ///
    /// Returns an empty list for users that were never initialized.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row is corrupt
    pub async fn get_progress(&self, user_id: Uuid) -> AppResult<Vec<CategoryProgress>> {
        let rows = sqlx::query(
            "SELECT category, xp, level FROM category_progress WHERE user_id = $1",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to get category progress", e))?;

        let mut progress = rows
            .iter()
            .map(row_to_progress)
            .collect::<AppResult<Vec<_>>>()?;
        progress.sort_by_key(|p| p.category);
        Ok(progress)
    }

    /// Progress of one category
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the user has no row for the category
    pub async fn get_category_progress(
        &self,
        user_id: Uuid,
        category: Category,
    ) -> AppResult<CategoryProgress> {
        let row = sqlx::query(
            "SELECT category, xp, level FROM category_progress WHERE user_id = $1 AND category = $2",
        )
        .bind(user_id.to_string())
        .bind(category.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to get category progress", e))?;

        match row {
            Some(row) => row_to_progress(&row),
            None => Err(AppError::not_found(format!("{category} progress"))
                .with_user_id(user_id)),
        }
    }

    /// XP history, newest first
    ///
    /// `limit` of 0 means the default page size; larger values are capped.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row is corrupt
    pub async fn xp_history(
        &self,
        user_id: Uuid,
        category: Option<Category>,
        limit: u32,
    ) -> AppResult<Vec<XpHistoryEntry>> {
        let limit = match limit {
            0 => DEFAULT_HISTORY_LIMIT,
            n => n.min(MAX_HISTORY_LIMIT),
        };

        let rows = match category {
            Some(category) => {
                sqlx::query(
                    r"
                    SELECT id, user_id, workout_id, category, xp_gained, created_at
                    FROM xp_history
                    WHERE user_id = $1 AND category = $2
                    ORDER BY created_at DESC, rowid DESC
                    LIMIT $3
                    ",
                )
                .bind(user_id.to_string())
                .bind(category.as_str())
                .bind(i64::from(limit))
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    r"
                    SELECT id, user_id, workout_id, category, xp_gained, created_at
                    FROM xp_history
                    WHERE user_id = $1
                    ORDER BY created_at DESC, rowid DESC
                    LIMIT $2
                    ",
                )
                .bind(user_id.to_string())
                .bind(i64::from(limit))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| db_error("Failed to get XP history", e))?;

        rows.iter().map(row_to_history).collect()
    }
}

fn row_to_progress(row: &SqliteRow) -> AppResult<CategoryProgress> {
    let category: String = row.try_get("category")?;
    let xp: i64 = row.try_get("xp")?;
    let level: i64 = row.try_get("level")?;
    Ok(CategoryProgress {
        category: category.parse()?,
        xp: from_db_int(xp, "xp")?,
        level: from_db_level(level)?,
    })
}

fn row_to_history(row: &SqliteRow) -> AppResult<XpHistoryEntry> {
    let id: String = row.try_get("id")?;
    let user_id: String = row.try_get("user_id")?;
    let workout_id: String = row.try_get("workout_id")?;
    let category: String = row.try_get("category")?;
    let xp_gained: i64 = row.try_get("xp_gained")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    Ok(XpHistoryEntry {
        id: parse_uuid(&id)?,
        user_id: parse_uuid(&user_id)?,
        workout_id: parse_uuid(&workout_id)?,
        category: category.parse()?,
        xp_gained: from_db_int(xp_gained, "xp_gained")?,
        created_at,
    })
}

pub(super) fn parse_uuid(value: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| AppError::database(format!("Stored id is not a UUID: {value}: {e}")))
}
