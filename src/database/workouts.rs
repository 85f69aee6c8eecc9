// ABOUTME: Workout finalization and retrieval: one transaction writes workout, combos, progress and history
// ABOUTME: Recomputes category levels from cumulative XP and reports every level change
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use strikelog_core::constants::limits::{DEFAULT_WORKOUT_LIMIT, MAX_WORKOUT_LIMIT};
use strikelog_intelligence::CategoryXp;
use tracing::{debug, warn};
use uuid::Uuid;

use super::progress::parse_uuid;
use super::transactions::SqliteTransactionGuard;
use super::{db_error, from_db_int, from_db_level, to_db_int, Database};
use crate::errors::{AppError, AppResult};
use crate::logging::XpLogger;
use crate::models::{Combo, LevelChange, ModeParams, WorkoutRecord};

/// Result of a committed workout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizedWorkout {
    /// Id of the stored workout
    pub workout_id: Uuid,
    /// Commit timestamp
    pub created_at: DateTime<Utc>,
    /// Sum of all category gains
    pub total_xp: u64,
    /// One entry per category that gained XP, in category order
    pub level_changes: Vec<LevelChange>,
}

impl Database {
    /// Persist a workout and credit its XP in one transaction
    ///
    /// Writes the workout row, its combos, the new `(xp, level)` of every
    /// credited category and one history row per category. Categories with
    /// zero XP are left alone. Any failure rolls everything back.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the user's progress rows do not exist,
    /// or a database error if any statement fails
    pub async fn finalize_workout(
        &self,
        user_id: Uuid,
        notes: Option<&str>,
        combos: &[Combo],
        category_xp: &CategoryXp,
    ) -> AppResult<FinalizedWorkout> {
        let started = Instant::now();
        let result = self
            .write_workout(user_id, notes, combos, category_xp)
            .await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        XpLogger::log_database_operation("finalize_workout", "workouts", result.is_ok(), elapsed_ms);
        result
    }

    async fn write_workout(
        &self,
        user_id: Uuid,
        notes: Option<&str>,
        combos: &[Combo],
        category_xp: &CategoryXp,
    ) -> AppResult<FinalizedWorkout> {
        let workout_id = Uuid::new_v4();
        let now = Utc::now();
        let gains = category_xp.gains();
        let total_xp = gains
            .iter()
            .try_fold(0_u64, |sum, (_, xp)| sum.checked_add(*xp))
            .ok_or_else(|| AppError::out_of_range("Workout XP total overflows"))?;

        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin workout transaction", e))?;
        let mut guard = SqliteTransactionGuard::new(tx);

        sqlx::query(
            r"
            INSERT INTO workouts (id, user_id, notes, total_xp, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(workout_id.to_string())
        .bind(user_id.to_string())
        .bind(notes)
        .bind(to_db_int(total_xp, "total_xp")?)
        .bind(now)
        .execute(guard.executor()?)
        .await
        .map_err(|e| db_error("Failed to insert workout", e))?;

        for (position, combo) in combos.iter().enumerate() {
            let techniques = serde_json::to_string(&combo.techniques)?;
            let params = serde_json::to_string(&combo.params)?;
            sqlx::query(
                r"
                INSERT INTO workout_combos (workout_id, position, training_type, techniques, mode, params)
                VALUES ($1, $2, $3, $4, $5, $6)
                ",
            )
            .bind(workout_id.to_string())
            .bind(i64::try_from(position).unwrap_or(i64::MAX))
            .bind(combo.training_type.as_str())
            .bind(techniques)
            .bind(combo.mode.as_str())
            .bind(params)
            .execute(guard.executor()?)
            .await
            .map_err(|e| db_error("Failed to insert workout combo", e))?;
        }

        let mut level_changes = Vec::with_capacity(gains.len());
        for (category, xp_gained) in gains {
            let row = sqlx::query(
                "SELECT xp, level FROM category_progress WHERE user_id = $1 AND category = $2",
            )
            .bind(user_id.to_string())
            .bind(category.as_str())
            .fetch_optional(guard.executor()?)
            .await
            .map_err(|e| db_error("Failed to read category progress", e))?;

            let Some(row) = row else {
                warn!(user.id = %user_id, xp.category = %category, "Progress row missing, rolling back workout");
                return Err(AppError::not_found(format!("{category} progress"))
                    .with_user_id(user_id));
            };

            let previous_xp = from_db_int(row.try_get("xp")?, "xp")?;
            let previous_level = from_db_level(row.try_get("level")?)?;
            let new_xp = previous_xp.checked_add(xp_gained).ok_or_else(|| {
                AppError::out_of_range(format!("{category} XP overflows")).with_user_id(user_id)
            })?;
            let new_level = self.curve.level_for_xp(new_xp);

            sqlx::query(
                r"
                UPDATE category_progress
                SET xp = $1, level = $2, updated_at = $3
                WHERE user_id = $4 AND category = $5
                ",
            )
            .bind(to_db_int(new_xp, "xp")?)
            .bind(i64::from(new_level))
            .bind(now)
            .bind(user_id.to_string())
            .bind(category.as_str())
            .execute(guard.executor()?)
            .await
            .map_err(|e| db_error("Failed to update category progress", e))?;

            sqlx::query(
                r"
                INSERT INTO xp_history (id, user_id, workout_id, category, xp_gained, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                ",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(user_id.to_string())
            .bind(workout_id.to_string())
            .bind(category.as_str())
            .bind(to_db_int(xp_gained, "xp_gained")?)
            .bind(now)
            .execute(guard.executor()?)
            .await
            .map_err(|e| db_error("Failed to insert XP history", e))?;

            level_changes.push(LevelChange {
                category,
                xp_gained,
                previous_xp,
                new_xp,
                previous_level,
                new_level,
            });
        }

        guard.commit().await?;
        debug!(
            user.id = %user_id,
            workout.id = %workout_id,
            categories = level_changes.len(),
            "Workout transaction committed"
        );

        Ok(FinalizedWorkout {
            workout_id,
            created_at: now,
            total_xp,
            level_changes,
        })
    }

    /// Most recent workouts of a user with their combos, newest first
    ///
    /// `limit` of 0 means the default page size; larger limits are capped.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails or a stored row is corrupt
    pub async fn list_workouts(&self, user_id: Uuid, limit: u32) -> AppResult<Vec<WorkoutRecord>> {
        let limit = workout_page_size(limit);
        let rows = sqlx::query(
            r"
            SELECT id, user_id, notes, total_xp, created_at
            FROM workouts
            WHERE user_id = $1
            ORDER BY created_at DESC, rowid DESC
            LIMIT $2
            ",
        )
        .bind(user_id.to_string())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list workouts", e))?;

        let mut workouts = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut workout = row_to_workout(row)?;
            workout.combos = self.get_workout_combos(workout.id).await?;
            workouts.push(workout);
        }
        Ok(workouts)
    }

    /// A single workout with its combos
    ///
    /// # Errors
    ///
    /// Returns a not-found error if no workout has this id
    pub async fn get_workout(&self, workout_id: Uuid) -> AppResult<WorkoutRecord> {
        let row = sqlx::query(
            "SELECT id, user_id, notes, total_xp, created_at FROM workouts WHERE id = $1",
        )
        .bind(workout_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to get workout", e))?
        .ok_or_else(|| AppError::not_found("Workout").with_resource_id(workout_id.to_string()))?;

        let mut workout = row_to_workout(&row)?;
        workout.combos = self.get_workout_combos(workout_id).await?;
        Ok(workout)
    }

    /// Combos of a workout in their original order
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored combo cannot be decoded
    pub async fn get_workout_combos(&self, workout_id: Uuid) -> AppResult<Vec<Combo>> {
        let rows = sqlx::query(
            r"
            SELECT training_type, techniques, mode, params
            FROM workout_combos
            WHERE workout_id = $1
            ORDER BY position
            ",
        )
        .bind(workout_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to get workout combos", e))?;

        rows.iter().map(row_to_combo).collect()
    }
}

fn row_to_workout(row: &SqliteRow) -> AppResult<WorkoutRecord> {
    let id: String = row.try_get("id")?;
    let user_id: String = row.try_get("user_id")?;
    Ok(WorkoutRecord {
        id: parse_uuid(&id)?,
        user_id: parse_uuid(&user_id)?,
        notes: row.try_get("notes")?,
        total_xp: from_db_int(row.try_get("total_xp")?, "total_xp")?,
        combos: Vec::new(),
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_combo(row: &SqliteRow) -> AppResult<Combo> {
    let training_type: String = row.try_get("training_type")?;
    let techniques: String = row.try_get("techniques")?;
    let mode: String = row.try_get("mode")?;
    let params: String = row.try_get("params")?;
    let params: ModeParams = serde_json::from_str(&params)?;
    Ok(Combo::new(training_type.parse()?, serde_json::from_str(&techniques)?, mode.parse()?)
        .with_params(params))
}

fn workout_page_size(limit: u32) -> u32 {
    match limit {
        0 => DEFAULT_WORKOUT_LIMIT,
        n => n.min(MAX_WORKOUT_LIMIT),
    }
}
