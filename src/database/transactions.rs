// ABOUTME: Transaction management with RAII guards and retry patterns for database operations
// ABOUTME: Rolls back uncommitted work on drop and retries lock contention with exponential backoff
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Transaction management
//!
//! - [`TransactionGuard`]: wrapper that rolls back unless `commit()` is called
//! - [`is_retryable_error`]: which failures are worth another attempt
//!
//! ```text
//! policy.retry_if("finalize workout", is_retryable_error, || async {
//!     let mut guard = TransactionGuard::new(pool.begin().await?);
//!     sqlx::query("INSERT INTO workouts ...").execute(guard.executor()?).await?;
//!     sqlx::query("UPDATE category_progress ...").execute(guard.executor()?).await?;
//!     guard.commit().await
//! }).await?;
//! ```

use sqlx::{Database, Sqlite, Transaction};
use tracing::{debug, warn};

use crate::errors::{AppError, AppResult};

/// Whether a failed transaction may succeed on retry
///
/// Locked or busy databases, pool timeouts and other errors whose code
/// reports [`AppError::is_transient`] qualify. Constraint violations never do.
/// Pass to [`RetryPolicy::retry_if`](crate::utils::RetryPolicy::retry_if).
#[must_use]
pub fn is_retryable_error(error: &AppError) -> bool {
    if error.is_transient() {
        return true;
    }
    let lowered = error.message.to_lowercase();
    if lowered.contains("constraint") {
        return false;
    }
    lowered.contains("database is locked") || lowered.contains("busy")
}

/// RAII guard for database transactions ensuring rollback on drop
///
/// Dropping the guard without calling [`commit`](Self::commit) rolls the
/// transaction back.
pub struct TransactionGuard<'c, DB: Database> {
    transaction: Option<Transaction<'c, DB>>,
    committed: bool,
}

impl<'c, DB: Database> TransactionGuard<'c, DB> {
    /// Wrap a transaction obtained from `pool.begin()`
    #[must_use]
    pub fn new(transaction: Transaction<'c, DB>) -> Self {
        debug!("TransactionGuard created");
        Self {
            transaction: Some(transaction),
            committed: false,
        }
    }

    /// Commit the transaction and consume the guard
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails or the transaction was already consumed
    pub async fn commit(mut self) -> AppResult<()> {
        match self.transaction.take() {
            Some(tx) => {
                tx.commit().await.map_err(|e| {
                    let mut error = AppError::from(e);
                    error.message = format!("Transaction commit failed: {}", error.message);
                    error
                })?;
                self.committed = true;
                debug!("TransactionGuard committed");
                Ok(())
            }
            None => Err(AppError::internal(
                "Transaction already consumed - cannot commit",
            )),
        }
    }

    /// Roll back explicitly and consume the guard
    ///
    /// # Errors
    ///
    /// Returns an error if the rollback fails or the transaction was already consumed
    pub async fn rollback(mut self) -> AppResult<()> {
        match self.transaction.take() {
            Some(tx) => {
                tx.rollback()
                    .await
                    .map_err(|e| AppError::database(format!("Transaction rollback failed: {e}")))?;
                debug!("TransactionGuard rolled back explicitly");
                Ok(())
            }
            None => Err(AppError::internal(
                "Transaction already consumed - cannot rollback",
            )),
        }
    }

    /// Check if the transaction has been committed
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        self.committed
    }

    /// Connection to run queries inside the transaction
    ///
    /// # Errors
    ///
    /// Returns an error if the guard was already committed or rolled back
    pub fn executor(&mut self) -> AppResult<&mut <DB as Database>::Connection> {
        self.transaction.as_deref_mut().ok_or_else(|| {
            AppError::internal("Transaction already consumed - guard used after commit/rollback")
        })
    }
}

impl<DB: Database> Drop for TransactionGuard<'_, DB> {
    fn drop(&mut self) {
        if self.transaction.is_some() && !self.committed {
            warn!("TransactionGuard dropped without commit - transaction will be rolled back");
        }
    }
}

/// `SQLite` transaction guard
pub type SqliteTransactionGuard<'c> = TransactionGuard<'c, Sqlite>;
