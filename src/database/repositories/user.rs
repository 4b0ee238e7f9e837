//! User repository implementation
//!
//! Every operation is a single statement keyed by the Telegram user id, so
//! concurrent identical calls stay idempotent and no row is ever observed
//! partially updated.

use chrono::Utc;
use crate::database::connection::DatabasePool;
use crate::models::{Language, User};
use crate::utils::errors::SignalScannerError;

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: DatabasePool,
}

impl UserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Find user by Telegram ID
    pub async fn find_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>, SignalScannerError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, telegram_id, username, language_code, is_verified, verification_pending, created_at, updated_at FROM users WHERE telegram_id = ?"
        )
        .bind(telegram_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Upsert a user's language and username
    ///
    /// Creates the row on first selection. On an existing row only username,
    /// language and updated_at change; the verification fields are never
    /// touched here.
    pub async fn upsert_language(
        &self,
        telegram_id: i64,
        username: Option<&str>,
        language: Language,
    ) -> Result<User, SignalScannerError> {
        let now = Utc::now();
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (telegram_id, username, language_code, is_verified, verification_pending, created_at, updated_at)
            VALUES (?, ?, ?, FALSE, FALSE, ?, ?)
            ON CONFLICT(telegram_id) DO UPDATE SET
                username = excluded.username,
                language_code = excluded.language_code,
                updated_at = excluded.updated_at
            RETURNING id, telegram_id, username, language_code, is_verified, verification_pending, created_at, updated_at
            "#
        )
        .bind(telegram_id)
        .bind(username)
        .bind(language.code())
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Stored language for a user, default when absent or unrecognized
    pub async fn language(&self, telegram_id: i64) -> Result<Language, SignalScannerError> {
        let code: Option<String> = sqlx::query_scalar(
            "SELECT language_code FROM users WHERE telegram_id = ?"
        )
        .bind(telegram_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(code.map(|c| Language::from_code(&c)).unwrap_or_default())
    }

    /// Whether a moderator has approved the user; false when the row is absent
    pub async fn is_verified(&self, telegram_id: i64) -> Result<bool, SignalScannerError> {
        let verified: Option<bool> = sqlx::query_scalar(
            "SELECT is_verified FROM users WHERE telegram_id = ?"
        )
        .bind(telegram_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(verified.unwrap_or(false))
    }

    /// Whether a submitted verification awaits a decision; false when absent
    pub async fn is_pending(&self, telegram_id: i64) -> Result<bool, SignalScannerError> {
        let pending: Option<bool> = sqlx::query_scalar(
            "SELECT verification_pending FROM users WHERE telegram_id = ?"
        )
        .bind(telegram_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(pending.unwrap_or(false))
    }

    /// Set the pending flag on its own
    pub async fn set_pending(&self, telegram_id: i64, pending: bool) -> Result<(), SignalScannerError> {
        let result = sqlx::query(
            "UPDATE users SET verification_pending = ?, updated_at = ? WHERE telegram_id = ?"
        )
        .bind(pending)
        .bind(Utc::now())
        .bind(telegram_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(telegram_id = telegram_id, "set_pending on absent user row");
        }
        Ok(())
    }

    /// Set the verified flag on its own
    pub async fn set_verified(&self, telegram_id: i64, verified: bool) -> Result<(), SignalScannerError> {
        let result = sqlx::query(
            "UPDATE users SET is_verified = ?, updated_at = ? WHERE telegram_id = ?"
        )
        .bind(verified)
        .bind(Utc::now())
        .bind(telegram_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(telegram_id = telegram_id, "set_verified on absent user row");
        }
        Ok(())
    }

    /// Apply a moderator decision exactly once
    ///
    /// The transition runs only while verification_pending is still set, one
    /// guarded UPDATE. Returns false when the request was already resolved
    /// (or never existed), which callers use to suppress repeat notifications.
    pub async fn resolve_review(&self, telegram_id: i64, approved: bool) -> Result<bool, SignalScannerError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_verified = ?, verification_pending = FALSE, updated_at = ?
            WHERE telegram_id = ? AND verification_pending = TRUE
            "#
        )
        .bind(approved)
        .bind(Utc::now())
        .bind(telegram_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
