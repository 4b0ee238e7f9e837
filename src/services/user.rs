//! User service implementation
//!
//! This service handles user language preferences and the verification-state
//! predicates the workflow controller relies on. Every mutation is delegated
//! to the repository as a single keyed statement.

use tracing::{info, debug};
use crate::database::repositories::UserRepository;
use crate::models::{Language, User};
use crate::utils::errors::Result;

/// User service for managing user session state
#[derive(Debug, Clone)]
pub struct UserService {
    user_repository: UserRepository,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(user_repository: UserRepository) -> Self {
        Self { user_repository }
    }

    /// Persist a user's language choice
    ///
    /// Creates the row on first selection. The code is normalized into the
    /// supported set first, so an unrecognized value is stored as the
    /// default. Verification flags on an existing row are left untouched.
    pub async fn set_language(
        &self,
        telegram_id: i64,
        username: Option<&str>,
        code: &str,
    ) -> Result<User> {
        let language = Language::from_code(code);
        debug!(telegram_id = telegram_id, language = %language, "Setting user language");

        let user = self
            .user_repository
            .upsert_language(telegram_id, username, language)
            .await?;
        info!(telegram_id = telegram_id, language = %language, "User language saved");
        Ok(user)
    }

    /// Stored language for a user, the default when no row exists
    pub async fn language(&self, telegram_id: i64) -> Result<Language> {
        self.user_repository.language(telegram_id).await
    }

    /// Whether a moderator has approved the user
    pub async fn is_verified(&self, telegram_id: i64) -> Result<bool> {
        self.user_repository.is_verified(telegram_id).await
    }

    /// Whether a verification submission awaits a decision
    pub async fn is_pending(&self, telegram_id: i64) -> Result<bool> {
        self.user_repository.is_pending(telegram_id).await
    }

    /// Id and last-seen username for a user, None when no row exists
    pub async fn user_info(&self, telegram_id: i64) -> Result<Option<(i64, Option<String>)>> {
        let user = self.user_repository.find_by_telegram_id(telegram_id).await?;
        Ok(user.map(|u| (u.telegram_id, u.username)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_service() -> UserService {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        UserService::new(UserRepository::new(pool))
    }

    #[tokio::test]
    async fn test_set_language_normalizes_unknown_codes() {
        let service = test_service().await;
        let user = service.set_language(100, Some("alice"), "de").await.unwrap();
        assert_eq!(user.language(), Language::En);
        assert_eq!(service.language(100).await.unwrap(), Language::En);
    }

    #[tokio::test]
    async fn test_set_language_round_trips_valid_codes() {
        let service = test_service().await;
        for code in ["en", "ru", "es", "ar"] {
            service.set_language(100, Some("alice"), code).await.unwrap();
            assert_eq!(service.language(100).await.unwrap(), Language::from_code(code));
        }
    }

    #[tokio::test]
    async fn test_user_info_reports_last_seen_username() {
        let service = test_service().await;
        assert!(service.user_info(100).await.unwrap().is_none());

        service.set_language(100, Some("old_name"), "ru").await.unwrap();
        service.set_language(100, Some("new_name"), "ru").await.unwrap();
        let (id, username) = service.user_info(100).await.unwrap().unwrap();
        assert_eq!(id, 100);
        assert_eq!(username.as_deref(), Some("new_name"));
    }
}
