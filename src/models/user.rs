//! User model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::models::Language;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub telegram_id: i64,
    pub username: Option<String>,
    pub language_code: String,
    pub is_verified: bool,
    pub verification_pending: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Stored language, normalized; unrecognized values read as the default
    pub fn language(&self) -> Language {
        Language::from_code(&self.language_code)
    }
}
