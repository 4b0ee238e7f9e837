//! Conversation context management
//!
//! Tracks the transient dialogue mode of each user's interaction with the
//! bot. The mode is deliberately process-local: it is not persisted and is
//! lost on restart, unlike the verification flags which live in the database.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc, Duration};

/// What the bot currently expects from a user
///
/// `Idle` is the resting mode; the other two are entered by /start (or /lang)
/// and /verify respectively and exited once the expected input arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueMode {
    Idle,
    AwaitingLanguageSelection,
    AwaitingVerificationFiles,
}

impl Default for DialogueMode {
    fn default() -> Self {
        DialogueMode::Idle
    }
}

/// Per-user conversation context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationContext {
    /// User ID this context belongs to
    pub user_id: i64,
    /// Current dialogue mode
    pub mode: DialogueMode,
    /// When this context expires (for cleanup)
    pub expires_at: Option<DateTime<Utc>>,
    /// When this context was last updated
    pub updated_at: DateTime<Utc>,
}

impl ConversationContext {
    /// Create a new idle context for a user
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            mode: DialogueMode::Idle,
            expires_at: None,
            updated_at: Utc::now(),
        }
    }

    /// Enter a non-idle dialogue mode with an expiry window
    pub fn enter_mode(&mut self, mode: DialogueMode, ttl_seconds: u64) {
        self.mode = mode;
        self.updated_at = Utc::now();
        self.expires_at = Some(Utc::now() + Duration::seconds(ttl_seconds as i64));
    }

    /// Return to the idle mode
    pub fn reset(&mut self) {
        self.mode = DialogueMode::Idle;
        self.expires_at = None;
        self.updated_at = Utc::now();
    }

    /// Check if context has expired
    pub fn is_expired(&self) -> bool {
        if let Some(expires_at) = self.expires_at {
            Utc::now() > expires_at
        } else {
            false
        }
    }

    /// Check if the user is currently in a specific mode
    pub fn is_in_mode(&self, mode: DialogueMode) -> bool {
        self.mode == mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_is_idle_and_never_expires() {
        let context = ConversationContext::new(100);
        assert_eq!(context.mode, DialogueMode::Idle);
        assert!(!context.is_expired());
        assert!(context.expires_at.is_none());
    }

    #[test]
    fn test_enter_mode_sets_expiry() {
        let mut context = ConversationContext::new(100);
        context.enter_mode(DialogueMode::AwaitingVerificationFiles, 3600);
        assert!(context.is_in_mode(DialogueMode::AwaitingVerificationFiles));
        assert!(context.expires_at.is_some());
        assert!(!context.is_expired());
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut context = ConversationContext::new(100);
        context.enter_mode(DialogueMode::AwaitingLanguageSelection, 60);
        context.reset();
        assert_eq!(context.mode, DialogueMode::Idle);
        assert!(context.expires_at.is_none());
    }

    #[test]
    fn test_expired_context_detected() {
        let mut context = ConversationContext::new(100);
        context.enter_mode(DialogueMode::AwaitingLanguageSelection, 60);
        context.expires_at = Some(Utc::now() - Duration::seconds(1));
        assert!(context.is_expired());
    }

    #[test]
    fn test_context_serialization_round_trip() {
        let mut context = ConversationContext::new(42);
        context.enter_mode(DialogueMode::AwaitingVerificationFiles, 120);

        let serialized = serde_json::to_string(&context).unwrap();
        let deserialized: ConversationContext = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized.user_id, 42);
        assert_eq!(deserialized.mode, DialogueMode::AwaitingVerificationFiles);
    }
}
