//! State storage implementation
//!
//! In-memory storage for transient dialogue contexts, keyed by user id.
//! Entries carry a TTL and are recycled by a periodic cleanup task spawned
//! at startup. Restart loses every context, which is the intended behavior
//! for dialogue modes.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use crate::config::DialogueConfig;
use crate::utils::errors::Result;
use super::context::{ConversationContext, DialogueMode};

/// In-memory dialogue-state storage
#[derive(Debug, Clone)]
pub struct StateStorage {
    contexts: Arc<RwLock<HashMap<i64, ConversationContext>>>,
    config: DialogueConfig,
}

impl StateStorage {
    /// Create a new state storage instance
    pub fn new(config: DialogueConfig) -> Self {
        Self {
            contexts: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// Save a conversation context
    pub async fn save_context(&self, context: &ConversationContext) -> Result<()> {
        debug!(user_id = context.user_id, mode = ?context.mode, "Saving context");
        let mut contexts = self.contexts.write().await;
        contexts.insert(context.user_id, context.clone());
        Ok(())
    }

    /// Load a conversation context, dropping it when it has expired
    pub async fn load_context(&self, user_id: i64) -> Result<Option<ConversationContext>> {
        let expired = {
            let contexts = self.contexts.read().await;
            match contexts.get(&user_id) {
                Some(context) if context.is_expired() => true,
                Some(context) => return Ok(Some(context.clone())),
                None => return Ok(None),
            }
        };
        if expired {
            debug!(user_id = user_id, "Context expired, removing");
            self.delete_context(user_id).await?;
        }
        Ok(None)
    }

    /// Current dialogue mode for a user, Idle when no context exists
    pub async fn mode(&self, user_id: i64) -> Result<DialogueMode> {
        Ok(self
            .load_context(user_id)
            .await?
            .map(|c| c.mode)
            .unwrap_or_default())
    }

    /// Put a user into a dialogue mode
    pub async fn enter_mode(&self, user_id: i64, mode: DialogueMode) -> Result<()> {
        let mut context = self
            .load_context(user_id)
            .await?
            .unwrap_or_else(|| ConversationContext::new(user_id));
        context.enter_mode(mode, self.config.ttl_seconds);
        self.save_context(&context).await
    }

    /// Return a user to the idle mode
    pub async fn reset_mode(&self, user_id: i64) -> Result<()> {
        self.delete_context(user_id).await
    }

    /// Delete a conversation context
    pub async fn delete_context(&self, user_id: i64) -> Result<()> {
        let mut contexts = self.contexts.write().await;
        contexts.remove(&user_id);
        Ok(())
    }

    /// Remove every expired context, returning how many were dropped
    pub async fn cleanup_expired(&self) -> Result<usize> {
        let mut contexts = self.contexts.write().await;
        let before = contexts.len();
        contexts.retain(|_, context| !context.is_expired());
        let removed = before - contexts.len();
        if removed > 0 {
            info!(removed = removed, "Cleaned up expired dialogue contexts");
        }
        Ok(removed)
    }

    /// Spawn the periodic cleanup task
    pub fn spawn_cleanup_task(&self) -> tokio::task::JoinHandle<()> {
        let storage = self.clone();
        let interval = std::time::Duration::from_secs(storage.config.cleanup_interval_seconds);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if let Err(e) = storage.cleanup_expired().await {
                    tracing::warn!(error = %e, "Dialogue context cleanup failed");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn test_storage() -> StateStorage {
        StateStorage::new(DialogueConfig {
            ttl_seconds: 60,
            cleanup_interval_seconds: 10,
        })
    }

    #[tokio::test]
    async fn test_mode_defaults_to_idle() {
        let storage = test_storage();
        assert_eq!(storage.mode(100).await.unwrap(), DialogueMode::Idle);
    }

    #[tokio::test]
    async fn test_enter_and_reset_mode() {
        let storage = test_storage();
        storage
            .enter_mode(100, DialogueMode::AwaitingVerificationFiles)
            .await
            .unwrap();
        assert_eq!(
            storage.mode(100).await.unwrap(),
            DialogueMode::AwaitingVerificationFiles
        );

        storage.reset_mode(100).await.unwrap();
        assert_eq!(storage.mode(100).await.unwrap(), DialogueMode::Idle);
    }

    #[tokio::test]
    async fn test_contexts_are_per_user() {
        let storage = test_storage();
        storage
            .enter_mode(100, DialogueMode::AwaitingLanguageSelection)
            .await
            .unwrap();
        assert_eq!(storage.mode(200).await.unwrap(), DialogueMode::Idle);
    }

    #[tokio::test]
    async fn test_expired_context_reads_as_idle() {
        let storage = test_storage();
        let mut context = ConversationContext::new(100);
        context.mode = DialogueMode::AwaitingVerificationFiles;
        context.expires_at = Some(Utc::now() - Duration::seconds(5));
        storage.save_context(&context).await.unwrap();

        assert_eq!(storage.mode(100).await.unwrap(), DialogueMode::Idle);
    }

    #[tokio::test]
    async fn test_cleanup_removes_only_expired() {
        let storage = test_storage();
        storage
            .enter_mode(100, DialogueMode::AwaitingLanguageSelection)
            .await
            .unwrap();

        let mut stale = ConversationContext::new(200);
        stale.expires_at = Some(Utc::now() - Duration::seconds(5));
        storage.save_context(&stale).await.unwrap();

        let removed = storage.cleanup_expired().await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(
            storage.mode(100).await.unwrap(),
            DialogueMode::AwaitingLanguageSelection
        );
    }
}
