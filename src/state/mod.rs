//! State management module
//!
//! This module handles transient per-user dialogue state

pub mod context;
pub mod storage;

// Re-export commonly used state components
pub use context::{ConversationContext, DialogueMode};
pub use storage::StateStorage;
