//! Bot handlers module
//!
//! This module contains all Telegram bot handlers organized by type:
//! - Command handlers for bot commands
//! - Callback handlers for inline keyboard interactions
//! - Message handlers for text and media messages

pub mod commands;
pub mod callbacks;
pub mod messages;

// Re-export commonly used handler functions
pub use commands::{Command, handle_command};
pub use callbacks::{CallbackAction, handle_callback_query};
pub use messages::handle_message;
