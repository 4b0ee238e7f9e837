//! Internationalization module
//!
//! This module handles multi-language support for the SignalScanner bot.
//! It provides translation loading and message formatting with a
//! requested-language → default-language → raw-key fallback chain.

pub mod loader;

// Re-export commonly used i18n components
pub use loader::{I18n, TranslationParams};
