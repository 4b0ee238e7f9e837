//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod user;
pub mod language;
pub mod signal;

// Re-export commonly used models
pub use user::User;
pub use language::Language;
pub use signal::Signal;
