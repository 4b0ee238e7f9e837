//! Error handling for SignalScanner
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the SignalScanner application
#[derive(Error, Debug)]
pub enum SignalScannerError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i64 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for SignalScanner operations
pub type Result<T> = std::result::Result<T, SignalScannerError>;

impl SignalScannerError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SignalScannerError::Database(_) => ErrorSeverity::Critical,
            SignalScannerError::Migration(_) => ErrorSeverity::Critical,
            SignalScannerError::Config(_) => ErrorSeverity::Critical,
            SignalScannerError::UserNotFound { .. } => ErrorSeverity::Warning,
            SignalScannerError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_classification() {
        let err = SignalScannerError::Config("missing token".to_string());
        assert_eq!(err.severity(), ErrorSeverity::Critical);

        let err = SignalScannerError::UserNotFound { user_id: 42 };
        assert_eq!(err.severity(), ErrorSeverity::Warning);

        let err = SignalScannerError::InvalidInput("bad language code".to_string());
        assert_eq!(err.severity(), ErrorSeverity::Info);
    }

    #[test]
    fn test_error_display() {
        let err = SignalScannerError::UserNotFound { user_id: 100 };
        assert_eq!(err.to_string(), "User not found: 100");
    }
}
