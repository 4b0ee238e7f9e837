//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the SignalScanner application.

use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration
///
/// The returned guard must be held for the lifetime of the process, dropping
/// it stops the non-blocking file writer.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "signalscanner.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log user actions with structured data
pub fn log_user_action(user_id: i64, action: &str, details: Option<&str>) {
    info!(
        user_id = user_id,
        action = action,
        details = details,
        "User action performed"
    );
}

/// Log moderator review decisions
pub fn log_moderation_action(user_id: i64, action: &str, applied: bool) {
    if applied {
        info!(
            user_id = user_id,
            action = action,
            "Moderation decision applied"
        );
    } else {
        warn!(
            user_id = user_id,
            action = action,
            "Moderation decision ignored, request already resolved"
        );
    }
}

/// Log issued signals
pub fn log_signal_issued(user_id: i64, direction: &str, timeframe: &str) {
    info!(
        user_id = user_id,
        direction = direction,
        timeframe = timeframe,
        "Signal issued"
    );
}
