//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use regex::Regex;
use crate::utils::errors::{SignalScannerError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot, &settings.i18n.supported_languages)?;
    validate_database_config(&settings.database)?;
    validate_links_config(&settings.links)?;
    validate_signals_config(&settings.signals)?;
    validate_dialogue_config(&settings.dialogue)?;
    validate_i18n_config(&settings.i18n)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig, supported_languages: &[String]) -> Result<()> {
    if config.token.is_empty() {
        return Err(SignalScannerError::Config(
            "Bot token is required".to_string()
        ));
    }

    let token_shape = Regex::new(r"^\d+:[A-Za-z0-9_-]+$")
        .map_err(|e| SignalScannerError::Config(format!("Invalid token regex: {}", e)))?;
    if !token_shape.is_match(&config.token) {
        return Err(SignalScannerError::Config(
            "Bot token does not look like a Telegram token".to_string()
        ));
    }

    if config.moderator_chat_id == 0 {
        return Err(SignalScannerError::Config(
            "Moderator chat ID is required".to_string()
        ));
    }

    if !supported_languages.contains(&config.moderator_language) {
        return Err(SignalScannerError::Config(
            "Moderator language must be in supported languages list".to_string()
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(SignalScannerError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(SignalScannerError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(SignalScannerError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate external link configuration
fn validate_links_config(config: &super::LinksConfig) -> Result<()> {
    for (name, value) in [
        ("Registration URL", &config.registration_url),
        ("Support URL", &config.support_url),
    ] {
        if value.is_empty() {
            return Err(SignalScannerError::Config(format!("{} is required", name)));
        }
        url::Url::parse(value)
            .map_err(|e| SignalScannerError::Config(format!("{} is not a valid URL: {}", name, e)))?;
    }

    Ok(())
}

/// Validate signal generation configuration
fn validate_signals_config(config: &super::SignalsConfig) -> Result<()> {
    if config.directions.is_empty() {
        return Err(SignalScannerError::Config(
            "At least one signal direction is required".to_string()
        ));
    }

    if config.timeframes.is_empty() {
        return Err(SignalScannerError::Config(
            "At least one signal timeframe is required".to_string()
        ));
    }

    if config.min_delay_seconds == 0 || config.min_delay_seconds > config.max_delay_seconds {
        return Err(SignalScannerError::Config(
            "Signal delay range must satisfy 0 < min <= max".to_string()
        ));
    }

    if config.file_id_cache.is_empty() {
        return Err(SignalScannerError::Config(
            "Signal file-id cache path is required".to_string()
        ));
    }

    Ok(())
}

/// Validate dialogue-state configuration
fn validate_dialogue_config(config: &super::DialogueConfig) -> Result<()> {
    if config.ttl_seconds == 0 {
        return Err(SignalScannerError::Config(
            "Dialogue TTL must be greater than 0".to_string()
        ));
    }

    if config.cleanup_interval_seconds == 0 {
        return Err(SignalScannerError::Config(
            "Dialogue cleanup interval must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate internationalization configuration
fn validate_i18n_config(config: &super::I18nConfig) -> Result<()> {
    if config.default_language.is_empty() {
        return Err(SignalScannerError::Config(
            "Default language is required".to_string()
        ));
    }

    if config.supported_languages.is_empty() {
        return Err(SignalScannerError::Config(
            "At least one supported language is required".to_string()
        ));
    }

    if !config.supported_languages.contains(&config.default_language) {
        return Err(SignalScannerError::Config(
            "Default language must be in supported languages list".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(SignalScannerError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(SignalScannerError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.bot.token = "12345:test_token".to_string();
        settings.bot.moderator_chat_id = 10;
        settings
    }

    #[test]
    fn test_valid_settings_pass() {
        assert!(validate_settings(&valid_settings()).is_ok());
    }

    #[test]
    fn test_malformed_token_rejected() {
        let mut settings = valid_settings();
        settings.bot.token = "not a token".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_missing_moderator_chat_rejected() {
        let mut settings = valid_settings();
        settings.bot.moderator_chat_id = 0;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_bad_link_rejected() {
        let mut settings = valid_settings();
        settings.links.support_url = "not-a-url".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_empty_direction_set_rejected() {
        let mut settings = valid_settings();
        settings.signals.directions.clear();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_inverted_delay_range_rejected() {
        let mut settings = valid_settings();
        settings.signals.min_delay_seconds = 9;
        settings.signals.max_delay_seconds = 3;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_moderator_language_must_be_supported() {
        let mut settings = valid_settings();
        settings.bot.moderator_language = "de".to_string();
        assert!(validate_settings(&settings).is_err());
    }
}
