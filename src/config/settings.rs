//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub bot: BotConfig,
    pub database: DatabaseConfig,
    pub links: LinksConfig,
    pub signals: SignalsConfig,
    pub dialogue: DialogueConfig,
    pub i18n: I18nConfig,
    pub logging: LoggingConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    pub token: String,
    /// Chat receiving every verification review request
    pub moderator_chat_id: i64,
    /// Language used for moderator-facing texts
    pub moderator_language: String,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// External links shown to unverified users
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LinksConfig {
    pub registration_url: String,
    pub support_url: String,
}

/// Signal generation configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SignalsConfig {
    /// Outcome vocabulary, e.g. HIGHER/LOWER or BUY/SELL
    pub directions: Vec<String>,
    pub timeframes: Vec<String>,
    pub pair: String,
    pub min_delay_seconds: u64,
    pub max_delay_seconds: u64,
    pub assets_dir: String,
    pub file_id_cache: String,
}

/// Transient dialogue-state configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DialogueConfig {
    pub ttl_seconds: u64,
    pub cleanup_interval_seconds: u64,
}

/// Internationalization configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct I18nConfig {
    pub default_language: String,
    pub supported_languages: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("SIGNALSCANNER").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::SignalScannerError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                token: String::new(),
                moderator_chat_id: 0,
                moderator_language: "ru".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite://signalscanner.db".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            links: LinksConfig {
                registration_url: "https://u3.shortink.io/register?utm_campaign=839002&utm_source=affiliate&utm_medium=sr&a=NUYNmfmAkKYMaY&ac=scanner-trade-bot&code=ROS149".to_string(),
                support_url: "https://t.me/ScannerManager".to_string(),
            },
            signals: SignalsConfig {
                directions: vec!["HIGHER".to_string(), "LOWER".to_string()],
                timeframes: vec!["S5".to_string(), "S15".to_string()],
                pair: "EUR/USD (OTC)".to_string(),
                min_delay_seconds: 3,
                max_delay_seconds: 5,
                assets_dir: "assets".to_string(),
                file_id_cache: "signal_file_ids.json".to_string(),
            },
            dialogue: DialogueConfig {
                ttl_seconds: 3600,
                cleanup_interval_seconds: 300,
            },
            i18n: I18nConfig {
                default_language: "en".to_string(),
                supported_languages: vec![
                    "en".to_string(),
                    "ru".to_string(),
                    "es".to_string(),
                    "ar".to_string(),
                ],
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "logs".to_string(),
            },
        }
    }
}
