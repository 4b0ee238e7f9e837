//! Translation loader and i18n management
//!
//! This module provides the core internationalization functionality including
//! translation loading, caching and message formatting.

use std::collections::HashMap;
use std::path::Path;
use serde_json::{Value, Map};
use tokio::fs;
use tracing::{info, warn, error, debug};
use crate::utils::errors::{SignalScannerError, Result};
use crate::config::I18nConfig;

/// Main internationalization manager
#[derive(Debug, Clone)]
pub struct I18n {
    /// Loaded translations by language code
    translations: HashMap<String, Map<String, Value>>,
    /// Default language code
    default_language: String,
    /// Supported language codes
    supported_languages: Vec<String>,
}

/// Translation parameters for message formatting
pub type TranslationParams = HashMap<String, String>;

impl I18n {
    /// Create a new I18n instance
    pub fn new(config: &I18nConfig) -> Self {
        Self {
            translations: HashMap::new(),
            default_language: config.default_language.clone(),
            supported_languages: config.supported_languages.clone(),
        }
    }

    /// Load all translation files from the translations directory
    pub async fn load_translations(&mut self) -> Result<()> {
        let translations_dir = Path::new("translations");

        if !translations_dir.exists() {
            warn!("Translations directory not found, creating it");
            fs::create_dir_all(translations_dir).await?;
        }

        let supported_languages = self.supported_languages.clone();
        for lang_code in &supported_languages {
            let file_path = translations_dir.join(format!("{}.json", lang_code));

            if file_path.exists() {
                match self.load_language_file(&file_path, lang_code).await {
                    Ok(_) => info!("Loaded translations for language: {}", lang_code),
                    Err(e) => {
                        error!("Failed to load translations for {}: {}", lang_code, e);
                        if lang_code == &self.default_language {
                            return Err(SignalScannerError::Config(
                                format!("Failed to load default language translations: {}", e)
                            ));
                        }
                    }
                }
            } else {
                warn!("Translation file not found: {}", file_path.display());
                if lang_code == &self.default_language {
                    return Err(SignalScannerError::Config(
                        format!("Default language translation file not found: {}", file_path.display())
                    ));
                }
            }
        }

        Ok(())
    }

    /// Load a single language file
    async fn load_language_file(&mut self, file_path: &Path, lang_code: &str) -> Result<()> {
        let content = fs::read_to_string(file_path).await?;
        let translations: Value = serde_json::from_str(&content)?;

        if let Value::Object(map) = translations {
            debug!("Loaded {} top-level translation keys for {}", map.len(), lang_code);
            self.translations.insert(lang_code.to_string(), map);
        } else {
            return Err(SignalScannerError::Config(
                format!("Invalid translation file format for {}", lang_code)
            ));
        }

        Ok(())
    }

    /// Get a translated message
    ///
    /// Falls back to the default language when the requested language misses
    /// the key, and to the raw key when no language has it.
    pub fn t(&self, key: &str, lang: &str, params: Option<&TranslationParams>) -> String {
        let effective_lang = self.get_effective_language(lang);

        match self.get_translation_value(key, &effective_lang) {
            Some(translation) => {
                let text = self.extract_text_from_value(&translation);
                self.format_message(&text, params)
            }
            None => {
                if effective_lang != self.default_language {
                    match self.get_translation_value(key, &self.default_language) {
                        Some(translation) => {
                            let text = self.extract_text_from_value(&translation);
                            self.format_message(&text, params)
                        }
                        None => {
                            warn!("Translation key '{}' not found in any language", key);
                            key.to_string()
                        }
                    }
                } else {
                    warn!("Translation key '{}' not found in default language", key);
                    key.to_string()
                }
            }
        }
    }

    /// Check if a language is supported
    pub fn is_language_supported(&self, lang: &str) -> bool {
        self.supported_languages.contains(&lang.to_string())
    }

    /// Get the effective language (fallback to default if not supported)
    fn get_effective_language(&self, lang: &str) -> String {
        if self.is_language_supported(lang) && self.translations.contains_key(lang) {
            lang.to_string()
        } else {
            self.default_language.clone()
        }
    }

    /// Get translation value from nested JSON structure
    fn get_translation_value(&self, key: &str, lang: &str) -> Option<Value> {
        let translations = self.translations.get(lang)?;

        // Support nested keys like "messages.verify.request"
        let keys: Vec<&str> = key.split('.').collect();
        let mut current = Value::Object(translations.clone());

        for k in keys {
            current = current.get(k)?.clone();
        }

        Some(current)
    }

    /// Extract text from a JSON value
    fn extract_text_from_value(&self, value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            _ => value.to_string(),
        }
    }

    /// Format message with parameters
    fn format_message(&self, template: &str, params: Option<&TranslationParams>) -> String {
        if let Some(params) = params {
            let mut result = template.to_string();
            for (key, value) in params {
                let placeholder = format!("{{{}}}", key);
                result = result.replace(&placeholder, value);
            }
            result
        } else {
            template.to_string()
        }
    }

    /// Get supported languages
    pub fn supported_languages(&self) -> &[String] {
        &self.supported_languages
    }

    /// Get default language
    pub fn default_language(&self) -> &str {
        &self.default_language
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    async fn loaded_i18n() -> I18n {
        let settings = Settings::default();
        let mut i18n = I18n::new(&settings.i18n);
        i18n.load_translations().await.unwrap();
        i18n
    }

    #[tokio::test]
    async fn test_all_supported_languages_load() {
        let i18n = loaded_i18n().await;
        for lang in ["en", "ru", "es", "ar"] {
            let text = i18n.t("messages.verify.request", lang, None);
            assert_ne!(text, "messages.verify.request", "missing key for {}", lang);
            assert!(!text.is_empty());
        }
    }

    #[tokio::test]
    async fn test_unsupported_language_falls_back_to_default() {
        let i18n = loaded_i18n().await;
        let fallback = i18n.t("messages.verify.request", "de", None);
        let english = i18n.t("messages.verify.request", "en", None);
        assert_eq!(fallback, english);
    }

    #[tokio::test]
    async fn test_unknown_key_returns_raw_key() {
        let i18n = loaded_i18n().await;
        assert_eq!(i18n.t("messages.nonexistent.key", "en", None), "messages.nonexistent.key");
    }

    #[tokio::test]
    async fn test_message_formatting() {
        let i18n = loaded_i18n().await;
        let mut params = HashMap::new();
        params.insert("name".to_string(), "John".to_string());
        params.insert("count".to_string(), "5".to_string());

        let result = i18n.format_message("Hello {name}, you have {count} messages", Some(&params));
        assert_eq!(result, "Hello John, you have 5 messages");
    }

    #[tokio::test]
    async fn test_language_support_flags() {
        let i18n = loaded_i18n().await;
        assert!(i18n.is_language_supported("ar"));
        assert!(!i18n.is_language_supported("de"));
        assert_eq!(i18n.default_language(), "en");
    }
}
