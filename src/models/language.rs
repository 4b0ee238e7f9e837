//! Supported interface languages

use serde::{Deserialize, Serialize};

/// Closed set of languages the bot speaks
///
/// Anything outside this set normalizes to [`Language::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Ru,
    Es,
    Ar,
}

impl Language {
    pub const ALL: [Language; 4] = [Language::En, Language::Ru, Language::Es, Language::Ar];

    /// Normalize a 2-letter code, anything unrecognized maps to English
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "en" => Language::En,
            "ru" => Language::Ru,
            "es" => Language::Es,
            "ar" => Language::Ar,
            _ => Language::default(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ru => "ru",
            Language::Es => "es",
            Language::Ar => "ar",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::En
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
