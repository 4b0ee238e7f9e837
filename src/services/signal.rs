//! Signal generation service
//!
//! The "analysis" is a uniform random pick from the configured direction and
//! timeframe sets, preceded by a randomized delay. There is no market input
//! anywhere; the delay only simulates computation.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use teloxide::{Bot, prelude::*, types::{ChatId, InputFile, ParseMode}};
use tracing::warn;
use crate::config::SignalsConfig;
use crate::i18n::I18n;
use crate::models::{Language, Signal};
use crate::services::media::SignalPhotoCache;
use crate::utils::errors::Result;
use crate::utils::logging::log_signal_issued;

/// Uniform random signal source
///
/// Deterministic under a seeded RNG, which the tests rely on.
#[derive(Debug, Clone)]
pub struct SignalGenerator {
    directions: Vec<String>,
    timeframes: Vec<String>,
    min_delay_seconds: u64,
    max_delay_seconds: u64,
    rng: Arc<Mutex<StdRng>>,
}

impl SignalGenerator {
    /// Create a generator seeded from the operating system
    pub fn new(config: &SignalsConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a generator with a fixed seed
    pub fn with_seed(config: &SignalsConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &SignalsConfig, rng: StdRng) -> Self {
        Self {
            directions: config.directions.clone(),
            timeframes: config.timeframes.clone(),
            min_delay_seconds: config.min_delay_seconds,
            max_delay_seconds: config.max_delay_seconds,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Draw one (direction, timeframe) pair
    pub fn pick(&self) -> Signal {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let direction = self
            .directions
            .choose(&mut *rng)
            .cloned()
            .unwrap_or_default();
        let timeframe = self
            .timeframes
            .choose(&mut *rng)
            .cloned()
            .unwrap_or_default();
        Signal { direction, timeframe }
    }

    /// Cosmetic delay before a signal is delivered
    pub fn delay(&self) -> Duration {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let seconds = rng.gen_range(self.min_delay_seconds..=self.max_delay_seconds);
        Duration::from_secs(seconds)
    }
}

/// Signal delivery service
///
/// Owns the "generating…" placeholder dance and the photo-or-text response.
#[derive(Clone)]
pub struct SignalService {
    bot: Bot,
    generator: SignalGenerator,
    photos: SignalPhotoCache,
    i18n: I18n,
    pair: String,
}

impl SignalService {
    pub fn new(
        bot: Bot,
        generator: SignalGenerator,
        photos: SignalPhotoCache,
        i18n: I18n,
        config: &SignalsConfig,
    ) -> Self {
        Self {
            bot,
            generator,
            photos,
            i18n,
            pair: config.pair.clone(),
        }
    }

    pub fn photos(&self) -> &SignalPhotoCache {
        &self.photos
    }

    /// Respond to a verified user's chart screenshot with a fabricated signal
    pub async fn respond_to_chart(
        &self,
        chat_id: ChatId,
        user_id: i64,
        language: Language,
    ) -> Result<()> {
        let lang = language.code();
        let placeholder = self
            .bot
            .send_message(chat_id, self.i18n.t("messages.signals.generating", lang, None))
            .parse_mode(ParseMode::Html)
            .await?;

        tokio::time::sleep(self.generator.delay()).await;
        let signal = self.generator.pick();
        let caption = self.caption(&signal, language);

        if let Err(e) = self.bot.delete_message(chat_id, placeholder.id).await {
            warn!(user_id = user_id, error = %e, "Failed to delete signal placeholder");
        }

        match self.photos.file_id_for(&signal.direction).await {
            Some(file_id) => {
                self.bot
                    .send_photo(chat_id, InputFile::file_id(file_id))
                    .caption(caption)
                    .parse_mode(ParseMode::Html)
                    .await?;
            }
            None => {
                self.bot
                    .send_message(chat_id, caption)
                    .parse_mode(ParseMode::Html)
                    .await?;
            }
        }

        log_signal_issued(user_id, &signal.direction, &signal.timeframe);
        Ok(())
    }

    /// HTML caption for a generated signal
    pub fn caption(&self, signal: &Signal, language: Language) -> String {
        let lang = language.code();
        format!(
            "<b>{}</b>\n{} {} | {}\n{} {}",
            self.i18n.t("messages.signals.title", lang, None),
            self.i18n.t("messages.signals.pair_label", lang, None),
            self.pair,
            signal.timeframe,
            self.i18n.t("messages.signals.signal_label", lang, None),
            signal.direction,
        )
    }
}
