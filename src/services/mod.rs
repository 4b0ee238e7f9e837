//! Services module
//!
//! This module contains business logic services

pub mod media;
pub mod signal;
pub mod user;
pub mod verification;

// Re-export commonly used services
pub use media::SignalPhotoCache;
pub use signal::{SignalGenerator, SignalService};
pub use user::UserService;
pub use verification::{Evidence, ReviewDecision, ReviewOutcome, SubmitOutcome, VerificationService, VerifyGate};

use crate::config::settings::Settings;
use crate::database::repositories::UserRepository;
use crate::i18n::I18n;
use teloxide::Bot;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub user_service: UserService,
    pub verification_service: VerificationService,
    pub signal_service: SignalService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(bot: Bot, settings: &Settings, user_repository: UserRepository, i18n: I18n) -> Self {
        let user_service = UserService::new(user_repository.clone());
        let verification_service =
            VerificationService::new(bot.clone(), &settings.bot, user_repository, i18n.clone());
        let generator = SignalGenerator::new(&settings.signals);
        let photos = SignalPhotoCache::new(&settings.signals);
        let signal_service = SignalService::new(bot, generator, photos, i18n, &settings.signals);

        Self {
            user_service,
            verification_service,
            signal_service,
        }
    }

    /// Create a factory with a deterministic signal generator, used in tests
    pub fn with_seeded_generator(
        bot: Bot,
        settings: &Settings,
        user_repository: UserRepository,
        i18n: I18n,
        seed: u64,
    ) -> Self {
        let mut factory = Self::new(bot.clone(), settings, user_repository, i18n.clone());
        let generator = SignalGenerator::with_seed(&settings.signals, seed);
        let photos = SignalPhotoCache::new(&settings.signals);
        factory.signal_service = SignalService::new(bot, generator, photos, i18n, &settings.signals);
        factory
    }
}
