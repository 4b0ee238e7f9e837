//! Test context for unified test setup
//!
//! Wires the full stack against an in-memory SQLite database and a mock
//! Telegram API server: settings, repositories, services, dialogue storage
//! and loaded translations.

use std::sync::Arc;
use sqlx::sqlite::SqlitePoolOptions;
use teloxide::Bot;
use tempfile::TempDir;

use SignalScanner::config::Settings;
use SignalScanner::database::repositories::UserRepository;
use SignalScanner::i18n::I18n;
use SignalScanner::services::ServiceFactory;
use SignalScanner::state::StateStorage;

use super::telegram_mock::{TelegramMockServer, TEST_BOT_TOKEN};

pub const MODERATOR_CHAT_ID: i64 = -1001234567890;

pub struct TestContext {
    pub server: TelegramMockServer,
    pub bot: Bot,
    pub settings: Arc<Settings>,
    pub services: ServiceFactory,
    pub state_storage: StateStorage,
    pub i18n: I18n,
    pub users: UserRepository,
    // keeps the media-cache directory alive for the test's duration
    _tmp: TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        let tmp = TempDir::new().expect("temp dir");

        let mut settings = Settings::default();
        settings.bot.token = TEST_BOT_TOKEN.to_string();
        settings.bot.moderator_chat_id = MODERATOR_CHAT_ID;
        settings.database.url = "sqlite::memory:".to_string();
        settings.signals.min_delay_seconds = 1;
        settings.signals.max_delay_seconds = 1;
        settings.signals.file_id_cache = tmp
            .path()
            .join("signal_file_ids.json")
            .to_string_lossy()
            .into_owned();
        settings.signals.assets_dir = tmp.path().join("assets").to_string_lossy().into_owned();
        settings.validate().expect("test settings valid");

        // a single connection keeps every query on the same in-memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        sqlx::migrate!("./migrations").run(&pool).await.expect("migrations");
        let users = UserRepository::new(pool);

        let mut i18n = I18n::new(&settings.i18n);
        i18n.load_translations().await.expect("translations load");

        let server = TelegramMockServer::start().await;
        let bot = Bot::new(TEST_BOT_TOKEN).set_api_url(server.api_url());

        let services = ServiceFactory::with_seeded_generator(
            bot.clone(),
            &settings,
            users.clone(),
            i18n.clone(),
            42,
        );
        let state_storage = StateStorage::new(settings.dialogue.clone());

        Self {
            server,
            bot,
            settings: Arc::new(settings),
            services,
            state_storage,
            i18n,
            users,
            _tmp: tmp,
        }
    }
}
