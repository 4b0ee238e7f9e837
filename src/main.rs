//! SignalScanner Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;
use teloxide::{prelude::*, types::Update};
use teloxide::dispatching::UpdateHandler;
use tracing::{info, warn, error};

use SignalScanner::{
    config::Settings,
    utils::logging,
    database::{DatabaseService, connection::create_pool},
    services::ServiceFactory,
    state::StateStorage,
    i18n::I18n,
    handlers::{
        commands::{Command, handle_command},
        callbacks::handle_callback_query,
        messages::handle_message,
    },
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard keeps the file writer alive
    let _logging_guard = logging::init_logging(&settings.logging)?;

    info!("Starting SignalScanner Telegram Bot...");

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = SignalScanner::database::connection::DatabaseConfig {
        url: settings.database.url.clone(),
        max_connections: settings.database.max_connections,
        min_connections: settings.database.min_connections,
        ..Default::default()
    };
    let db_pool = create_pool(&db_config).await?;

    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    let database_service = DatabaseService::new(db_pool);

    // Initialize i18n system
    info!("Loading translations...");
    let mut i18n = I18n::new(&settings.i18n);
    i18n.load_translations().await?;

    // Initialize transient dialogue state
    let state_storage = StateStorage::new(settings.dialogue.clone());
    state_storage.spawn_cleanup_task();

    // Initialize bot
    let bot = Bot::new(&settings.bot.token);

    // Initialize services
    info!("Initializing services...");
    let services = ServiceFactory::new(
        bot.clone(),
        &settings,
        database_service.users.clone(),
        i18n.clone(),
    );

    // One-time upload of the signal images; a failed asset is skipped and
    // that direction falls back to text-only responses
    if let Err(e) = services
        .signal_service
        .photos()
        .ensure_uploaded(&bot, ChatId(settings.bot.moderator_chat_id))
        .await
    {
        warn!(error = %e, "Signal photo bootstrap failed, continuing without cached images");
    }

    info!("Setting up bot handlers...");
    let handler = create_handler();

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![
            Arc::new(services),
            Arc::new(state_storage),
            Arc::new(settings),
            Arc::new(i18n)
        ])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd);
        })
        .enable_ctrlc_handler()
        .build();

    info!("SignalScanner bot is ready, starting polling...");
    dispatcher.dispatch().await;

    info!("SignalScanner bot has been shut down.");
    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use teloxide::dispatching::UpdateFilterExt;

    dptree::entry()
        .branch(
            Update::filter_message()
                .branch(
                    dptree::entry()
                        .filter_command::<Command>()
                        .endpoint(handle_commands),
                )
                .branch(dptree::endpoint(handle_messages)),
        )
        .branch(Update::filter_callback_query().endpoint(handle_callbacks))
}

/// Handle bot commands
async fn handle_commands(
    bot: Bot,
    msg: Message,
    cmd: Command,
    services: Arc<ServiceFactory>,
    state_storage: Arc<StateStorage>,
    settings: Arc<Settings>,
    i18n: Arc<I18n>,
) -> HandlerResult {
    let services = (*services).clone();
    let state_storage = (*state_storage).clone();
    let i18n = (*i18n).clone();

    if let Err(e) = handle_command(bot, msg, cmd, services, state_storage, settings, i18n).await {
        error!(error = %e, severity = %e.severity(), "Error handling command");
        return Err(e.into());
    }
    Ok(())
}

/// Handle regular messages
async fn handle_messages(
    bot: Bot,
    msg: Message,
    services: Arc<ServiceFactory>,
    state_storage: Arc<StateStorage>,
    settings: Arc<Settings>,
    i18n: Arc<I18n>,
) -> HandlerResult {
    let services = (*services).clone();
    let state_storage = (*state_storage).clone();
    let i18n = (*i18n).clone();

    if let Err(e) = handle_message(bot, msg, services, state_storage, settings, i18n).await {
        error!(error = %e, severity = %e.severity(), "Error handling message");
        return Err(e.into());
    }
    Ok(())
}

/// Handle callback queries
async fn handle_callbacks(
    bot: Bot,
    query: teloxide::types::CallbackQuery,
    services: Arc<ServiceFactory>,
    state_storage: Arc<StateStorage>,
    settings: Arc<Settings>,
    i18n: Arc<I18n>,
) -> HandlerResult {
    let services = (*services).clone();
    let state_storage = (*state_storage).clone();
    let i18n = (*i18n).clone();

    if let Err(e) = handle_callback_query(bot, query, services, state_storage, settings, i18n).await {
        error!(error = %e, severity = %e.severity(), "Error handling callback query");
        return Err(e.into());
    }
    Ok(())
}
