//! Message handlers module
//!
//! Routes non-command messages by dialogue mode: evidence collection while
//! a verification is being submitted, the chart-screenshot signal flow for
//! photos, and the command-not-found fallback for stray text.

use std::sync::Arc;
use teloxide::{Bot, prelude::*, types::Message};
use tracing::debug;
use crate::config::Settings;
use crate::i18n::I18n;
use crate::services::{Evidence, ServiceFactory, SubmitOutcome};
use crate::state::{DialogueMode, StateStorage};
use crate::utils::errors::{SignalScannerError, Result};
use crate::handlers::commands::signals::send_unauthorized;

/// Handle an incoming non-command message
pub async fn handle_message(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
    state_storage: StateStorage,
    settings: Arc<Settings>,
    i18n: I18n,
) -> Result<()> {
    let user = msg.from.as_ref().ok_or_else(|| {
        SignalScannerError::InvalidInput("No user in message".to_string())
    })?;
    let user_id = user.id.0 as i64;

    if state_storage.mode(user_id).await? == DialogueMode::AwaitingVerificationFiles {
        return handle_verification_files(bot, msg, user_id, services, state_storage, i18n).await;
    }

    if msg.photo().is_some() {
        return handle_chart_photo(bot, msg, user_id, services, settings, i18n).await;
    }

    if msg.text().is_some() {
        let language = services.user_service.language(user_id).await?;
        bot.send_message(
            msg.chat.id,
            i18n.t("messages.errors.command_not_found", language.code(), None),
        )
        .await?;
    }

    // other update payloads outside the file wait are ignored
    Ok(())
}

/// Collect verification evidence while the user is in the file wait
///
/// Validation failures keep the mode so the user can retry; only a
/// successful forward to the moderators exits it.
async fn handle_verification_files(
    bot: Bot,
    msg: Message,
    user_id: i64,
    services: ServiceFactory,
    state_storage: StateStorage,
    i18n: I18n,
) -> Result<()> {
    let language = services.user_service.language(user_id).await?;
    let lang = language.code();

    let evidence = if let Some(document) = msg.document() {
        Some(Evidence::Document(document.file.id.clone()))
    } else {
        // Telegram sends several resolutions, forward the largest
        msg.photo()
            .and_then(|sizes| sizes.last())
            .map(|size| Evidence::Photo(size.file.id.clone()))
    };

    let Some(evidence) = evidence else {
        bot.send_message(msg.chat.id, i18n.t("messages.verify.need_file", lang, None))
            .await?;
        return Ok(());
    };

    match services.verification_service.submit(user_id, evidence).await? {
        SubmitOutcome::UserNotFound => {
            debug!(user_id = user_id, "Verification files from a user with no row");
            bot.send_message(msg.chat.id, i18n.t("messages.verify.user_not_found", lang, None))
                .await?;
        }
        SubmitOutcome::Forwarded => {
            state_storage.reset_mode(user_id).await?;
            bot.send_message(msg.chat.id, i18n.t("messages.verify.files_received", lang, None))
                .await?;
        }
    }

    Ok(())
}

/// A photo outside the file wait is a signal request
async fn handle_chart_photo(
    bot: Bot,
    msg: Message,
    user_id: i64,
    services: ServiceFactory,
    settings: Arc<Settings>,
    i18n: I18n,
) -> Result<()> {
    let language = services.user_service.language(user_id).await?;

    if !services.user_service.is_verified(user_id).await? {
        return send_unauthorized(&bot, msg.chat.id, language, &settings.links, &i18n).await;
    }

    services
        .signal_service
        .respond_to_chart(msg.chat.id, user_id, language)
        .await
}
