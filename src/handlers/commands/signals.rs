//! Signals command handler
//!
//! /signals and the get-signals menu button share the same gate: verified
//! users get the chart-submission instructions, everyone else gets the
//! unauthorized message with the registration and support links.

use std::sync::Arc;
use teloxide::{Bot, prelude::*, sugar::request::RequestLinkPreviewExt, types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, Message, ParseMode}};
use crate::config::{LinksConfig, Settings};
use crate::i18n::I18n;
use crate::models::Language;
use crate::services::ServiceFactory;
use crate::utils::errors::{SignalScannerError, Result};

/// Handle /signals
pub async fn handle_signals(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
    settings: Arc<Settings>,
    i18n: I18n,
) -> Result<()> {
    let user = msg.from.as_ref().ok_or_else(|| {
        SignalScannerError::InvalidInput("No user in message".to_string())
    })?;
    let user_id = user.id.0 as i64;

    let language = services.user_service.language(user_id).await?;
    if services.user_service.is_verified(user_id).await? {
        send_instructions(&bot, msg.chat.id, language, &i18n).await
    } else {
        send_unauthorized(&bot, msg.chat.id, language, &settings.links, &i18n).await
    }
}

/// Tell a verified user how to request a signal
pub async fn send_instructions(
    bot: &Bot,
    chat_id: ChatId,
    language: Language,
    i18n: &I18n,
) -> Result<()> {
    bot.send_message(
        chat_id,
        i18n.t("messages.signals.instruction", language.code(), None),
    )
    .parse_mode(ParseMode::Html)
    .await?;
    Ok(())
}

/// Unauthorized message with registration and support link buttons
pub async fn send_unauthorized(
    bot: &Bot,
    chat_id: ChatId,
    language: Language,
    links: &LinksConfig,
    i18n: &I18n,
) -> Result<()> {
    let lang = language.code();
    let registration_url = url::Url::parse(&links.registration_url)?;
    let support_url = url::Url::parse(&links.support_url)?;

    let keyboard = InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::url(
            i18n.t("buttons.registration.create_account", lang, None),
            registration_url,
        )],
        vec![InlineKeyboardButton::url(
            i18n.t("buttons.menu.support", lang, None),
            support_url,
        )],
    ]);

    bot.send_message(chat_id, i18n.t("messages.unauthorized.body", lang, None))
        .parse_mode(ParseMode::Html)
        .disable_link_preview(true)
        .reply_markup(keyboard)
        .await?;

    Ok(())
}
