//! Start command handler
//!
//! Handles /start and /lang: both open the language menu, re-entrant from
//! any state. The menu message itself is deleted once a choice is made and
//! the main menu is presented in the chosen language.

use teloxide::{Bot, prelude::*, types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, Message, ParseMode}};
use tracing::debug;
use crate::config::LinksConfig;
use crate::i18n::I18n;
use crate::models::Language;
use crate::state::{DialogueMode, StateStorage};
use crate::utils::errors::{SignalScannerError, Result};

/// Handle /start and /lang, entering language selection
pub async fn handle_start(
    bot: Bot,
    msg: Message,
    state_storage: StateStorage,
    i18n: I18n,
) -> Result<()> {
    let user = msg.from.as_ref().ok_or_else(|| {
        SignalScannerError::InvalidInput("No user in message".to_string())
    })?;
    let user_id = user.id.0 as i64;

    debug!(user_id = user_id, "Opening language menu");
    state_storage
        .enter_mode(user_id, DialogueMode::AwaitingLanguageSelection)
        .await?;

    // the prompt renders in the default language, no choice exists yet
    send_language_menu(&bot, msg.chat.id, Language::default(), &i18n).await
}

/// Send the language prompt with the four language buttons
///
/// Each button label is rendered in its own language; the tokens are the
/// `lang_<code>` family, two buttons per row.
pub async fn send_language_menu(
    bot: &Bot,
    chat_id: ChatId,
    language: Language,
    i18n: &I18n,
) -> Result<()> {
    let keyboard = InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback(i18n.t("buttons.language.english", "en", None), "lang_en"),
            InlineKeyboardButton::callback(i18n.t("buttons.language.russian", "ru", None), "lang_ru"),
        ],
        vec![
            InlineKeyboardButton::callback(i18n.t("buttons.language.spanish", "es", None), "lang_es"),
            InlineKeyboardButton::callback(i18n.t("buttons.language.arabic", "ar", None), "lang_ar"),
        ],
    ]);

    bot.send_message(
        chat_id,
        i18n.t("messages.start.select_language", language.code(), None),
    )
    .parse_mode(ParseMode::Html)
    .reply_markup(keyboard)
    .await?;

    Ok(())
}

/// Send the main menu in the user's language
///
/// Get-signals takes a full-width row; change-language and the support link
/// share the second row.
pub async fn send_main_menu(
    bot: &Bot,
    chat_id: ChatId,
    language: Language,
    links: &LinksConfig,
    i18n: &I18n,
) -> Result<()> {
    let lang = language.code();
    let support_url = url::Url::parse(&links.support_url)?;

    let keyboard = InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(
            i18n.t("buttons.menu.get_signals", lang, None),
            "get_signals",
        )],
        vec![
            InlineKeyboardButton::callback(
                i18n.t("buttons.menu.language", lang, None),
                "selecting_lang",
            ),
            InlineKeyboardButton::url(i18n.t("buttons.menu.support", lang, None), support_url),
        ],
    ]);

    bot.send_message(chat_id, i18n.t("messages.start.main_menu", lang, None))
        .reply_markup(keyboard)
        .await?;

    Ok(())
}
