//! Callback query handlers module
//!
//! Inbound button presses arrive as opaque string tokens and are decoded
//! exactly once here, into [`CallbackAction`]. Everything downstream works
//! with the closed variant set instead of re-parsing strings.

use std::sync::Arc;
use teloxide::{Bot, prelude::*, types::{CallbackQuery, MaybeInaccessibleMessage}};
use tracing::{info, debug, warn};
use crate::config::Settings;
use crate::i18n::I18n;
use crate::models::Language;
use crate::services::verification::ReviewDecision;
use crate::services::ServiceFactory;
use crate::state::{DialogueMode, StateStorage};
use crate::utils::errors::Result;
use crate::handlers::commands::start::{send_language_menu, send_main_menu};
use crate::handlers::commands::signals::{send_instructions, send_unauthorized};

/// Closed set of inline-button actions the bot understands
///
/// The wire format is the `lang_<code>` / `get_signals` / `selecting_lang` /
/// `approve_<id>` / `reject_<id>` token family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    SelectLanguage(Language),
    GetSignals,
    OpenLanguageMenu,
    ApproveVerification(i64),
    RejectVerification(i64),
}

impl CallbackAction {
    /// Decode a callback token, None for anything outside the known set
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "get_signals" => return Some(CallbackAction::GetSignals),
            "selecting_lang" => return Some(CallbackAction::OpenLanguageMenu),
            _ => {}
        }
        if let Some(code) = data.strip_prefix("lang_") {
            // unrecognized codes normalize to the default language
            return Some(CallbackAction::SelectLanguage(Language::from_code(code)));
        }
        if let Some(id) = data.strip_prefix("approve_") {
            return id.parse().ok().map(CallbackAction::ApproveVerification);
        }
        if let Some(id) = data.strip_prefix("reject_") {
            return id.parse().ok().map(CallbackAction::RejectVerification);
        }
        None
    }

    /// Encode the action back into its wire token
    pub fn to_data(&self) -> String {
        match self {
            CallbackAction::SelectLanguage(lang) => format!("lang_{}", lang.code()),
            CallbackAction::GetSignals => "get_signals".to_string(),
            CallbackAction::OpenLanguageMenu => "selecting_lang".to_string(),
            CallbackAction::ApproveVerification(id) => format!("approve_{}", id),
            CallbackAction::RejectVerification(id) => format!("reject_{}", id),
        }
    }
}

/// Main callback query dispatcher
pub async fn handle_callback_query(
    bot: Bot,
    query: CallbackQuery,
    services: ServiceFactory,
    state_storage: StateStorage,
    settings: Arc<Settings>,
    i18n: I18n,
) -> Result<()> {
    let user_id = query.from.id.0 as i64;
    let username = query.from.username.clone();
    debug!(user_id = user_id, callback_data = ?query.data, "Processing callback query");

    let Some(data) = query.data.as_deref() else {
        bot.answer_callback_query(query.id.clone()).await?;
        return Ok(());
    };

    let Some(action) = CallbackAction::parse(data) else {
        warn!(user_id = user_id, callback_data = %data, "Unknown callback token");
        bot.answer_callback_query(query.id.clone()).await?;
        return Ok(());
    };

    match action {
        CallbackAction::SelectLanguage(language) => {
            bot.answer_callback_query(query.id.clone()).await?;
            handle_language_selected(
                bot,
                query,
                user_id,
                username,
                language,
                services,
                state_storage,
                settings,
                i18n,
            )
            .await
        }
        CallbackAction::OpenLanguageMenu => {
            bot.answer_callback_query(query.id.clone()).await?;
            let chat_id = match query.message.as_ref() {
                Some(message) => message.chat().id,
                None => ChatId(user_id),
            };
            state_storage
                .enter_mode(user_id, DialogueMode::AwaitingLanguageSelection)
                .await?;
            let language = services.user_service.language(user_id).await?;
            send_language_menu(&bot, chat_id, language, &i18n).await
        }
        CallbackAction::GetSignals => {
            bot.answer_callback_query(query.id.clone()).await?;
            let chat_id = match query.message.as_ref() {
                Some(message) => message.chat().id,
                None => ChatId(user_id),
            };
            let language = services.user_service.language(user_id).await?;
            if services.user_service.is_verified(user_id).await? {
                send_instructions(&bot, chat_id, language, &i18n).await
            } else {
                send_unauthorized(&bot, chat_id, language, &settings.links, &i18n).await
            }
        }
        CallbackAction::ApproveVerification(target_id) => {
            handle_review_decision(
                bot,
                query,
                target_id,
                ReviewDecision::Approve,
                services,
                settings,
            )
            .await
        }
        CallbackAction::RejectVerification(target_id) => {
            handle_review_decision(
                bot,
                query,
                target_id,
                ReviewDecision::Reject,
                services,
                settings,
            )
            .await
        }
    }
}

/// Apply a language choice made from the language menu
///
/// A language button pressed with no menu pending is answered but ignored,
/// the token may come from a stale keyboard.
async fn handle_language_selected(
    bot: Bot,
    query: CallbackQuery,
    user_id: i64,
    username: Option<String>,
    language: Language,
    services: ServiceFactory,
    state_storage: StateStorage,
    settings: Arc<Settings>,
    i18n: I18n,
) -> Result<()> {
    if !state_storage
        .load_context(user_id)
        .await?
        .map(|c| c.is_in_mode(DialogueMode::AwaitingLanguageSelection))
        .unwrap_or(false)
    {
        debug!(user_id = user_id, "Language button pressed with no menu pending, ignoring");
        return Ok(());
    }

    let user = services
        .user_service
        .set_language(user_id, username.as_deref(), language.code())
        .await?;
    state_storage.reset_mode(user_id).await?;
    info!(user_id = user_id, language = %user.language(), "Language selected");

    // drop the menu message before presenting the main menu
    let chat_id = match query.message {
        Some(MaybeInaccessibleMessage::Regular(message)) => {
            let chat_id = message.chat.id;
            if let Err(e) = bot.delete_message(chat_id, message.id).await {
                warn!(user_id = user_id, error = %e, "Failed to delete language menu");
            }
            chat_id
        }
        Some(MaybeInaccessibleMessage::Inaccessible(message)) => message.chat.id,
        None => ChatId(user_id),
    };

    send_main_menu(&bot, chat_id, user.language(), &settings.links, &i18n).await
}

/// Apply an approve/reject decision from the moderator chat
async fn handle_review_decision(
    bot: Bot,
    query: CallbackQuery,
    target_id: i64,
    decision: ReviewDecision,
    services: ServiceFactory,
    settings: Arc<Settings>,
) -> Result<()> {
    let moderator_id = query.from.id.0 as i64;
    let review_chat = query.message.as_ref().map(|m| m.chat().id);

    // decision buttons are honored only inside the configured moderator chat
    if review_chat != Some(ChatId(settings.bot.moderator_chat_id)) {
        warn!(
            target_id = target_id,
            from = moderator_id,
            chat = ?review_chat,
            "Review decision from outside the moderator chat, ignoring"
        );
        bot.answer_callback_query(query.id.clone()).await?;
        return Ok(());
    }

    let outcome = services.verification_service.resolve(target_id, decision).await?;

    bot.answer_callback_query(query.id.clone())
        .text(outcome.moderator_note.clone())
        .await?;

    // annotate the review message and drop its buttons, first decision only
    if outcome.applied {
        if let Some(MaybeInaccessibleMessage::Regular(message)) = query.message {
            let caption = match message.caption() {
                Some(existing) => format!("{}\n\n{}", existing, outcome.moderator_note),
                None => outcome.moderator_note.clone(),
            };
            if let Err(e) = bot
                .edit_message_caption(message.chat.id, message.id)
                .caption(caption)
                .await
            {
                warn!(target_id = target_id, error = %e, "Failed to annotate review message");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language_tokens() {
        assert_eq!(
            CallbackAction::parse("lang_ru"),
            Some(CallbackAction::SelectLanguage(Language::Ru))
        );
        // unknown codes are normalized, not rejected
        assert_eq!(
            CallbackAction::parse("lang_xx"),
            Some(CallbackAction::SelectLanguage(Language::En))
        );
    }

    #[test]
    fn test_parse_menu_tokens() {
        assert_eq!(CallbackAction::parse("get_signals"), Some(CallbackAction::GetSignals));
        assert_eq!(
            CallbackAction::parse("selecting_lang"),
            Some(CallbackAction::OpenLanguageMenu)
        );
    }

    #[test]
    fn test_parse_review_tokens() {
        use assert_matches::assert_matches;

        assert_matches!(
            CallbackAction::parse("approve_100"),
            Some(CallbackAction::ApproveVerification(100))
        );
        assert_matches!(
            CallbackAction::parse("reject_100"),
            Some(CallbackAction::RejectVerification(100))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(CallbackAction::parse("approve_abc"), None);
        assert_eq!(CallbackAction::parse("approve_"), None);
        assert_eq!(CallbackAction::parse("something_else"), None);
        assert_eq!(CallbackAction::parse(""), None);
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let actions = [
            CallbackAction::SelectLanguage(Language::Ar),
            CallbackAction::GetSignals,
            CallbackAction::OpenLanguageMenu,
            CallbackAction::ApproveVerification(42),
            CallbackAction::RejectVerification(42),
        ];
        for action in actions {
            assert_eq!(CallbackAction::parse(&action.to_data()), Some(action));
        }
    }
}
