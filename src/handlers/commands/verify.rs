//! Verify command handler
//!
//! Gates a new verification request against the current verification axis.
//! The pending flag is re-checked at call time, so two /verify calls without
//! a moderator decision in between never produce a second review artifact.

use teloxide::{Bot, prelude::*, types::Message};
use tracing::debug;
use crate::i18n::I18n;
use crate::services::{ServiceFactory, VerifyGate};
use crate::state::{DialogueMode, StateStorage};
use crate::utils::errors::{SignalScannerError, Result};

/// Handle /verify
pub async fn handle_verify(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
    state_storage: StateStorage,
    i18n: I18n,
) -> Result<()> {
    let user = msg.from.as_ref().ok_or_else(|| {
        SignalScannerError::InvalidInput("No user in message".to_string())
    })?;
    let user_id = user.id.0 as i64;
    let language = services.user_service.language(user_id).await?;
    let lang = language.code();

    match services.verification_service.begin(user_id).await? {
        VerifyGate::AlreadyVerified => {
            bot.send_message(msg.chat.id, i18n.t("messages.verify.already_verified", lang, None))
                .await?;
        }
        VerifyGate::AlreadyPending => {
            bot.send_message(msg.chat.id, i18n.t("messages.verify.pending", lang, None))
                .await?;
        }
        VerifyGate::ReadyForFiles => {
            debug!(user_id = user_id, "Entering verification file wait");
            state_storage
                .enter_mode(user_id, DialogueMode::AwaitingVerificationFiles)
                .await?;
            bot.send_message(msg.chat.id, i18n.t("messages.verify.request", lang, None))
                .await?;
        }
    }

    Ok(())
}
