//! Verification workflow service
//!
//! Owns every mutation of the verification axis: the /verify gate, the
//! forwarding of submitted evidence to the moderator chat, and the
//! approve/reject resolution. The at-most-one-pending invariant is enforced
//! by re-checking the pending flag at call time, and resolution idempotency
//! by the guarded UPDATE in the repository.

use teloxide::{Bot, prelude::*, types::{ChatId, FileId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, ParseMode}};
use tracing::{info, warn};
use crate::config::BotConfig;
use crate::database::repositories::UserRepository;
use crate::i18n::I18n;
use crate::utils::errors::Result;
use crate::utils::helpers::escape_html;
use crate::utils::logging::log_moderation_action;

/// Outcome of the /verify gate, re-checked at call time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyGate {
    AlreadyVerified,
    AlreadyPending,
    ReadyForFiles,
}

/// Evidence attached to a verification submission
#[derive(Debug, Clone)]
pub enum Evidence {
    Document(FileId),
    Photo(FileId),
}

/// Outcome of a file submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// No stored user row, nothing to attach the request to
    UserNotFound,
    /// Evidence delivered to the moderator chat, pending flag set
    Forwarded,
}

/// A moderator's decision on a pending request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject,
}

/// Result of applying a review decision
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    /// False when the request was already resolved; nothing was re-applied
    pub applied: bool,
    /// Moderator-language text for the callback answer and caption annotation
    pub moderator_note: String,
}

/// Verification workflow service
#[derive(Clone)]
pub struct VerificationService {
    bot: Bot,
    users: UserRepository,
    i18n: I18n,
    moderator_chat_id: ChatId,
    moderator_language: String,
}

impl VerificationService {
    pub fn new(bot: Bot, config: &BotConfig, users: UserRepository, i18n: I18n) -> Self {
        Self {
            bot,
            users,
            i18n,
            moderator_chat_id: ChatId(config.moderator_chat_id),
            moderator_language: config.moderator_language.clone(),
        }
    }

    /// Gate a /verify request against the current verification axis
    pub async fn begin(&self, telegram_id: i64) -> Result<VerifyGate> {
        if self.users.is_verified(telegram_id).await? {
            return Ok(VerifyGate::AlreadyVerified);
        }
        if self.users.is_pending(telegram_id).await? {
            return Ok(VerifyGate::AlreadyPending);
        }
        Ok(VerifyGate::ReadyForFiles)
    }

    /// Forward submitted evidence to the moderator chat
    ///
    /// The pending flag is persisted only after the moderator delivery
    /// succeeded, so a send failure never strands a user in pending with no
    /// review artifact; the submission stays retryable instead.
    pub async fn submit(&self, telegram_id: i64, evidence: Evidence) -> Result<SubmitOutcome> {
        let Some(user) = self.users.find_by_telegram_id(telegram_id).await? else {
            return Ok(SubmitOutcome::UserNotFound);
        };

        let caption = self.review_caption(user.telegram_id, user.username.as_deref());
        let keyboard = self.review_keyboard(user.telegram_id);

        match evidence {
            Evidence::Document(file_id) => {
                self.bot
                    .send_document(self.moderator_chat_id, InputFile::file_id(file_id))
                    .caption(caption)
                    .parse_mode(ParseMode::Html)
                    .reply_markup(keyboard)
                    .await?;
            }
            Evidence::Photo(file_id) => {
                self.bot
                    .send_photo(self.moderator_chat_id, InputFile::file_id(file_id))
                    .caption(caption)
                    .parse_mode(ParseMode::Html)
                    .reply_markup(keyboard)
                    .await?;
            }
        }

        self.users.set_pending(telegram_id, true).await?;
        info!(telegram_id = telegram_id, "Verification evidence forwarded to moderators");
        Ok(SubmitOutcome::Forwarded)
    }

    /// Apply a moderator decision, exactly once per pending request
    ///
    /// The state transition and the user notification happen only when the
    /// guarded update actually flipped the pending flag; a repeat decision
    /// answers the moderator without touching the user again.
    pub async fn resolve(&self, telegram_id: i64, decision: ReviewDecision) -> Result<ReviewOutcome> {
        let approved = decision == ReviewDecision::Approve;
        let applied = self.users.resolve_review(telegram_id, approved).await?;
        log_moderation_action(
            telegram_id,
            if approved { "approve" } else { "reject" },
            applied,
        );

        if !applied {
            return Ok(ReviewOutcome {
                applied: false,
                moderator_note: self.i18n.t(
                    "moderator.already_handled",
                    &self.moderator_language,
                    None,
                ),
            });
        }

        // notify the user in their stored language; delivery is best-effort
        // and never rolls the decision back
        let language = self.users.language(telegram_id).await?;
        let key = if approved {
            "messages.verify.accepted"
        } else {
            "messages.verify.rejected"
        };
        let text = self.i18n.t(key, language.code(), None);
        if let Err(e) = self.bot.send_message(ChatId(telegram_id), text).await {
            warn!(telegram_id = telegram_id, error = %e, "Failed to notify user of review decision");
        }

        let note_key = if approved {
            "moderator.approved"
        } else {
            "moderator.rejected"
        };
        Ok(ReviewOutcome {
            applied: true,
            moderator_note: self.i18n.t(note_key, &self.moderator_language, None),
        })
    }

    /// HTML caption for the review artifact sent to the moderator chat
    fn review_caption(&self, telegram_id: i64, username: Option<&str>) -> String {
        let lang = self.moderator_language.as_str();
        let username_display = match username {
            Some(name) => escape_html(name),
            None => self.i18n.t("moderator.username_missing", lang, None),
        };
        format!(
            "{}\n\n{} <code>{}</code>\n{} <code>@{}</code>",
            self.i18n.t("moderator.new_verification", lang, None),
            self.i18n.t("moderator.user_id", lang, None),
            telegram_id,
            self.i18n.t("moderator.username", lang, None),
            username_display,
        )
    }

    /// Approve/reject buttons, each carrying the target user id
    fn review_keyboard(&self, telegram_id: i64) -> InlineKeyboardMarkup {
        let lang = self.moderator_language.as_str();
        InlineKeyboardMarkup::new(vec![vec![
            InlineKeyboardButton::callback(
                self.i18n.t("buttons.verification.approve", lang, None),
                format!("approve_{}", telegram_id),
            ),
            InlineKeyboardButton::callback(
                self.i18n.t("buttons.verification.reject", lang, None),
                format!("reject_{}", telegram_id),
            ),
        ]])
    }
}
