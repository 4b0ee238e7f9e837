//! Command handlers module
//!
//! This module contains handlers for the bot commands

pub mod start;
pub mod signals;
pub mod verify;

use std::sync::Arc;
use teloxide::{Bot, types::Message, utils::command::BotCommands};
use crate::config::Settings;
use crate::i18n::I18n;
use crate::services::ServiceFactory;
use crate::state::StateStorage;
use crate::utils::errors::Result;
use crate::utils::logging::log_user_action;

/// All available bot commands
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "SignalScanner commands:")]
pub enum Command {
    #[command(description = "Choose a language and open the menu")]
    Start,
    #[command(description = "Change the interface language")]
    Lang,
    #[command(description = "Submit documents for verification")]
    Verify,
    #[command(description = "Request trading signals")]
    Signals,
}

/// Main command dispatcher
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    services: ServiceFactory,
    state_storage: StateStorage,
    settings: Arc<Settings>,
    i18n: I18n,
) -> Result<()> {
    if let Some(user) = msg.from.as_ref() {
        log_user_action(user.id.0 as i64, "command", Some(&format!("{:?}", cmd)));
    }

    match cmd {
        // /lang is the re-entrant alias of /start
        Command::Start | Command::Lang => start::handle_start(bot, msg, state_storage, i18n).await,
        Command::Verify => verify::handle_verify(bot, msg, services, state_storage, i18n).await,
        Command::Signals => signals::handle_signals(bot, msg, services, settings, i18n).await,
    }
}
