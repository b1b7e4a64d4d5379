//! The Telegram command bot.
//!
//! [`start_bot_worker`] long-polls Telegram for messages and hands each one to a [`CommandHandler`], then sends
//! whatever replies the handler produces.
pub mod commands;
pub mod handler;

use std::time::Duration;

use log::*;
use tokio::task::JoinHandle;
use topup_engine::JsonFileDatabase;

pub use self::{
    commands::{BotCommand, CommandError, CommandKind, CommandLine},
    handler::{AdminPolicy, CommandHandler, OutgoingMessage},
};
use crate::telegram::{TelegramClient, Update};

const MIN_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Starts the bot worker. Do not await the returned JoinHandle, as it will run indefinitely.
pub fn start_bot_worker(
    client: TelegramClient,
    handler: CommandHandler<JsonFileDatabase>,
    poll_timeout: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("🤖️ Telegram bot worker started");
        let mut offset = 0i64;
        let mut backoff = MIN_BACKOFF;
        loop {
            let updates = match client.get_updates(offset, poll_timeout).await {
                Ok(updates) => {
                    backoff = MIN_BACKOFF;
                    updates
                },
                Err(e) => {
                    error!("🤖️ Could not fetch updates from Telegram. Retrying in {}s. {e}", backoff.as_secs());
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                    continue;
                },
            };
            trace!("🤖️ {} updates received", updates.len());
            for update in updates {
                offset = offset.max(update.update_id + 1);
                for msg in replies_for(&handler, update).await {
                    if let Err(e) = client.send_message(msg.chat_id, &msg.text).await {
                        error!("🤖️ Could not send a reply to {}. {e}", msg.chat_id);
                    }
                }
            }
        }
    })
}

async fn replies_for(handler: &CommandHandler<JsonFileDatabase>, update: Update) -> Vec<OutgoingMessage> {
    let Some(message) = update.message else {
        return Vec::new();
    };
    match (message.from, message.text) {
        (Some(from), Some(text)) => handler.handle(message.chat.id, from.id, &text).await,
        _ => Vec::new(),
    }
}
