use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::ParseMode;

use super::{keyboards, BotState};
use crate::bot::commands::Command;
use crate::dispatch::{ButtonTag, Event, Reply};
use crate::messages;
use crate::store::UserId;

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

// Handler for dispatcher-based command handling. Errors are caught
// here: log the detail, tell the user something generic, leave the
// conversation state as it is.
pub async fn handle_command_dispatch(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: Arc<BotState>,
) -> HandlerResult {
    if let Err(e) = handle_command(&bot, &msg, cmd, &state).await {
        tracing::error!("Error handling command for chat {}: {}", msg.chat.id, e);
        let _ = bot.send_message(msg.chat.id, messages::ERROR_TEXT).await;
    }
    Ok(())
}

async fn handle_command(
    bot: &Bot,
    msg: &Message,
    cmd: Command,
    state: &BotState,
) -> HandlerResult {
    let user_id = user_id_of(msg);

    match cmd {
        Command::Start(args) => {
            let payload = args.trim();
            let deep_link = (!payload.is_empty()).then(|| payload.to_string());
            tracing::info!("/start from user {} (deep link: {:?})", user_id, deep_link);

            if let Some(reply) = state.dispatcher.dispatch(user_id, Event::Start { deep_link }).await {
                send_reply(bot, msg.chat.id, user_id, reply, state).await?;
            }
        }
        Command::Help => {
            if let Some(reply) =
                state.dispatcher.dispatch(user_id, Event::Button(ButtonTag::Help)).await
            {
                send_reply(bot, msg.chat.id, user_id, reply, state).await?;
            }
        }
        Command::Stats => {
            let stats = state.store.stats().await;
            bot.send_message(
                msg.chat.id,
                format!(
                    "📊 Bot Statistics\n\n\
                    👥 Total users: {}\n\
                    🔗 Connected wallets: {}\n\
                    💬 Active conversations: {}",
                    stats.total_users, stats.connected_wallets, stats.active_conversations
                ),
            )
            .await?;
        }
        Command::Export => {
            let json = state.store.export_json().await?;
            bot.send_message(msg.chat.id, json).await?;
        }
    }

    Ok(())
}

pub(super) fn user_id_of(msg: &Message) -> UserId {
    msg.from.as_ref().map(|u| u.id.0 as i64).unwrap_or(msg.chat.id.0)
}

pub(super) async fn send_reply(
    bot: &Bot,
    chat_id: ChatId,
    user_id: UserId,
    reply: Reply,
    state: &BotState,
) -> HandlerResult {
    bot.send_message(chat_id, reply.text)
        .parse_mode(ParseMode::Markdown)
        .reply_markup(keyboards::render(reply.keyboard, user_id, &state.config))
        .await?;
    Ok(())
}
