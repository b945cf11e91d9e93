use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::ParseMode;

use super::handlers::{send_reply, user_id_of};
use super::{keyboards, BotState};
use crate::dispatch::{ButtonTag, Event};
use crate::messages;

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

pub async fn handle_callback(bot: Bot, q: CallbackQuery, state: Arc<BotState>) -> HandlerResult {
    let chat_id = q.message.as_ref().map(|m| m.chat().id);

    if let Err(e) = handle_callback_inner(&bot, q, &state).await {
        tracing::error!("Error handling callback: {}", e);
        if let Some(chat_id) = chat_id {
            let _ = bot.send_message(chat_id, messages::ERROR_TEXT).await;
        }
    }
    Ok(())
}

async fn handle_callback_inner(
    bot: &Bot,
    q: CallbackQuery,
    state: &BotState,
) -> HandlerResult {
    // Answer callback to remove loading state
    bot.answer_callback_query(q.id.clone()).await?;

    let data = match q.data {
        Some(ref d) => d.as_str(),
        None => return Ok(()),
    };

    let chat_id = match q.message {
        Some(ref m) => m.chat().id,
        None => return Ok(()),
    };

    let message_id = match q.message {
        Some(ref m) => m.id(),
        None => return Ok(()),
    };

    let user_id = q.from.id.0 as i64;

    // Out-of-vocabulary tags are ignored: log and leave the message alone
    let tag: ButtonTag = match data.parse() {
        Ok(tag) => tag,
        Err(e) => {
            tracing::warn!("Callback from user {}: {}", user_id, e);
            return Ok(());
        }
    };

    tracing::debug!("Callback '{}' from user {}", data, user_id);

    let Some(reply) = state.dispatcher.dispatch(user_id, Event::Button(tag)).await else {
        return Ok(());
    };

    // Callback-driven replies edit the interactive message in place.
    // Delivery failures are best-effort: log and move on.
    let edit = bot
        .edit_message_text(chat_id, message_id, reply.text)
        .parse_mode(ParseMode::Markdown)
        .reply_markup(keyboards::render(reply.keyboard, user_id, &state.config))
        .await;
    if let Err(e) = edit {
        tracing::warn!("Failed to edit message in chat {}: {}", chat_id, e);
    }

    Ok(())
}

/// Free text never drives the flow; the dispatcher answers with
/// button guidance fitted to the user's current state.
pub async fn handle_text_message(bot: Bot, msg: Message, state: Arc<BotState>) -> HandlerResult {
    let user_id = user_id_of(&msg);
    let text = msg.text().unwrap_or("").to_string();

    if let Some(reply) = state.dispatcher.dispatch(user_id, Event::Text(text)).await {
        if let Err(e) = send_reply(&bot, msg.chat.id, user_id, reply, &state).await {
            tracing::error!("Error replying to text from user {}: {}", user_id, e);
            let _ = bot.send_message(msg.chat.id, messages::ERROR_TEXT).await;
        }
    }
    Ok(())
}
