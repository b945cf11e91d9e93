pub mod commands;
pub mod handlers;
pub mod keyboards;
mod callbacks;

use std::sync::Arc;

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::config::Config;
use crate::store::StateStore;

#[derive(Clone)]
pub struct BotState {
    pub store: Arc<StateStore>,
    pub dispatcher: Arc<crate::dispatch::Dispatcher>,
    pub config: Arc<Config>,
}

fn schema() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    let command_handler = Update::filter_message()
        .filter_command::<commands::Command>()
        .endpoint(handlers::handle_command_dispatch);

    let callback_handler = Update::filter_callback_query()
        .endpoint(callbacks::handle_callback);

    // Free text outside the command set gets routed to guidance
    let message_handler = Update::filter_message()
        .filter(|msg: Message| msg.text().is_some() && !msg.text().unwrap().starts_with('/'))
        .endpoint(callbacks::handle_text_message);

    dptree::entry()
        .branch(command_handler)
        .branch(callback_handler)
        .branch(message_handler)
}

pub async fn run_bot(store: Arc<StateStore>, config: Arc<Config>) {
    tracing::info!("Starting Telegram bot...");

    let bot = Bot::new(config.telegram_bot_token.clone());

    // Set bot commands for slash menu
    if let Err(e) = bot.set_my_commands(commands::Command::bot_commands()).await {
        tracing::warn!("Failed to set bot commands: {}", e);
    } else {
        tracing::info!("Bot commands registered successfully");
    }

    let dispatcher = Arc::new(crate::dispatch::Dispatcher::new(store.clone(), config.clone()));

    let state = Arc::new(BotState {
        store,
        dispatcher,
        config,
    });

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
