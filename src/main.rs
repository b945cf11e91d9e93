use std::sync::Arc;

use token_sale_bot::{Config, Result, StateStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber
        ::registry()
        .with(
            tracing_subscriber::EnvFilter
                ::try_from_default_env()
                .unwrap_or_else(|_| "token_sale_bot=debug".into())
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration; a missing bot token is fatal here
    let config = Config::from_env().map_err(|e| token_sale_bot::AppError::Config(e.to_string()))?;
    let config = Arc::new(config);

    tracing::info!("Starting {} bot...", config.company_name);

    // Conversation state lives for the process lifetime only
    let store = Arc::new(StateStore::new());

    token_sale_bot::bot::run_bot(store, config).await;

    Ok(())
}
