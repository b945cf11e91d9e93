use std::collections::BTreeMap;
use std::env;

/// Default USD tier to token quantity mapping. Each tier can be
/// overridden individually via `TOKEN_PRICE_<USD>` env vars.
const DEFAULT_TOKEN_PRICES: [(u32, u64); 6] = [
    (50, 500),
    (100, 1_000),
    (200, 2_000),
    (1_000, 10_000),
    (5_000, 50_000),
    (10_000, 100_000),
];

const DEFAULT_PAYMENT_WALLET: &str = "0x1234567890abcdef1234567890abcdef12345678";

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub web_platform_url: String,
    pub company_name: String,
    pub bot_username: String,
    pub token_prices: BTreeMap<u32, u64>,
    pub payment_wallet_address: String,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenv::dotenv().ok();

        let telegram_bot_token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| "TELEGRAM_BOT_TOKEN is not set. Get a token from @BotFather.")?;

        let web_platform_url = env::var("WEB_PLATFORM_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let company_name = env::var("COMPANY_NAME").unwrap_or_else(|_| "CryptoProject".to_string());
        let bot_username = env::var("BOT_USERNAME").unwrap_or_else(|_| "CryptoProjectBot".to_string());

        let mut token_prices = Self::default_token_prices();
        for (usd, quantity) in token_prices.iter_mut() {
            if let Ok(raw) = env::var(format!("TOKEN_PRICE_{}", usd)) {
                *quantity = raw
                    .parse()
                    .map_err(|_| format!("TOKEN_PRICE_{} must be an integer, got '{}'", usd, raw))?;
            }
        }

        let payment_wallet_address = env::var("PAYMENT_WALLET_ADDRESS")
            .unwrap_or_else(|_| DEFAULT_PAYMENT_WALLET.to_string());

        let config = Config {
            telegram_bot_token,
            web_platform_url,
            company_name,
            bot_username,
            token_prices,
            payment_wallet_address,
        };
        config.log_validation();

        Ok(config)
    }

    pub fn default_token_prices() -> BTreeMap<u32, u64> {
        DEFAULT_TOKEN_PRICES.iter().copied().collect()
    }

    /// Validation is advisory only: everything except the bot token
    /// has a default, so problems are surfaced as log warnings.
    fn log_validation(&self) {
        if !self.web_platform_url.starts_with("http://") && !self.web_platform_url.starts_with("https://") {
            tracing::warn!("WEB_PLATFORM_URL should start with http:// or https://");
        }
        if self.payment_wallet_address == DEFAULT_PAYMENT_WALLET {
            tracing::warn!("Using default payment wallet address; set PAYMENT_WALLET_ADDRESS");
        }

        tracing::info!("Company name: {}", self.company_name);
        tracing::info!("Bot username: {}", self.bot_username);
        tracing::info!("Web platform URL: {}", self.web_platform_url);
        tracing::info!("Token prices configured: {} tiers", self.token_prices.len());
        for (usd, quantity) in &self.token_prices {
            tracing::info!("   ${} = {} tokens", usd, quantity);
        }
        tracing::info!("Payment wallet: {}", self.payment_wallet_address);
    }

    /// Token quantity for a USD tier. None for amounts outside the table.
    pub fn token_quantity(&self, usd: u32) -> Option<u64> {
        self.token_prices.get(&usd).copied()
    }

    /// External wallet-connect page, tagged with the user's id so the
    /// web platform can route the return deep link back to them.
    pub fn connect_url(&self, user_id: i64) -> String {
        format!("{}?telegram_id={}", self.web_platform_url, user_id)
    }
}
