use std::collections::BTreeMap;

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::config::Config;
use crate::dispatch::Keyboard;
use crate::store::UserId;

/// Render a dispatcher keyboard directive into an inline markup.
/// The user id feeds the wallet-connect URL button.
pub fn render(keyboard: Keyboard, user_id: UserId, config: &Config) -> InlineKeyboardMarkup {
    match keyboard {
        Keyboard::InitialOptions => initial_options(),
        Keyboard::WalletConnect => wallet_connect(user_id, config),
        Keyboard::TokenSelection => token_selection(),
        Keyboard::MainMenu => main_menu(),
        Keyboard::BuyAmounts => buy_amounts(&config.token_prices),
        Keyboard::PaymentConfirm => payment_confirm(),
        Keyboard::Help => help_menu(),
        Keyboard::Support => support_menu(),
        Keyboard::Cancel => cancel(),
    }
}

// Initial options shown on /start
pub fn initial_options() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback("💰 Buy Token", "buy_token")],
        vec![InlineKeyboardButton::callback("🎁 Claim Tokens", "claim_tokens")],
        vec![InlineKeyboardButton::callback("🔍 Recover Lost Token", "recover_token")],
        vec![InlineKeyboardButton::callback("ℹ️ Help", "help")],
    ])
}

// Wallet connection keyboard with the external connect URL
pub fn wallet_connect(user_id: UserId, config: &Config) -> InlineKeyboardMarkup {
    let mut rows = Vec::with_capacity(2);
    match config.connect_url(user_id).parse() {
        Ok(url) => rows.push(vec![InlineKeyboardButton::url("🔗 Connect Wallet", url)]),
        Err(e) => tracing::warn!("Invalid wallet-connect URL, dropping the button: {}", e),
    }
    rows.push(vec![InlineKeyboardButton::callback("ℹ️ Help", "help")]);

    InlineKeyboardMarkup::new(rows)
}

// Token selection keyboard (XRP, WLFI, ERC TOKENS)
pub fn token_selection() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback("💎 XRP", "token_XRP")],
        vec![InlineKeyboardButton::callback("💎 WLFI", "token_WLFI")],
        vec![InlineKeyboardButton::callback("💎 ERC TOKENS", "token_ERC_TOKENS")],
        vec![InlineKeyboardButton::callback("🔙 Back", "start")],
    ])
}

// Main menu keyboard
pub fn main_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback("💰 Buy Tokens", "buy_token")],
        vec![InlineKeyboardButton::callback("🎁 Claim Tokens", "claim_tokens")],
        vec![InlineKeyboardButton::callback("🔍 Recover Lost Token", "recover_token")],
        vec![InlineKeyboardButton::callback("ℹ️ Help", "help")],
    ])
}

// USD amount tiers, one row per configured tier
pub fn buy_amounts(prices: &BTreeMap<u32, u64>) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = prices
        .keys()
        .map(|usd| {
            vec![InlineKeyboardButton::callback(
                format!("💎 {} USD", usd),
                format!("amount_{}", usd),
            )]
        })
        .collect();
    rows.push(vec![InlineKeyboardButton::callback("🔙 Back to Menu", "main_menu")]);

    InlineKeyboardMarkup::new(rows)
}

// Payment confirmation keyboard
pub fn payment_confirm() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback("✅ Funds Sent", "funds_sent")],
        vec![InlineKeyboardButton::callback("🏠 Main Menu", "main_menu")],
    ])
}

// Help keyboard
pub fn help_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback("🔗 Connect Wallet", "connect_wallet")],
        vec![InlineKeyboardButton::callback("🏠 Main Menu", "main_menu")],
        vec![InlineKeyboardButton::callback("📞 Support", "support")],
    ])
}

// Support keyboard
pub fn support_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback("🏠 Main Menu", "main_menu")],
        vec![InlineKeyboardButton::callback("🔙 Back", "help")],
    ])
}

// Cancel keyboard
pub fn cancel() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback("❌ Cancel", "cancel")],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::ButtonTag;

    fn callback_tags(markup: &InlineKeyboardMarkup) -> Vec<String> {
        use teloxide::types::InlineKeyboardButtonKind;
        markup
            .inline_keyboard
            .iter()
            .flatten()
            .filter_map(|button| match &button.kind {
                InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_every_callback_tag_is_in_vocabulary() {
        let prices = Config::default_token_prices();
        let markups = [
            initial_options(),
            token_selection(),
            main_menu(),
            buy_amounts(&prices),
            payment_confirm(),
            help_menu(),
            support_menu(),
            cancel(),
        ];

        for markup in &markups {
            for tag in callback_tags(markup) {
                assert!(
                    tag.parse::<ButtonTag>().is_ok(),
                    "keyboard emits out-of-vocabulary tag: {}",
                    tag
                );
            }
        }
    }

    #[test]
    fn test_buy_amounts_covers_all_tiers() {
        let prices = Config::default_token_prices();
        let tags = callback_tags(&buy_amounts(&prices));
        for usd in prices.keys() {
            assert!(tags.contains(&format!("amount_{}", usd)));
        }
    }
}
