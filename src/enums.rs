use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::AppError;

// ─── UserState ───────────────────────────────────────────────────────

/// Position of a user in the conversation flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UserState {
    #[default]
    Start,
    WalletConnection,
    MainMenu,
    SelectingToken,
    TokenSelected,
    WaitingPayment,
    Recovery,
}

impl UserState {
    /// Canonical string used in the state export.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserState::Start => "start",
            UserState::WalletConnection => "wallet_connection",
            UserState::MainMenu => "main_menu",
            UserState::SelectingToken => "selecting_token",
            UserState::TokenSelected => "token_selected",
            UserState::WaitingPayment => "waiting_payment",
            UserState::Recovery => "recovery",
        }
    }

    /// Anything past the initial state counts as an active conversation.
    pub fn is_active(&self) -> bool {
        !matches!(self, UserState::Start)
    }
}

impl fmt::Display for UserState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── UserAction ──────────────────────────────────────────────────────

/// Top-level flow picked by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UserAction {
    Buy,
    Claim,
}

impl UserAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserAction::Buy => "buy",
            UserAction::Claim => "claim",
        }
    }

    /// Capitalized label for message copy.
    pub fn label(&self) -> &'static str {
        match self {
            UserAction::Buy => "Buy",
            UserAction::Claim => "Claim",
        }
    }
}

impl fmt::Display for UserAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── TokenKind ───────────────────────────────────────────────────────

/// Token tiers offered in the buy/claim flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    Xrp,
    Wlfi,
    ErcTokens,
}

impl TokenKind {
    /// Suffix carried by `token_<SYMBOL>` callback tags.
    pub fn tag(&self) -> &'static str {
        match self {
            TokenKind::Xrp => "XRP",
            TokenKind::Wlfi => "WLFI",
            TokenKind::ErcTokens => "ERC_TOKENS",
        }
    }

    /// Human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Xrp => "XRP",
            TokenKind::Wlfi => "WLFI",
            TokenKind::ErcTokens => "ERC TOKENS",
        }
    }

    pub fn all() -> &'static [TokenKind] {
        &[TokenKind::Xrp, TokenKind::Wlfi, TokenKind::ErcTokens]
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for TokenKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "XRP" => Ok(TokenKind::Xrp),
            "WLFI" => Ok(TokenKind::Wlfi),
            "ERC_TOKENS" => Ok(TokenKind::ErcTokens),
            other => Err(AppError::InvalidInput(format!("unknown token tag: {}", other))),
        }
    }
}
