use std::str::FromStr;
use std::sync::Arc;

use crate::config::Config;
use crate::enums::{TokenKind, UserAction, UserState};
use crate::error::AppError;
use crate::messages;
use crate::store::{StateStore, UserId};

// ─── Inbound events ──────────────────────────────────────────────────

/// Closed vocabulary of callback tags carried by inline buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonTag {
    ConnectWallet,
    MainMenu,
    Help,
    Support,
    Reset,
    Cancel,
    BuyToken,
    ClaimTokens,
    RecoverToken,
    WalletConnected,
    Start,
    Token(TokenKind),
    Amount(u32),
    FundsSent,
}

impl FromStr for ButtonTag {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "connect_wallet" => Ok(ButtonTag::ConnectWallet),
            "main_menu" => Ok(ButtonTag::MainMenu),
            "help" => Ok(ButtonTag::Help),
            "support" => Ok(ButtonTag::Support),
            "reset" => Ok(ButtonTag::Reset),
            "cancel" => Ok(ButtonTag::Cancel),
            "buy_token" => Ok(ButtonTag::BuyToken),
            "claim_tokens" => Ok(ButtonTag::ClaimTokens),
            "recover_token" => Ok(ButtonTag::RecoverToken),
            "wallet_connected" => Ok(ButtonTag::WalletConnected),
            "start" => Ok(ButtonTag::Start),
            "funds_sent" => Ok(ButtonTag::FundsSent),
            other => {
                if let Some(symbol) = other.strip_prefix("token_") {
                    return symbol.parse().map(ButtonTag::Token);
                }
                if let Some(amount) = other.strip_prefix("amount_") {
                    return amount
                        .parse()
                        .map(ButtonTag::Amount)
                        .map_err(|_| AppError::InvalidInput(format!("bad amount tag: {}", other)));
                }
                Err(AppError::InvalidInput(format!("unknown callback tag: {}", other)))
            }
        }
    }
}

/// One inbound event from the transport.
#[derive(Debug, Clone)]
pub enum Event {
    /// `/start`, optionally with a deep-link payload.
    Start { deep_link: Option<String> },
    Button(ButtonTag),
    Text(String),
}

// ─── Outbound directives ─────────────────────────────────────────────

/// Keyboard to attach to a reply. Rendered to an actual inline markup
/// at the transport layer, since URL buttons need the user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyboard {
    InitialOptions,
    WalletConnect,
    TokenSelection,
    MainMenu,
    BuyAmounts,
    PaymentConfirm,
    Help,
    Support,
    Cancel,
}

/// Reply directive produced by the dispatcher. Whether it becomes a
/// fresh message or an edit of the existing one is the transport's
/// call (callback-driven replies edit, message-driven replies send).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Keyboard,
}

impl Reply {
    fn new(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Reply { text: text.into(), keyboard }
    }
}

// ─── Dispatcher ──────────────────────────────────────────────────────

/// The conversation state machine. Reads and mutates the per-user
/// record, returns the reply directive for the transport to deliver.
/// `None` means no user-visible reaction (stale or malformed input).
pub struct Dispatcher {
    store: Arc<StateStore>,
    config: Arc<Config>,
}

impl Dispatcher {
    pub fn new(store: Arc<StateStore>, config: Arc<Config>) -> Self {
        Dispatcher { store, config }
    }

    pub async fn dispatch(&self, user: UserId, event: Event) -> Option<Reply> {
        match event {
            Event::Start { deep_link } => Some(self.handle_start(user, deep_link).await),
            Event::Button(tag) => self.handle_button(user, tag).await,
            Event::Text(_) => Some(self.handle_text(user).await),
        }
    }

    async fn handle_start(&self, user: UserId, deep_link: Option<String>) -> Reply {
        if let Some(payload) = deep_link {
            if let Some(id) = payload.strip_prefix("return_") {
                if id.parse::<UserId>() == Ok(user) {
                    return self.wallet_connection_return(user).await;
                }
                tracing::warn!("Ignoring return deep link for user {}: {}", user, payload);
            }
        }

        self.store.set_state(user, UserState::Start).await;
        Reply::new(messages::WELCOME_TEXT, Keyboard::InitialOptions)
    }

    async fn handle_button(&self, user: UserId, tag: ButtonTag) -> Option<Reply> {
        let reply = match tag {
            ButtonTag::ConnectWallet => {
                self.store.set_state(user, UserState::WalletConnection).await;
                Reply::new(messages::WALLET_CONNECTION_TEXT, Keyboard::WalletConnect)
            }
            ButtonTag::MainMenu => {
                if !self.store.is_wallet_connected(user).await {
                    // State stays put until the wallet is connected.
                    return Some(Reply::new(
                        messages::CONNECT_WALLET_FIRST_TEXT,
                        Keyboard::WalletConnect,
                    ));
                }
                self.store.set_state(user, UserState::MainMenu).await;
                Reply::new(messages::MAIN_MENU_TEXT, Keyboard::MainMenu)
            }
            ButtonTag::Help => {
                Reply::new(messages::help_message(&self.config.company_name), Keyboard::Help)
            }
            ButtonTag::Support => Reply::new(messages::SUPPORT_TEXT, Keyboard::Support),
            ButtonTag::Reset => {
                self.store.clear(user).await;
                self.store.set_state(user, UserState::Start).await;
                Reply::new(messages::RESET_TEXT, Keyboard::InitialOptions)
            }
            ButtonTag::Cancel | ButtonTag::Start => {
                self.store.set_state(user, UserState::Start).await;
                Reply::new(messages::WELCOME_TEXT, Keyboard::InitialOptions)
            }
            ButtonTag::BuyToken => self.start_token_selection(user, UserAction::Buy).await,
            ButtonTag::ClaimTokens => self.start_token_selection(user, UserAction::Claim).await,
            ButtonTag::RecoverToken => {
                self.store.set_state(user, UserState::Recovery).await;
                Reply::new(messages::RECOVERY_TEXT, Keyboard::WalletConnect)
            }
            ButtonTag::Token(token) => {
                self.store.set_token(user, token).await;
                self.store.set_state(user, UserState::TokenSelected).await;
                Reply::new(messages::token_selected_message(token), Keyboard::WalletConnect)
            }
            ButtonTag::WalletConnected => self.wallet_connection_return(user).await,
            ButtonTag::Amount(usd) => {
                let Some(quantity) = self.config.token_quantity(usd) else {
                    tracing::warn!("Amount {} from user {} is outside the price table, ignoring", usd, user);
                    return None;
                };
                self.store.set_amount(user, usd).await;
                self.store.set_state(user, UserState::WaitingPayment).await;
                Reply::new(
                    messages::payment_details_message(usd, quantity, &self.config),
                    Keyboard::PaymentConfirm,
                )
            }
            ButtonTag::FundsSent => {
                let record = self.store.record(user).await;
                let Some((usd, quantity)) = record
                    .amount
                    .and_then(|usd| self.config.token_quantity(usd).map(|q| (usd, q)))
                else {
                    tracing::warn!("funds_sent from user {} without a selected amount, ignoring", user);
                    return None;
                };
                self.store.reset_to_main_menu(user).await;
                Reply::new(
                    messages::funds_sent_message(usd, quantity, &self.config.company_name),
                    Keyboard::MainMenu,
                )
            }
        };

        Some(reply)
    }

    async fn start_token_selection(&self, user: UserId, action: UserAction) -> Reply {
        self.store.set_action(user, action).await;
        self.store.set_state(user, UserState::SelectingToken).await;
        Reply::new(messages::token_selection_message(action), Keyboard::TokenSelection)
    }

    /// Shared outcome of a completed wallet connection, reached either
    /// by the in-chat `wallet_connected` button or by the user coming
    /// back from the web platform with a `return_<id>` deep link. The
    /// congratulations branch is computed from the record as it stood
    /// before the connection is recorded.
    async fn wallet_connection_return(&self, user: UserId) -> Reply {
        let record = self.store.record(user).await;
        let text = messages::wallet_connected_message(record.state, record.action, record.token);

        self.store.mark_wallet_connected(user, None).await;
        self.store.set_state(user, UserState::MainMenu).await;

        // A buy flow continues straight into amount selection.
        let keyboard = if record.state != UserState::Recovery
            && record.action == Some(UserAction::Buy)
            && record.token.is_some()
        {
            Keyboard::BuyAmounts
        } else {
            Keyboard::MainMenu
        };

        Reply::new(text, keyboard)
    }

    /// Free text never advances the conversation; nudge the user back
    /// to the buttons with a keyboard that fits where they are.
    async fn handle_text(&self, user: UserId) -> Reply {
        let keyboard = match self.store.state(user).await {
            UserState::Start => Keyboard::InitialOptions,
            UserState::MainMenu => Keyboard::MainMenu,
            _ => Keyboard::Cancel,
        };
        Reply::new(messages::USE_BUTTONS_TEXT, keyboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StateStore;

    fn test_setup() -> (Arc<StateStore>, Dispatcher) {
        let store = Arc::new(StateStore::new());
        let config = Arc::new(Config {
            telegram_bot_token: "test-token".to_string(),
            web_platform_url: "http://localhost:3000".to_string(),
            company_name: "CryptoProject".to_string(),
            bot_username: "CryptoProjectBot".to_string(),
            token_prices: Config::default_token_prices(),
            payment_wallet_address: "0xPAYMENT".to_string(),
        });
        let dispatcher = Dispatcher::new(store.clone(), config);
        (store, dispatcher)
    }

    async fn press(dispatcher: &Dispatcher, user: i64, tag: ButtonTag) -> Reply {
        dispatcher.dispatch(user, Event::Button(tag)).await.expect("expected a reply")
    }

    #[test]
    fn test_tag_vocabulary_parses() {
        assert_eq!("connect_wallet".parse::<ButtonTag>().unwrap(), ButtonTag::ConnectWallet);
        assert_eq!("main_menu".parse::<ButtonTag>().unwrap(), ButtonTag::MainMenu);
        assert_eq!("help".parse::<ButtonTag>().unwrap(), ButtonTag::Help);
        assert_eq!("support".parse::<ButtonTag>().unwrap(), ButtonTag::Support);
        assert_eq!("reset".parse::<ButtonTag>().unwrap(), ButtonTag::Reset);
        assert_eq!("cancel".parse::<ButtonTag>().unwrap(), ButtonTag::Cancel);
        assert_eq!("buy_token".parse::<ButtonTag>().unwrap(), ButtonTag::BuyToken);
        assert_eq!("claim_tokens".parse::<ButtonTag>().unwrap(), ButtonTag::ClaimTokens);
        assert_eq!("recover_token".parse::<ButtonTag>().unwrap(), ButtonTag::RecoverToken);
        assert_eq!("wallet_connected".parse::<ButtonTag>().unwrap(), ButtonTag::WalletConnected);
        assert_eq!("start".parse::<ButtonTag>().unwrap(), ButtonTag::Start);
        assert_eq!("funds_sent".parse::<ButtonTag>().unwrap(), ButtonTag::FundsSent);
        assert_eq!("token_XRP".parse::<ButtonTag>().unwrap(), ButtonTag::Token(TokenKind::Xrp));
        assert_eq!("amount_100".parse::<ButtonTag>().unwrap(), ButtonTag::Amount(100));
        assert!("amount_abc".parse::<ButtonTag>().is_err());
        assert!("buy_tokens".parse::<ButtonTag>().is_err());
    }

    #[tokio::test]
    async fn test_every_price_tier_reaches_confirmation() {
        let (store, dispatcher) = test_setup();
        for (i, (usd, quantity)) in Config::default_token_prices().into_iter().enumerate() {
            let user = i as i64 + 1;

            let reply = press(&dispatcher, user, ButtonTag::Amount(usd)).await;
            assert_eq!(reply.keyboard, Keyboard::PaymentConfirm);
            assert_eq!(store.state(user).await, UserState::WaitingPayment);

            let reply = press(&dispatcher, user, ButtonTag::FundsSent).await;
            assert_eq!(reply.keyboard, Keyboard::MainMenu);
            assert_eq!(store.state(user).await, UserState::MainMenu);
            assert!(reply.text.contains(&format!("${}", usd)));
            assert!(reply.text.contains(&format!("{} CryptoProject tokens", quantity)));
        }
    }

    #[tokio::test]
    async fn test_amount_outside_price_table_is_ignored() {
        let (store, dispatcher) = test_setup();
        let reply = dispatcher.dispatch(1, Event::Button(ButtonTag::Amount(300))).await;
        assert!(reply.is_none());
        assert_eq!(store.state(1).await, UserState::Start);
        assert!(store.record(1).await.amount.is_none());
    }

    #[tokio::test]
    async fn test_funds_sent_without_amount_is_ignored() {
        let (store, dispatcher) = test_setup();
        let reply = dispatcher.dispatch(1, Event::Button(ButtonTag::FundsSent)).await;
        assert!(reply.is_none());
        assert_eq!(store.state(1).await, UserState::Start);
    }

    #[tokio::test]
    async fn test_buy_flow_congratulations() {
        let (store, dispatcher) = test_setup();

        let reply = press(&dispatcher, 1, ButtonTag::BuyToken).await;
        assert_eq!(reply.keyboard, Keyboard::TokenSelection);
        assert_eq!(store.state(1).await, UserState::SelectingToken);

        let reply = press(&dispatcher, 1, ButtonTag::Token(TokenKind::Xrp)).await;
        assert_eq!(reply.keyboard, Keyboard::WalletConnect);
        assert_eq!(store.state(1).await, UserState::TokenSelected);

        let reply = press(&dispatcher, 1, ButtonTag::WalletConnected).await;
        assert!(reply.text.contains("Buy tokens"));
        assert!(reply.text.contains("XRP"));
        assert_eq!(reply.keyboard, Keyboard::BuyAmounts);
        assert_eq!(store.state(1).await, UserState::MainMenu);
        assert!(store.is_wallet_connected(1).await);
    }

    #[tokio::test]
    async fn test_claim_flow_congratulations() {
        let (_, dispatcher) = test_setup();
        press(&dispatcher, 1, ButtonTag::ClaimTokens).await;
        press(&dispatcher, 1, ButtonTag::Token(TokenKind::Wlfi)).await;

        let reply = press(&dispatcher, 1, ButtonTag::WalletConnected).await;
        assert!(reply.text.contains("Claim tokens"));
        assert!(reply.text.contains("WLFI"));
        assert_eq!(reply.keyboard, Keyboard::MainMenu);
    }

    #[tokio::test]
    async fn test_recovery_overrides_stale_selection() {
        let (store, dispatcher) = test_setup();
        press(&dispatcher, 1, ButtonTag::BuyToken).await;
        press(&dispatcher, 1, ButtonTag::Token(TokenKind::Xrp)).await;
        press(&dispatcher, 1, ButtonTag::RecoverToken).await;
        assert_eq!(store.state(1).await, UserState::Recovery);

        let reply = press(&dispatcher, 1, ButtonTag::WalletConnected).await;
        assert!(reply.text.contains("token recovery"));
        assert_eq!(reply.keyboard, Keyboard::MainMenu);
    }

    #[tokio::test]
    async fn test_congratulations_identical_for_button_and_deep_link() {
        let (_, dispatcher) = test_setup();
        // Two users with identical priors, one per trigger path.
        for user in [1, 2] {
            press(&dispatcher, user, ButtonTag::BuyToken).await;
            press(&dispatcher, user, ButtonTag::Token(TokenKind::ErcTokens)).await;
        }

        let via_button = press(&dispatcher, 1, ButtonTag::WalletConnected).await;
        let via_deep_link = dispatcher
            .dispatch(2, Event::Start { deep_link: Some("return_2".to_string()) })
            .await
            .unwrap();

        assert_eq!(via_button.text, via_deep_link.text);
        assert_eq!(via_button.keyboard, via_deep_link.keyboard);
    }

    #[tokio::test]
    async fn test_deep_link_for_other_user_falls_back_to_fresh_start() {
        let (store, dispatcher) = test_setup();
        let reply = dispatcher
            .dispatch(1, Event::Start { deep_link: Some("return_999".to_string()) })
            .await
            .unwrap();
        assert_eq!(reply.text, messages::WELCOME_TEXT);
        assert!(!store.is_wallet_connected(1).await);
    }

    #[tokio::test]
    async fn test_main_menu_gated_on_wallet_connection() {
        let (store, dispatcher) = test_setup();
        press(&dispatcher, 1, ButtonTag::BuyToken).await;

        let reply = press(&dispatcher, 1, ButtonTag::MainMenu).await;
        assert_eq!(reply.text, messages::CONNECT_WALLET_FIRST_TEXT);
        assert_eq!(reply.keyboard, Keyboard::WalletConnect);
        assert_eq!(store.state(1).await, UserState::SelectingToken);

        store.mark_wallet_connected(1, None).await;
        let reply = press(&dispatcher, 1, ButtonTag::MainMenu).await;
        assert_eq!(reply.text, messages::MAIN_MENU_TEXT);
        assert_eq!(store.state(1).await, UserState::MainMenu);
    }

    #[tokio::test]
    async fn test_cancel_keeps_wallet_reset_forgets_it() {
        let (store, dispatcher) = test_setup();
        store.mark_wallet_connected(1, None).await;
        press(&dispatcher, 1, ButtonTag::BuyToken).await;

        press(&dispatcher, 1, ButtonTag::Cancel).await;
        assert_eq!(store.state(1).await, UserState::Start);
        assert!(store.is_wallet_connected(1).await);
        assert_eq!(store.record(1).await.action, Some(UserAction::Buy));

        press(&dispatcher, 1, ButtonTag::Reset).await;
        assert_eq!(store.state(1).await, UserState::Start);
        assert!(!store.is_wallet_connected(1).await);
        assert!(store.record(1).await.action.is_none());
    }

    #[tokio::test]
    async fn test_free_text_guidance_keyboard_follows_state() {
        let (store, dispatcher) = test_setup();

        let reply = dispatcher.dispatch(1, Event::Text("hello".to_string())).await.unwrap();
        assert_eq!(reply.text, messages::USE_BUTTONS_TEXT);
        assert_eq!(reply.keyboard, Keyboard::InitialOptions);

        store.mark_wallet_connected(1, None).await;
        press(&dispatcher, 1, ButtonTag::MainMenu).await;
        let reply = dispatcher.dispatch(1, Event::Text("hello".to_string())).await.unwrap();
        assert_eq!(reply.keyboard, Keyboard::MainMenu);

        press(&dispatcher, 1, ButtonTag::ConnectWallet).await;
        let reply = dispatcher.dispatch(1, Event::Text("hello".to_string())).await.unwrap();
        assert_eq!(reply.keyboard, Keyboard::Cancel);
    }
}
