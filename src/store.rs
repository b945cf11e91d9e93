use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::enums::{TokenKind, UserAction, UserState};

pub type UserId = i64;

/// Per-user conversation record. Created lazily on first mutation,
/// removed only by an explicit `clear`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserRecord {
    pub state: UserState,
    pub wallet_connected: bool,
    pub action: Option<UserAction>,
    pub token: Option<TokenKind>,
    pub amount: Option<u32>,
    pub claim_wallet_address: String,
    pub submission_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub total_users: usize,
    pub connected_wallets: usize,
    pub active_conversations: usize,
}

/// In-memory conversation state, keyed by Telegram user id.
///
/// Lifetime is the process lifetime; there is no persistence and no
/// eviction. The transport delivers events for one user serially, so
/// the lock only guards cross-user access. `stats` and `export_json`
/// take a read snapshot and are eventually consistent under load.
#[derive(Debug, Default)]
pub struct StateStore {
    users: RwLock<HashMap<UserId, UserRecord>>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state, or the initial state for unseen users.
    pub async fn state(&self, user: UserId) -> UserState {
        let users = self.users.read().await;
        users.get(&user).map(|r| r.state).unwrap_or_default()
    }

    pub async fn set_state(&self, user: UserId, state: UserState) {
        let mut users = self.users.write().await;
        users.entry(user).or_default().state = state;
    }

    /// Cloned snapshot of the full record; defaults for unseen users.
    pub async fn record(&self, user: UserId) -> UserRecord {
        let users = self.users.read().await;
        users.get(&user).cloned().unwrap_or_default()
    }

    pub async fn is_wallet_connected(&self, user: UserId) -> bool {
        let users = self.users.read().await;
        users.get(&user).map(|r| r.wallet_connected).unwrap_or(false)
    }

    /// Sticky: once set, only `clear` resets it.
    pub async fn mark_wallet_connected(&self, user: UserId, submission_id: Option<String>) {
        let mut users = self.users.write().await;
        let record = users.entry(user).or_default();
        record.wallet_connected = true;
        if submission_id.is_some() {
            record.submission_id = submission_id;
        }
    }

    pub async fn set_action(&self, user: UserId, action: UserAction) {
        let mut users = self.users.write().await;
        users.entry(user).or_default().action = Some(action);
    }

    pub async fn set_token(&self, user: UserId, token: TokenKind) {
        let mut users = self.users.write().await;
        users.entry(user).or_default().token = Some(token);
    }

    pub async fn set_amount(&self, user: UserId, amount: u32) {
        let mut users = self.users.write().await;
        users.entry(user).or_default().amount = Some(amount);
    }

    pub async fn set_claim_address(&self, user: UserId, address: String) {
        let mut users = self.users.write().await;
        users.entry(user).or_default().claim_wallet_address = address;
    }

    /// Back to the main menu, keeping only the fields that survive a
    /// completed flow: wallet connection and the web submission id.
    pub async fn reset_to_main_menu(&self, user: UserId) {
        let mut users = self.users.write().await;
        let record = users.entry(user).or_default();
        *record = UserRecord {
            state: UserState::MainMenu,
            wallet_connected: record.wallet_connected,
            submission_id: record.submission_id.take(),
            ..UserRecord::default()
        };
    }

    /// Removes the user entirely, as if never seen.
    pub async fn clear(&self, user: UserId) {
        let mut users = self.users.write().await;
        users.remove(&user);
    }

    pub async fn stats(&self) -> StoreStats {
        let users = self.users.read().await;
        StoreStats {
            total_users: users.len(),
            connected_wallets: users.values().filter(|r| r.wallet_connected).count(),
            active_conversations: users.values().filter(|r| r.state.is_active()).count(),
        }
    }

    /// Full dump of every record as pretty-printed JSON.
    pub async fn export_json(&self) -> serde_json::Result<String> {
        let users = self.users.read().await;
        let export: HashMap<String, &UserRecord> =
            users.iter().map(|(id, record)| (id.to_string(), record)).collect();
        serde_json::to_string_pretty(&export)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unseen_user_defaults() {
        let store = StateStore::new();
        assert_eq!(store.state(1).await, UserState::Start);
        assert!(!store.is_wallet_connected(1).await);
        let record = store.record(1).await;
        assert!(record.action.is_none());
        assert!(record.amount.is_none());
        assert_eq!(record.claim_wallet_address, "");
    }

    #[tokio::test]
    async fn test_wallet_connected_is_sticky() {
        let store = StateStore::new();
        store.mark_wallet_connected(1, None).await;
        assert!(store.is_wallet_connected(1).await);

        store.set_state(1, UserState::SelectingToken).await;
        store.set_state(1, UserState::WaitingPayment).await;
        store.reset_to_main_menu(1).await;
        assert!(store.is_wallet_connected(1).await);

        store.clear(1).await;
        assert!(!store.is_wallet_connected(1).await);
    }

    #[tokio::test]
    async fn test_reset_to_main_menu_retains_essentials() {
        let store = StateStore::new();
        store.mark_wallet_connected(1, Some("sub-42".to_string())).await;
        store.set_action(1, UserAction::Buy).await;
        store.set_token(1, TokenKind::Xrp).await;
        store.set_amount(1, 100).await;
        store.set_claim_address(1, "0xabc".to_string()).await;

        store.reset_to_main_menu(1).await;
        let record = store.record(1).await;
        assert_eq!(record.state, UserState::MainMenu);
        assert!(record.wallet_connected);
        assert_eq!(record.submission_id.as_deref(), Some("sub-42"));
        assert!(record.action.is_none());
        assert!(record.token.is_none());
        assert!(record.amount.is_none());
        assert_eq!(record.claim_wallet_address, "");
    }

    #[tokio::test]
    async fn test_reset_to_main_menu_is_idempotent() {
        let store = StateStore::new();
        store.mark_wallet_connected(1, Some("sub-42".to_string())).await;
        store.set_action(1, UserAction::Claim).await;

        store.reset_to_main_menu(1).await;
        let once = store.record(1).await;
        store.reset_to_main_menu(1).await;
        let twice = store.record(1).await;

        assert_eq!(once.state, twice.state);
        assert_eq!(once.wallet_connected, twice.wallet_connected);
        assert_eq!(once.submission_id, twice.submission_id);
        assert!(twice.action.is_none());
    }

    #[tokio::test]
    async fn test_clear_indistinguishable_from_never_seen() {
        let store = StateStore::new();
        store.mark_wallet_connected(1, Some("sub".to_string())).await;
        store.set_state(1, UserState::Recovery).await;
        store.clear(1).await;

        assert_eq!(store.state(1).await, UserState::Start);
        assert!(!store.is_wallet_connected(1).await);
        let record = store.record(1).await;
        assert!(record.submission_id.is_none());
        assert_eq!(store.stats().await.total_users, 0);
    }

    #[tokio::test]
    async fn test_stats_counts() {
        let store = StateStore::new();
        // Five users, two wallet-connected, three past the start state.
        for user in 1..=5 {
            store.set_state(user, UserState::Start).await;
        }
        store.mark_wallet_connected(1, None).await;
        store.mark_wallet_connected(2, None).await;
        store.set_state(3, UserState::MainMenu).await;
        store.set_state(4, UserState::SelectingToken).await;
        store.set_state(5, UserState::WaitingPayment).await;

        let stats = store.stats().await;
        assert_eq!(stats.total_users, 5);
        assert_eq!(stats.connected_wallets, 2);
        assert_eq!(stats.active_conversations, 3);
    }

    #[tokio::test]
    async fn test_export_json_contains_records() {
        let store = StateStore::new();
        store.mark_wallet_connected(7, Some("sub-7".to_string())).await;
        store.set_state(7, UserState::MainMenu).await;

        let json = store.export_json().await.unwrap();
        assert!(json.contains("\"7\""));
        assert!(json.contains("main_menu"));
        assert!(json.contains("sub-7"));
    }
}
