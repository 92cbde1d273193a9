use mafia_rules::{GameEvent, Session};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{broadcast, Mutex};
use tracing::debug;

use crate::models::config::GameConfig;
use crate::models::event::EventEnvelope;
use crate::services::session_store::{SessionStore, SharedSession};
use crate::utils::auth::TokenKeys;

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub channel: Arc<Mutex<HashMap<String, broadcast::Sender<EventEnvelope>>>>,
    pub game_config: Arc<GameConfig>,
    pub auth: Arc<TokenKeys>,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    pub fn with_config(game_config: GameConfig) -> Self {
        AppState {
            sessions: SessionStore::new(),
            channel: Arc::new(Mutex::new(HashMap::new())),
            game_config: Arc::new(game_config),
            auth: Arc::new(TokenKeys::random()),
        }
    }

    /// Signs seat tokens with `keys` instead of a per-process key.
    pub fn with_token_keys(mut self, keys: TokenKeys) -> Self {
        self.auth = Arc::new(keys);
        self
    }

    /// A brand-new lobby for `group_id` using the configured rules.
    pub fn new_session(&self, group_id: &str) -> Session {
        let rules = self.game_config.rules.clone();
        match self.game_config.rng_seed {
            Some(seed) => Session::with_seed(group_id, rules, seed),
            None => Session::new(group_id, rules),
        }
    }

    /// The group's session, opening an empty lobby on first use.
    pub async fn session(&self, group_id: &str) -> SharedSession {
        self.sessions
            .get_or_create(group_id, || self.new_session(group_id))
            .await
    }

    pub async fn get_or_create_group_channel(
        &self,
        group_id: &str,
    ) -> broadcast::Sender<EventEnvelope> {
        let mut channels = self.channel.lock().await;
        if let Some(channel) = channels.get(group_id) {
            channel.clone()
        } else {
            let (tx, _) = broadcast::channel(self.game_config.channel_capacity);
            channels.insert(group_id.to_string(), tx.clone());
            tx
        }
    }

    /// Sends each event to the group's subscribers in order.
    ///
    /// Having nobody connected is normal, so a failed send is only logged.
    pub fn publish(
        tx: &broadcast::Sender<EventEnvelope>,
        group_id: &str,
        events: &[GameEvent],
    ) {
        for event in events {
            if let Err(e) = tx.send(EventEnvelope::new(group_id, event.clone())) {
                debug!(group = group_id, "no subscribers for event: {}", e);
            }
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
