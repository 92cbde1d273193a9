use mafia_rules::Session;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

pub type SharedSession = Arc<Mutex<Session>>;

/// Live sessions keyed by group id.
///
/// The map lock is only held long enough to find or insert an entry; game
/// operations lock the individual session, so groups never wait on each
/// other.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SharedSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, group_id: &str) -> Option<SharedSession> {
        let sessions = self.sessions.read().await;
        sessions.get(group_id).cloned()
    }

    /// Returns the group's session, building it with `make` on first use.
    /// Two callers racing on a new group get the same session.
    pub async fn get_or_create<F>(&self, group_id: &str, make: F) -> SharedSession
    where
        F: FnOnce() -> Session,
    {
        if let Some(session) = self.get(group_id).await {
            return session;
        }
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(group_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(make())))
            .clone()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
