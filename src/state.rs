use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::Config;
use crate::llm::LlmClient;
use crate::session::DocumentSession;

/// A session behind its own lock, so requests on one document run one at a time.
pub type SharedSession = Arc<tokio::sync::Mutex<DocumentSession>>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub llm: LlmClient,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(120))
            .build()?;

        Ok(Self {
            llm: LlmClient::new(http_client, config.llm.clone()),
            sessions: SessionStore::new(config.max_sessions),
            config,
        })
    }
}

struct StoredSession {
    session: SharedSession,
    inserted: u64,
}

#[derive(Default)]
struct Sessions {
    entries: HashMap<Uuid, StoredSession>,
    next_seq: u64,
}

/// Live document sessions, capped at `capacity`.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<Sessions>>,
    capacity: usize,
}

impl SessionStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Sessions::default())),
            capacity: capacity.max(1),
        }
    }

    /// Store a session, evicting the oldest ones when the store is full.
    pub fn insert(&self, session: DocumentSession) -> SharedSession {
        let id = session.id;
        let shared = Arc::new(tokio::sync::Mutex::new(session));

        let mut sessions = self.inner.write();
        while sessions.entries.len() >= self.capacity {
            let Some(oldest) = sessions
                .entries
                .iter()
                .min_by_key(|(_, s)| s.inserted)
                .map(|(id, _)| *id)
            else {
                break;
            };
            sessions.entries.remove(&oldest);
            tracing::warn!("Session limit ({}) reached, evicted {oldest}", self.capacity);
        }

        let inserted = sessions.next_seq;
        sessions.next_seq += 1;
        sessions.entries.insert(
            id,
            StoredSession {
                session: shared.clone(),
                inserted,
            },
        );
        shared
    }

    pub fn get(&self, id: &Uuid) -> Option<SharedSession> {
        self.inner.read().entries.get(id).map(|s| s.session.clone())
    }

    /// Returns whether a session was removed.
    pub fn remove(&self, id: &Uuid) -> bool {
        self.inner.write().entries.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetrievalConfig;
    use crate::testing::ScriptedModel;

    async fn session(name: &str) -> DocumentSession {
        let model = ScriptedModel::new(["summary"]);
        DocumentSession::open(&model, &RetrievalConfig::default(), name, "Some text.".into())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = SessionStore::new(4);
        let doc = session("a.txt").await;
        let id = doc.id;
        store.insert(doc);

        let shared = store.get(&id).unwrap();
        assert_eq!(shared.lock().await.file_name, "a.txt");
        assert!(store.get(&Uuid::new_v4()).is_none());
    }

    #[tokio::test]
    async fn test_evicts_oldest_beyond_capacity() {
        let store = SessionStore::new(2);
        let first = session("1.txt").await;
        let first_id = first.id;
        store.insert(first);
        let second = session("2.txt").await;
        let second_id = second.id;
        store.insert(second);
        let third = session("3.txt").await;
        let third_id = third.id;
        store.insert(third);

        assert_eq!(store.len(), 2);
        assert!(store.get(&first_id).is_none());
        assert!(store.get(&second_id).is_some());
        assert!(store.get(&third_id).is_some());
    }

    #[tokio::test]
    async fn test_remove() {
        let store = SessionStore::new(2);
        let doc = session("a.txt").await;
        let id = doc.id;
        store.insert(doc);

        assert!(store.remove(&id));
        assert!(!store.remove(&id));
        assert!(store.is_empty());
    }

    #[test]
    fn test_app_state_uses_configured_capacity() {
        let config = Config {
            max_sessions: 5,
            ..Config::default()
        };
        let state = AppState::new(config).unwrap();
        assert_eq!(state.sessions.capacity, 5);
    }
}
