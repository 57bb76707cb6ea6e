//! In-memory session store (non-persistent).

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::agent::Transcript;

/// A transcript shared between requests of one session
pub type SharedTranscript = Arc<Mutex<Transcript>>;

/// Maps session ids to their transcripts. Cloning shares the same map.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SharedTranscript>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a session id, creating the session when it does not exist.
    /// An absent or empty id gets a fresh UUID; any other id is used as given.
    pub async fn get_or_create(&self, session_id: Option<&str>) -> (String, SharedTranscript) {
        let id = match session_id {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => Uuid::new_v4().to_string(),
        };

        if let Some(transcript) = self.sessions.read().await.get(&id) {
            return (id, Arc::clone(transcript));
        }

        let mut sessions = self.sessions.write().await;
        let transcript = sessions.entry(id.clone()).or_insert_with(|| {
            debug!(session_id = %id, "Creating session");
            Arc::new(Mutex::new(Transcript::new()))
        });
        (id, Arc::clone(transcript))
    }

    /// Look up an existing session
    pub async fn get(&self, session_id: &str) -> Option<SharedTranscript> {
        self.sessions.read().await.get(session_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Ids of all known sessions, sorted
    pub async fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }
}
