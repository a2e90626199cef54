//! Session registry
//!
//! Process-local map from session ID to session state. A session is stored
//! when it logs in and evicted when it logs out, so the map only ever holds
//! authenticated sessions. Anonymous clients have nothing worth storing.

use super::state::Session;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

/// Unique identifier for a session
pub type SessionId = String;

/// Tracks every live session
///
/// Each session sits behind its own mutex, so actions on one session run one
/// at a time while independent sessions proceed concurrently.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<SessionId, Arc<Mutex<Session>>>>>,
}

impl SessionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a session, creating a fresh one if the ID is absent or unknown
    ///
    /// Only called once a login has been verified. Unknown IDs are never
    /// adopted; the new session always gets a server-generated ID.
    ///
    /// # Returns
    /// * `(SessionId, Arc<Mutex<Session>>)` - The ID to hand back to the
    ///   client (new if a session was created) and the session itself
    pub async fn resolve(&self, id: Option<&str>) -> (SessionId, Arc<Mutex<Session>>) {
        if let Some(found) = self.find(id).await {
            return found;
        }

        let id = Uuid::new_v4().to_string();
        let session = Arc::new(Mutex::new(Session::new()));
        self.sessions
            .write()
            .await
            .insert(id.clone(), session.clone());
        debug!(session_id = %id, "Created new session");
        (id, session)
    }

    /// Look up a session by an optional client-supplied ID without creating one
    pub async fn find(&self, id: Option<&str>) -> Option<(SessionId, Arc<Mutex<Session>>)> {
        let id = id?;
        let session = self.get(id).await?;
        Some((id.to_string(), session))
    }

    /// Look up an existing session without creating one
    pub async fn get(&self, id: &str) -> Option<Arc<Mutex<Session>>> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Evict a session, returning it if it existed
    pub async fn remove(&self, id: &str) -> Option<Arc<Mutex<Session>>> {
        let removed = self.sessions.write().await.remove(id);
        if removed.is_some() {
            debug!(session_id = %id, "Removed session");
        }
        removed
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether no sessions exist
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
