// Application state management
// Holds the credential store, the live sessions and the model provider

use crate::credentials::CredentialStore;
use crate::model::ModelProvider;
use crate::session::SessionRegistry;
use std::sync::Arc;

/// Shared handle to the application state, used as the router state
pub type SharedState = Arc<AppState>;

/// Main application state
///
/// Every field is internally synchronized, so handlers share it through an
/// `Arc` without an outer lock.
#[derive(Clone)]
pub struct AppState {
    /// User registration and verification
    pub credentials: CredentialStore,
    /// Live interactive sessions
    pub sessions: SessionRegistry,
    /// Builds model clients for sessions that log in
    pub models: Arc<dyn ModelProvider>,
}

impl AppState {
    /// Create application state with no sessions
    pub fn new(credentials: CredentialStore, models: Arc<dyn ModelProvider>) -> Self {
        Self {
            credentials,
            sessions: SessionRegistry::new(),
            models,
        }
    }

    /// Wrap the state for sharing across handlers
    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }
}
