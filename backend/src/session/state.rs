//! Per-session state
//!
//! Holds the login status, the chat transcript and the model client for one
//! interactive session. Two states: anonymous (initial) and authenticated.

use crate::chat::{Message, MessageRole};
use crate::model::{ChatModel, ModelProvider};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info};

/// State of a single interactive session
#[derive(Default)]
pub struct Session {
    authenticated: bool,
    transcript: Vec<Message>,
    model_client: Option<Arc<dyn ChatModel>>,
    model_init_attempted: bool,
}

impl Session {
    /// Create a session in its initial, anonymous state
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the session as authenticated
    ///
    /// Callers must only do this after successful credential verification.
    pub fn login(&mut self) {
        self.authenticated = true;
    }

    /// Reset every field back to the initial state
    pub fn logout(&mut self) {
        *self = Self::default();
    }

    /// Whether the session has logged in
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Append a message to the transcript
    pub fn append_message(&mut self, role: MessageRole, content: impl Into<String>) {
        self.transcript.push(Message::new(role, content));
    }

    /// Conversation so far, oldest first
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// The session's model client, if one has been initialized
    pub fn model_client(&self) -> Option<Arc<dyn ChatModel>> {
        self.model_client.clone()
    }

    /// Initialize the model client once per authenticated session
    ///
    /// A previously created client is reused. A failed attempt is logged and
    /// not repeated until the session is reset by logout.
    pub fn ensure_model_client(&mut self, provider: &dyn ModelProvider) {
        if !self.authenticated || self.model_client.is_some() || self.model_init_attempted {
            return;
        }
        self.model_init_attempted = true;
        match provider.connect() {
            Ok(client) => {
                info!("Model client initialized for session");
                self.model_client = Some(client);
            }
            Err(e) => error!(error = %e, "Failed to initialize model client"),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.authenticated)
            .field("transcript_len", &self.transcript.len())
            .field("has_model_client", &self.model_client.is_some())
            .finish()
    }
}
