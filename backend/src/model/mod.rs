//! Model service adapter
//!
//! Wraps the external text-generation service behind a stable interface:
//! send a transcript, receive an assistant reply. Sessions hold an
//! `Arc<dyn ChatModel>` obtained from a [`ModelProvider`].

pub mod config;
pub mod error;
pub mod types;
pub mod vertex;

pub use config::{GenerationParams, VertexSettings, SYSTEM_INSTRUCTION};
pub use error::{InitError, ServiceError};
pub use vertex::{Prediction, VertexClient, VertexProvider};

use crate::chat::Message;
use async_trait::async_trait;
use std::sync::Arc;

/// A conversational model that replies to a transcript
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send the full transcript and return the assistant's reply
    ///
    /// Implementations perform no retries.
    async fn send_chat(&self, transcript: &[Message]) -> Result<Message, ServiceError>;
}

/// Constructs model clients for new sessions
pub trait ModelProvider: Send + Sync {
    /// Build a client, failing if configuration or credentials are unusable
    fn connect(&self) -> Result<Arc<dyn ChatModel>, InitError>;
}
