//! Chat module
//!
//! Message types and the orchestration of a chat turn against the model.

pub mod error;
pub mod models;
pub mod orchestrator;

pub use error::ChatError;
pub use models::{Message, MessageRole};
pub use orchestrator::handle_user_input;
