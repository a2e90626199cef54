//! Chat orchestration
//!
//! Turns a new user message plus the accumulated transcript into a model
//! request and appends the reply. On failure the user's message stays in the
//! transcript without an assistant reply.

use crate::chat::error::ChatError;
use crate::chat::{Message, MessageRole};
use crate::session::Session;
use tracing::{debug, warn};

/// Handle one user message for a session
///
/// # Arguments
/// * `session` - Session whose transcript receives the message and reply
/// * `text` - The user's message
///
/// # Returns
/// * `Ok(Message)` - The assistant reply, already appended to the transcript
/// * `Err(ChatError)` - No model client, or the model call failed
pub async fn handle_user_input(session: &mut Session, text: &str) -> Result<Message, ChatError> {
    session.append_message(MessageRole::User, text);

    let Some(client) = session.model_client() else {
        warn!("Chat message received without a model client");
        return Err(ChatError::Configuration);
    };

    debug!(turns = session.transcript().len(), "Sending transcript to model");
    let reply = client.send_chat(session.transcript()).await?;

    session.append_message(reply.role, reply.content.clone());
    Ok(reply)
}
