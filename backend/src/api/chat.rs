//! Chat API endpoints
//!
//! Session view and message submission for authenticated sessions.

use crate::api::utils::{find_session, validate_message};
use crate::chat::{handle_user_input, Message};
use crate::error::{in_session, AppError, SessionError};
use crate::session::SessionId;
use crate::state::SharedState;
use axum::{extract::State, http::HeaderMap, response::Json};
use serde::{Deserialize, Serialize};

/// Request to send a message
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// Message content
    pub content: String,
}

/// Current state of a session
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Session unique identifier, if the request named a live session
    pub session_id: Option<SessionId>,
    /// Whether the session is logged in
    pub authenticated: bool,
    /// Whether a model client is available for chat
    pub assistant_ready: bool,
    /// Conversation so far, oldest first
    pub transcript: Vec<Message>,
}

/// Reply to a chat message
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Session unique identifier
    pub session_id: SessionId,
    /// The assistant's reply
    pub reply: Message,
    /// Conversation so far, including the new exchange
    pub transcript: Vec<Message>,
}

/// GET /api/session - Get the session's login state and transcript
///
/// A request naming no live session sees the initial, logged-out state.
pub async fn get_session(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<SessionResponse>, SessionError> {
    let Some((session_id, session)) = find_session(&state, &headers).await else {
        return Ok(Json(SessionResponse {
            session_id: None,
            authenticated: false,
            assistant_ready: false,
            transcript: Vec::new(),
        }));
    };
    let mut session = session.lock().await;
    session.ensure_model_client(state.models.as_ref());

    Ok(Json(SessionResponse {
        session_id: Some(session_id),
        authenticated: session.is_authenticated(),
        assistant_ready: session.model_client().is_some(),
        transcript: session.transcript().to_vec(),
    }))
}

/// POST /api/chat - Send a message to the assistant
pub async fn send_message(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<ChatResponse>, SessionError> {
    let Some((session_id, session)) = find_session(&state, &headers).await else {
        return Err(AppError::Unauthenticated.into());
    };
    let mut session = session.lock().await;
    if !session.is_authenticated() {
        return Err(in_session(Some(session_id))(AppError::Unauthenticated));
    }
    validate_message(&request.content).map_err(in_session(Some(session_id.clone())))?;

    session.ensure_model_client(state.models.as_ref());
    let reply = handle_user_input(&mut session, &request.content)
        .await
        .map_err(|e| {
            tracing::warn!(session_id = %session_id, error = %e, "Chat turn failed");
            in_session(Some(session_id.clone()))(e)
        })?;

    Ok(Json(ChatResponse {
        session_id,
        reply,
        transcript: session.transcript().to_vec(),
    }))
}
