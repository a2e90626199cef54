//! API utility functions
//!
//! Contains helpers used by API handlers for session lookup and input
//! validation.

use crate::error::AppError;
use crate::session::{Session, SessionId};
use crate::state::AppState;
use axum::http::HeaderMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Request header carrying the session ID
pub const SESSION_HEADER: &str = "x-session-id";

/// Maximum chat message length in characters
pub const MAX_MESSAGE_LENGTH: usize = 10_000; // 10KB max message length

/// Read the session ID from request headers, if present
pub fn session_id_from(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Find the caller's live session, if the request names one
pub async fn find_session(
    state: &AppState,
    headers: &HeaderMap,
) -> Option<(SessionId, Arc<Mutex<Session>>)> {
    state.sessions.find(session_id_from(headers)).await
}

/// Validate a chat message
///
/// # Returns
/// * `Ok(())` - Message is valid
/// * `Err(AppError)` - Message is empty or too long
pub fn validate_message(content: &str) -> Result<(), AppError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidRequest(
            "Message cannot be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(AppError::InvalidRequest(format!(
            "Message exceeds maximum length of {} characters",
            MAX_MESSAGE_LENGTH
        )));
    }
    Ok(())
}
