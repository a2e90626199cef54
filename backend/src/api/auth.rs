//! Authentication API handlers
//!
//! Registration, login and logout. Form-level checks (empty fields,
//! password confirmation) run before the credential store is consulted.

use crate::api::utils::{find_session, session_id_from};
use crate::error::{in_session, AppError, SessionError};
use crate::session::SessionId;
use crate::state::SharedState;
use axum::{extract::State, http::HeaderMap, response::Json};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Registration form
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Email to register
    #[serde(default)]
    pub email: String,
    /// Chosen password
    #[serde(default)]
    pub password: String,
    /// Password confirmation, must equal `password`
    #[serde(default)]
    pub confirm_password: String,
}

/// Login form
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Registered email
    #[serde(default)]
    pub email: String,
    /// Password
    #[serde(default)]
    pub password: String,
}

/// Response to registration, login and logout
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Session the action applied to, if the request named a live one
    pub session_id: Option<SessionId>,
    /// Human-readable outcome
    pub message: String,
    /// Whether the session is now logged in
    pub authenticated: bool,
}

/// POST /api/auth/register - Create a user account
///
/// Registration does not log in, so no session is created here.
pub async fn register(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, SessionError> {
    let current = find_session(&state, &headers).await;
    let session_id = current.as_ref().map(|(id, _)| id.clone());

    if request.email.is_empty() || request.password.is_empty() || request.confirm_password.is_empty()
    {
        return Err(in_session(session_id)(AppError::MissingFields));
    }
    if request.password != request.confirm_password {
        return Err(in_session(session_id)(AppError::PasswordMismatch));
    }

    state
        .credentials
        .register(&request.email, &request.password)
        .await
        .map_err(in_session(session_id.clone()))?;

    let authenticated = match &current {
        Some((_, session)) => session.lock().await.is_authenticated(),
        None => false,
    };
    Ok(Json(AuthResponse {
        session_id,
        message: "Registration successful. Please proceed to login".to_string(),
        authenticated,
    }))
}

/// POST /api/auth/login - Verify credentials and authenticate the session
///
/// The session is only created once the credentials check out.
pub async fn login(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, SessionError> {
    let requested = session_id_from(&headers);
    let known = state
        .sessions
        .find(requested)
        .await
        .map(|(id, _)| id);

    if request.email.is_empty() || request.password.is_empty() {
        return Err(in_session(known)(AppError::MissingFields));
    }

    state
        .credentials
        .verify(&request.email, &request.password)
        .await
        .map_err(in_session(known))?;

    let (session_id, session) = state.sessions.resolve(requested).await;
    let mut session = session.lock().await;
    session.login();
    session.ensure_model_client(state.models.as_ref());
    info!(session_id = %session_id, "Session authenticated");

    Ok(Json(AuthResponse {
        session_id: Some(session_id),
        message: "Login successful".to_string(),
        authenticated: true,
    }))
}

/// POST /api/auth/logout - End the session
///
/// The session is cleared and evicted; its ID is no longer recognized.
pub async fn logout(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<AuthResponse>, SessionError> {
    let session_id = match session_id_from(&headers) {
        Some(id) => match state.sessions.remove(id).await {
            Some(session) => {
                session.lock().await.logout();
                info!(session_id = %id, "Session logged out");
                Some(id.to_string())
            }
            None => None,
        },
        None => None,
    };

    Ok(Json(AuthResponse {
        session_id,
        message: "Logged out".to_string(),
        authenticated: false,
    }))
}
