//! API module
//!
//! Contains HTTP request handlers for authentication, session and chat
//! endpoints, and the router that wires them together.

pub mod auth;
pub mod chat;
pub mod utils;

use crate::state::SharedState;
use axum::{
    routing::{get, post},
    Router,
};

/// Build the API routes over the shared application state
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/session", get(chat::get_session))
        .route("/api/chat", post(chat::send_message))
        .with_state(state)
}
