//! Integration tests for the authentication and chat flow
//!
//! These tests drive the HTTP handlers directly:
//! 1. Registration and login against a SQLite-backed credential store
//! 2. Session gating of the chat endpoint
//! 3. Chat turns against stub models
//! 4. Logout ending the session
//! 5. Anonymous requests leaving the session registry untouched

use ai_agent_backend::api::auth::{login, logout, register, LoginRequest, RegisterRequest};
use ai_agent_backend::api::chat::{get_session, send_message, SendMessageRequest};
use ai_agent_backend::api::utils::SESSION_HEADER;
use ai_agent_backend::chat::{ChatError, Message};
use ai_agent_backend::credentials::{
    AuthError, CredentialStore, Database, HashCost, PasswordHasher, RegistrationError,
};
use ai_agent_backend::error::{AppError, SessionError};
use ai_agent_backend::model::{ChatModel, InitError, ModelProvider, ServiceError};
use ai_agent_backend::state::{AppState, SharedState};
use async_trait::async_trait;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;
use tempfile::TempDir;

/// Replies "hi" to everything
struct HiModel;

#[async_trait]
impl ChatModel for HiModel {
    async fn send_chat(&self, _transcript: &[Message]) -> Result<Message, ServiceError> {
        Ok(Message::assistant("hi"))
    }
}

/// Always fails as if the quota were exhausted
struct QuotaExhaustedModel;

#[async_trait]
impl ChatModel for QuotaExhaustedModel {
    async fn send_chat(&self, _transcript: &[Message]) -> Result<Message, ServiceError> {
        Err(ServiceError::RateLimited("quota".to_string()))
    }
}

enum Stub {
    Hi,
    QuotaExhausted,
    Unconfigured,
}

impl ModelProvider for Stub {
    fn connect(&self) -> Result<Arc<dyn ChatModel>, InitError> {
        match self {
            Stub::Hi => Ok(Arc::new(HiModel)),
            Stub::QuotaExhausted => Ok(Arc::new(QuotaExhaustedModel)),
            Stub::Unconfigured => Err(InitError::MissingProjectId),
        }
    }
}

/// Helper to create test state over a temporary database
fn create_test_state(stub: Stub) -> (TempDir, SharedState) {
    let dir = TempDir::new().unwrap();
    let db = Arc::new(Database::new(
        dir.path().join("users.db").to_string_lossy().to_string(),
    ));
    let hasher = PasswordHasher::new(HashCost {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
    .unwrap();
    let state = AppState::new(CredentialStore::new(db, hasher), Arc::new(stub)).shared();
    (dir, state)
}

fn headers_for(session_id: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(SESSION_HEADER, HeaderValue::from_str(session_id).unwrap());
    headers
}

fn register_request(email: &str, password: &str, confirm: &str) -> Json<RegisterRequest> {
    Json(RegisterRequest {
        email: email.to_string(),
        password: password.to_string(),
        confirm_password: confirm.to_string(),
    })
}

fn login_request(email: &str, password: &str) -> Json<LoginRequest> {
    Json(LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    })
}

/// Unwrap a handler failure
fn failure<T: std::fmt::Debug>(result: Result<T, SessionError>) -> SessionError {
    result.expect_err("handler should have failed")
}

async fn body_json(err: SessionError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn chat_request(content: &str) -> Json<SendMessageRequest> {
    Json(SendMessageRequest {
        content: content.to_string(),
    })
}

/// Register and log in, returning the authenticated session ID
async fn logged_in_session(state: &SharedState) -> String {
    let registered = register(
        State(state.clone()),
        HeaderMap::new(),
        register_request("a@x.com", "pw1", "pw1"),
    )
    .await
    .unwrap();
    assert_eq!(registered.0.session_id, None);
    assert!(!registered.0.authenticated);

    let logged_in = login(
        State(state.clone()),
        HeaderMap::new(),
        login_request("a@x.com", "pw1"),
    )
    .await
    .unwrap();
    assert!(logged_in.0.authenticated);
    logged_in.0.session_id.expect("login returns a session ID")
}

#[tokio::test]
async fn test_full_flow_register_login_chat_logout() {
    let (_dir, state) = create_test_state(Stub::Hi);
    let session_id = logged_in_session(&state).await;
    assert_eq!(state.sessions.len().await, 1);

    let chat = send_message(
        State(state.clone()),
        headers_for(&session_id),
        chat_request("hello"),
    )
    .await
    .unwrap();
    assert_eq!(chat.0.session_id, session_id);
    assert_eq!(chat.0.reply, Message::assistant("hi"));
    assert_eq!(
        chat.0.transcript,
        vec![Message::user("hello"), Message::assistant("hi")]
    );

    let view = get_session(State(state.clone()), headers_for(&session_id))
        .await
        .unwrap();
    assert_eq!(view.0.session_id.as_deref(), Some(session_id.as_str()));
    assert!(view.0.authenticated);
    assert!(view.0.assistant_ready);
    assert_eq!(view.0.transcript.len(), 2);

    let out = logout(State(state.clone()), headers_for(&session_id))
        .await
        .unwrap();
    assert_eq!(out.0.session_id.as_deref(), Some(session_id.as_str()));
    assert!(!out.0.authenticated);
    assert!(state.sessions.is_empty().await);

    let view = get_session(State(state.clone()), headers_for(&session_id))
        .await
        .unwrap();
    assert_eq!(view.0.session_id, None);
    assert!(!view.0.authenticated);
    assert!(!view.0.assistant_ready);
    assert!(view.0.transcript.is_empty());

    let err = failure(
        send_message(
            State(state.clone()),
            headers_for(&session_id),
            chat_request("again"),
        )
        .await,
    );
    assert!(matches!(err.error, AppError::Unauthenticated));
}

#[tokio::test]
async fn test_chat_requires_login() {
    let (_dir, state) = create_test_state(Stub::Hi);

    let err = failure(send_message(State(state.clone()), HeaderMap::new(), chat_request("hello")).await);
    assert!(matches!(err.error, AppError::Unauthenticated));
    assert_eq!(err.session_id, None);
}

#[tokio::test]
async fn test_register_form_checks() {
    let (_dir, state) = create_test_state(Stub::Hi);

    let err = failure(
        register(
            State(state.clone()),
            HeaderMap::new(),
            register_request("a@x.com", "pw1", ""),
        )
        .await,
    );
    assert!(matches!(err.error, AppError::MissingFields));

    let err = failure(
        register(
            State(state.clone()),
            HeaderMap::new(),
            register_request("a@x.com", "pw1", "pw2"),
        )
        .await,
    );
    assert!(matches!(err.error, AppError::PasswordMismatch));
}

#[tokio::test]
async fn test_duplicate_registration() {
    let (_dir, state) = create_test_state(Stub::Hi);
    let first = register(
        State(state.clone()),
        HeaderMap::new(),
        register_request("a@x.com", "pw1", "pw1"),
    )
    .await
    .unwrap();
    assert!(!first.0.authenticated);

    let err = failure(
        register(
            State(state.clone()),
            HeaderMap::new(),
            register_request("a@x.com", "pw2", "pw2"),
        )
        .await,
    );
    assert!(matches!(
        err.error,
        AppError::Registration(RegistrationError::AlreadyExists)
    ));
}

#[tokio::test]
async fn test_wrong_password_leaves_session_untouched() {
    let (_dir, state) = create_test_state(Stub::Hi);
    let session_id = logged_in_session(&state).await;
    let chat = send_message(
        State(state.clone()),
        headers_for(&session_id),
        chat_request("hello"),
    )
    .await
    .unwrap();
    assert_eq!(chat.0.transcript.len(), 2);

    let err = failure(
        login(
            State(state.clone()),
            headers_for(&session_id),
            login_request("a@x.com", "wrong"),
        )
        .await,
    );
    assert!(matches!(
        err.error,
        AppError::Auth(AuthError::InvalidCredentials)
    ));
    assert_eq!(err.session_id.as_deref(), Some(session_id.as_str()));

    let view = get_session(State(state.clone()), headers_for(&session_id))
        .await
        .unwrap();
    assert!(view.0.authenticated);
    assert_eq!(
        view.0.transcript,
        vec![Message::user("hello"), Message::assistant("hi")]
    );
}

#[tokio::test]
async fn test_failed_login_body_names_session() {
    let (_dir, state) = create_test_state(Stub::Hi);
    let session_id = logged_in_session(&state).await;

    let err = failure(
        login(
            State(state.clone()),
            headers_for(&session_id),
            login_request("nobody@x.com", "pw1"),
        )
        .await,
    );
    let (status, json) = body_json(err).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["session_id"], session_id.as_str());
    assert_eq!(json["error"], "Invalid email or password");

    // No live session named: the key is present but null
    let err = failure(
        login(
            State(state.clone()),
            HeaderMap::new(),
            login_request("nobody@x.com", "pw1"),
        )
        .await,
    );
    let (_, json) = body_json(err).await;
    assert!(json.as_object().unwrap().contains_key("session_id"));
    assert!(json["session_id"].is_null());
    assert_eq!(state.sessions.len().await, 1);
}

#[tokio::test]
async fn test_unknown_email_and_wrong_password_look_alike() {
    let (_dir, state) = create_test_state(Stub::Hi);
    logged_in_session(&state).await;

    let unknown = failure(
        login(
            State(state.clone()),
            HeaderMap::new(),
            login_request("nobody@x.com", "pw1"),
        )
        .await,
    );
    assert!(matches!(unknown.error, AppError::Auth(AuthError::NotFound)));

    let wrong = failure(
        login(
            State(state.clone()),
            HeaderMap::new(),
            login_request("a@x.com", "nope"),
        )
        .await,
    );

    let (unknown_status, unknown_json) = body_json(unknown).await;
    let (wrong_status, wrong_json) = body_json(wrong).await;
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_json, wrong_json);
    assert_eq!(wrong_json["error"], "Invalid email or password");
    assert_eq!(wrong_json["status"], 401);
}

#[tokio::test]
async fn test_failed_model_call_keeps_user_message() {
    let (_dir, state) = create_test_state(Stub::QuotaExhausted);
    let session_id = logged_in_session(&state).await;

    let err = failure(
        send_message(
            State(state.clone()),
            headers_for(&session_id),
            chat_request("hello"),
        )
        .await,
    );
    assert!(matches!(
        err.error,
        AppError::Chat(ChatError::Service(ServiceError::RateLimited(_)))
    ));
    assert_eq!(err.session_id.as_deref(), Some(session_id.as_str()));

    let view = get_session(State(state.clone()), headers_for(&session_id))
        .await
        .unwrap();
    assert_eq!(view.0.transcript, vec![Message::user("hello")]);
}

#[tokio::test]
async fn test_unconfigured_model_reports_configuration_error() {
    let (_dir, state) = create_test_state(Stub::Unconfigured);
    let session_id = logged_in_session(&state).await;

    let view = get_session(State(state.clone()), headers_for(&session_id))
        .await
        .unwrap();
    assert!(view.0.authenticated);
    assert!(!view.0.assistant_ready);

    let err = failure(
        send_message(
            State(state.clone()),
            headers_for(&session_id),
            chat_request("hello"),
        )
        .await,
    );
    assert!(matches!(err.error, AppError::Chat(ChatError::Configuration)));
    assert_eq!(
        err.into_response().status(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn test_empty_message_rejected() {
    let (_dir, state) = create_test_state(Stub::Hi);
    let session_id = logged_in_session(&state).await;

    let err = failure(
        send_message(
            State(state.clone()),
            headers_for(&session_id),
            chat_request("   "),
        )
        .await,
    );
    assert!(matches!(err.error, AppError::InvalidRequest(_)));

    let view = get_session(State(state.clone()), headers_for(&session_id))
        .await
        .unwrap();
    assert!(view.0.transcript.is_empty());
}

#[tokio::test]
async fn test_sessions_do_not_share_login() {
    let (_dir, state) = create_test_state(Stub::Hi);
    let session_id = logged_in_session(&state).await;

    let other = login(
        State(state.clone()),
        HeaderMap::new(),
        login_request("a@x.com", "pw1"),
    )
    .await
    .unwrap();
    let other_id = other.0.session_id.unwrap();
    assert_ne!(other_id, session_id);

    let chat = send_message(
        State(state.clone()),
        headers_for(&session_id),
        chat_request("mine"),
    )
    .await
    .unwrap();
    assert_eq!(chat.0.transcript.len(), 2);

    let view = get_session(State(state.clone()), headers_for(&other_id))
        .await
        .unwrap();
    assert!(view.0.transcript.is_empty());

    let out = logout(State(state.clone()), headers_for(&other_id))
        .await
        .unwrap();
    assert!(!out.0.authenticated);

    let view = get_session(State(state.clone()), headers_for(&session_id))
        .await
        .unwrap();
    assert!(view.0.authenticated);
}

#[tokio::test]
async fn test_anonymous_requests_create_no_sessions() {
    let (_dir, state) = create_test_state(Stub::Hi);

    for i in 0..100 {
        let headers = if i % 2 == 0 {
            HeaderMap::new()
        } else {
            headers_for(&format!("made-up-{}", i))
        };

        let err = failure(
            send_message(State(state.clone()), headers.clone(), chat_request("hello")).await,
        );
        assert!(matches!(err.error, AppError::Unauthenticated));

        let view = get_session(State(state.clone()), headers.clone())
            .await
            .unwrap();
        assert_eq!(view.0.session_id, None);

        let out = logout(State(state.clone()), headers.clone()).await.unwrap();
        assert_eq!(out.0.session_id, None);

        let err = failure(
            login(
                State(state.clone()),
                headers,
                login_request("nobody@x.com", "pw"),
            )
            .await,
        );
        assert!(matches!(err.error, AppError::Auth(AuthError::NotFound)));
    }

    assert!(state.sessions.is_empty().await);
}

#[tokio::test]
async fn test_login_ignores_unknown_session_id() {
    let (_dir, state) = create_test_state(Stub::Hi);
    let _ = register(
        State(state.clone()),
        HeaderMap::new(),
        register_request("a@x.com", "pw1", "pw1"),
    )
    .await
    .unwrap();

    let logged_in = login(
        State(state.clone()),
        headers_for("chosen-by-client"),
        login_request("a@x.com", "pw1"),
    )
    .await
    .unwrap();
    let session_id = logged_in.0.session_id.unwrap();
    assert_ne!(session_id, "chosen-by-client");
    assert!(state.sessions.get("chosen-by-client").await.is_none());
    assert_eq!(state.sessions.len().await, 1);
}
