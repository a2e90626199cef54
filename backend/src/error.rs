//! Error types and error handling for the application
//!
//! This module defines the top-level error type returned by HTTP handlers.
//! Every variant converts into a JSON body with a human-readable message and
//! the session the request resolved to. Storage and model details stay in
//! the logs.

use crate::chat::ChatError;
use crate::credentials::{AuthError, RegistrationError};
use crate::model::ServiceError;
use crate::session::SessionId;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Shown for empty form fields
const MISSING_FIELDS_MESSAGE: &str = "Please fill in all fields";

/// Shown for any login rejection, whether or not the email exists
const LOGIN_REJECTED_MESSAGE: &str = "Invalid email or password";

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// A required form field was empty
    #[error("Missing required fields")]
    MissingFields,

    /// Registration password and confirmation differ
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Registration failed
    #[error("Registration error: {0}")]
    Registration(#[from] RegistrationError),

    /// Login failed
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// The session has not logged in
    #[error("Session is not authenticated")]
    Unauthenticated,

    /// Request body is well-formed but not acceptable
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A chat turn failed
    #[error("Chat error: {0}")]
    Chat(#[from] ChatError),
}

impl AppError {
    /// HTTP status and the message shown to the user
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::MissingFields => (StatusCode::BAD_REQUEST, MISSING_FIELDS_MESSAGE.to_string()),
            AppError::PasswordMismatch => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Registration(e) => match e {
                RegistrationError::MissingFields => {
                    (StatusCode::BAD_REQUEST, MISSING_FIELDS_MESSAGE.to_string())
                }
                RegistrationError::AlreadyExists => (StatusCode::CONFLICT, e.to_string()),
                RegistrationError::ServerError(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
                }
            },
            AppError::Auth(e) => match e {
                AuthError::MissingFields => {
                    (StatusCode::BAD_REQUEST, MISSING_FIELDS_MESSAGE.to_string())
                }
                AuthError::NotFound | AuthError::InvalidCredentials => {
                    (StatusCode::UNAUTHORIZED, LOGIN_REJECTED_MESSAGE.to_string())
                }
                AuthError::ServerError(_) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            },
            AppError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "Please log in to use the assistant".to_string(),
            ),
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Chat(e) => match e {
                ChatError::Configuration => (StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
                ChatError::Service(ServiceError::RateLimited(_)) => (
                    StatusCode::TOO_MANY_REQUESTS,
                    "The AI assistant is busy, please try again later".to_string(),
                ),
                ChatError::Service(_) => (
                    StatusCode::BAD_GATEWAY,
                    "Error getting response from the AI assistant".to_string(),
                ),
            },
        }
    }
}

/// An `AppError` tagged with the session the request resolved to
///
/// `session_id` is `None` when the request named no live session.
#[derive(Debug)]
pub struct SessionError {
    /// Session the failed request applied to
    pub session_id: Option<SessionId>,
    /// What went wrong
    pub error: AppError,
}

impl From<AppError> for SessionError {
    fn from(error: AppError) -> Self {
        Self {
            session_id: None,
            error,
        }
    }
}

/// Attach a session ID to an error, for use with `map_err`
pub fn in_session<E: Into<AppError>>(
    session_id: Option<SessionId>,
) -> impl FnOnce(E) -> SessionError {
    move |error| SessionError {
        session_id,
        error: error.into(),
    }
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let (status, error_message) = self.error.status_and_message();
        if status.is_server_error() {
            tracing::error!(error = %self.error, "Request failed");
        }

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
            "session_id": self.session_id,
        }));

        (status, body).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        SessionError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> (u16, String) {
        let (status, message) = err.status_and_message();
        (status.as_u16(), message)
    }

    #[test]
    fn test_login_failures_share_message() {
        let not_found = status_of(AppError::Auth(AuthError::NotFound));
        let wrong_password = status_of(AppError::Auth(AuthError::InvalidCredentials));
        assert_eq!(not_found, wrong_password);
        assert_eq!(not_found.0, 401);
    }

    #[test]
    fn test_server_errors_hide_details() {
        let (status, message) = status_of(AppError::Auth(AuthError::ServerError(
            "disk I/O error at /var/db".to_string(),
        )));
        assert_eq!(status, 500);
        assert_eq!(message, "Login failed due to server error");

        let (status, message) = status_of(AppError::Registration(
            RegistrationError::ServerError("connection refused".to_string()),
        ));
        assert_eq!(status, 500);
        assert_eq!(message, "Registration failed due to server error");
    }

    #[test]
    fn test_missing_fields_message() {
        assert_eq!(status_of(AppError::MissingFields).1, "Please fill in all fields");
        assert_eq!(
            status_of(AppError::Registration(RegistrationError::MissingFields)).1,
            "Please fill in all fields"
        );
    }

    #[test]
    fn test_registration_conflict() {
        let (status, message) = status_of(AppError::Registration(RegistrationError::AlreadyExists));
        assert_eq!(status, 409);
        assert_eq!(message, "User already exists");
    }

    #[test]
    fn test_chat_error_statuses() {
        assert_eq!(status_of(AppError::Chat(ChatError::Configuration)).0, 503);
        assert_eq!(
            status_of(AppError::Chat(ChatError::Service(ServiceError::RateLimited(
                String::new()
            ))))
            .0,
            429
        );
        assert_eq!(
            status_of(AppError::Chat(ChatError::Service(ServiceError::Transport(
                "reset".to_string()
            ))))
            .0,
            502
        );
    }

    #[test]
    fn test_upstream_body_not_shown() {
        let (status, message) = status_of(AppError::Chat(ChatError::Service(
            ServiceError::Status {
                status: 500,
                body: "internal trace id=abc123".to_string(),
            },
        )));
        assert_eq!(status, 502);
        assert!(!message.contains("abc123"));

        let (_, message) = status_of(AppError::Chat(ChatError::Service(
            ServiceError::MalformedResponse("{\"raw\":true}".to_string()),
        )));
        assert!(!message.contains("raw"));
    }

    #[tokio::test]
    async fn test_error_body_carries_session_id() {
        let response = SessionError {
            session_id: Some("abc".to_string()),
            error: AppError::Unauthenticated,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["session_id"], "abc");
        assert_eq!(json["status"], 401);

        let body = axum::body::to_bytes(
            AppError::MissingFields.into_response().into_body(),
            usize::MAX,
        )
        .await
        .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["session_id"].is_null());
    }
}
