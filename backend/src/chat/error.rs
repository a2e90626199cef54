//! Chat orchestration error types

use crate::model::ServiceError;
use thiserror::Error;

/// Errors from handling one user chat message
#[derive(Error, Debug)]
pub enum ChatError {
    /// The session has no model client to send the transcript to
    #[error("AI assistant is not configured for this session")]
    Configuration,

    /// The model service call failed
    #[error(transparent)]
    Service(#[from] ServiceError),
}
