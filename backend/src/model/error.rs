//! Model service error types

use thiserror::Error;

/// Errors from constructing a model service client
#[derive(Error, Debug)]
pub enum InitError {
    /// Cloud project identifier is absent or empty
    #[error("Google Cloud project ID is not configured")]
    MissingProjectId,

    /// Region is absent or empty
    #[error("Google Cloud region is not configured")]
    MissingRegion,

    /// No access token is available to authenticate requests
    #[error("Vertex AI credentials are not configured")]
    MissingCredentials,

    /// The HTTP client could not be built
    #[error("Failed to build Vertex AI client: {0}")]
    Client(String),
}

/// Errors from a single request to the model service
///
/// The adapter performs no retries; every variant is terminal for the call.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Nothing to send
    #[error("Cannot send an empty transcript")]
    EmptyTranscript,

    /// The request never produced an HTTP response
    #[error("Failed to send request to Vertex AI: {0}")]
    Transport(String),

    /// Quota exhausted (HTTP 429)
    #[error("Vertex AI rate limit exceeded: {0}")]
    RateLimited(String),

    /// Any other non-success HTTP status
    #[error("Vertex AI returned error status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, as returned
        body: String,
    },

    /// The service refused to answer the prompt
    #[error("Vertex AI blocked the prompt: {0}")]
    Blocked(String),

    /// The response body did not have the expected shape
    #[error("Malformed response from Vertex AI: {0}")]
    MalformedResponse(String),
}
