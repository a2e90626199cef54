//! Credential-specific error types
//!
//! Errors raised by the shared database handle and by the registration and
//! verification operations. None of these carry passwords or hashes.

use thiserror::Error;

/// Errors from establishing or using the shared database handle
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// The connection string could not be parsed
    #[error("Invalid database URL: {0}")]
    InvalidUrl(String),

    /// Connecting or pinging the database failed
    #[error("Failed to connect to database: {0}")]
    Connect(String),

    /// Schema migration failed at connection time
    #[error("Migration failed: {0}")]
    Migration(String),

    /// A query failed after the connection was established
    #[error("Query failed: {0}")]
    Query(#[from] sqlx::Error),
}

/// Errors returned by [`CredentialStore::register`](super::CredentialStore::register)
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// Email or password was empty
    #[error("Email and password are required")]
    MissingFields,

    /// A user record with this email already exists
    #[error("User already exists")]
    AlreadyExists,

    /// Storage or hashing failed; details are logged, not exposed
    #[error("Registration failed due to server error")]
    ServerError(String),
}

/// Errors returned by [`CredentialStore::verify`](super::CredentialStore::verify)
#[derive(Error, Debug)]
pub enum AuthError {
    /// Email or password was empty
    #[error("Email and password are required")]
    MissingFields,

    /// No user record matches the email
    #[error("User not found")]
    NotFound,

    /// The password does not match the stored hash
    #[error("Invalid password")]
    InvalidCredentials,

    /// Storage or hashing failed; details are logged, not exposed
    #[error("Login failed due to server error")]
    ServerError(String),
}
