//! Credential store
//!
//! Registers users and verifies their passwords against the users collection.
//! Storage failures are caught here and reported as `ServerError`, separate
//! from the "no such user" and "wrong password" outcomes.

use crate::credentials::database::Database;
use crate::credentials::error::{AuthError, RegistrationError};
use crate::credentials::hashing::PasswordHasher;
use chrono::Utc;
use sqlx::{FromRow, SqlitePool};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

/// A stored user identity
#[derive(Clone, FromRow)]
pub struct UserRecord {
    /// Unique identifier, compared exactly as stored
    pub email: String,
    /// PHC-encoded salted password hash
    pub password_hash: Vec<u8>,
    /// When the record was created (Unix timestamp)
    pub created_at: i64,
}

impl UserRecord {
    /// Create a record stamped with the current time
    pub fn new(email: String, password_hash: Vec<u8>) -> Self {
        Self {
            email,
            password_hash,
            created_at: Utc::now().timestamp(),
        }
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Registration and verification of user credentials
#[derive(Clone)]
pub struct CredentialStore {
    db: Arc<Database>,
    hasher: PasswordHasher,
}

impl CredentialStore {
    /// Create a store over a shared database handle
    pub fn new(db: Arc<Database>, hasher: PasswordHasher) -> Self {
        Self { db, hasher }
    }

    /// Register a new user
    ///
    /// # Arguments
    /// * `email` - Unique identifier for the user
    /// * `password` - Plaintext password, hashed before it is stored
    ///
    /// # Errors
    /// * `MissingFields` - Email or password is empty
    /// * `AlreadyExists` - A record with this email exists
    /// * `ServerError` - Storage or hashing failed
    pub async fn register(&self, email: &str, password: &str) -> Result<(), RegistrationError> {
        if email.is_empty() || password.is_empty() {
            return Err(RegistrationError::MissingFields);
        }

        let pool = self.db.handle().await.map_err(|e| {
            error!(error = %e, "Error during user registration");
            RegistrationError::ServerError(e.to_string())
        })?;

        let existing = find_user(&pool, email).await.map_err(|e| {
            error!(error = %e, "Error during user registration");
            RegistrationError::ServerError(e.to_string())
        })?;
        if existing.is_some() {
            return Err(RegistrationError::AlreadyExists);
        }

        let password_hash = self.hash_password(password).await.map_err(|e| {
            error!(error = %e, "Failed to hash password");
            RegistrationError::ServerError(e)
        })?;

        let record = UserRecord::new(email.to_string(), password_hash);
        match insert_user(&pool, &record).await {
            Ok(()) => {}
            // Lost a race against a concurrent registration
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                return Err(RegistrationError::AlreadyExists);
            }
            Err(e) => {
                error!(error = %e, "Error during user registration");
                return Err(RegistrationError::ServerError(e.to_string()));
            }
        }

        info!(email = %email, "Successfully registered user");
        Ok(())
    }

    /// Verify a user's credentials
    ///
    /// Succeeds without changing any state when the password matches.
    ///
    /// # Errors
    /// * `MissingFields` - Email or password is empty
    /// * `NotFound` - No record matches the email
    /// * `InvalidCredentials` - Password does not match the stored hash
    /// * `ServerError` - Storage or hashing failed
    pub async fn verify(&self, email: &str, password: &str) -> Result<(), AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }

        let pool = self.db.handle().await.map_err(|e| {
            error!(error = %e, "Error during user verification");
            AuthError::ServerError(e.to_string())
        })?;

        let user = find_user(&pool, email)
            .await
            .map_err(|e| {
                error!(error = %e, "Error during user verification");
                AuthError::ServerError(e.to_string())
            })?
            .ok_or(AuthError::NotFound)?;

        let hasher = self.hasher.clone();
        let password = password.to_string();
        let matches = tokio::task::spawn_blocking(move || {
            hasher.verify(&password, &user.password_hash)
        })
        .await
        .map_err(|e| AuthError::ServerError(e.to_string()))?
        .map_err(|e| {
            error!(email = %email, error = %e, "Stored password hash is unreadable");
            AuthError::ServerError(e.to_string())
        })?;

        if matches {
            info!(email = %email, "Successful login for user");
            Ok(())
        } else {
            warn!(email = %email, "Failed login attempt for user");
            Err(AuthError::InvalidCredentials)
        }
    }

    async fn hash_password(&self, password: &str) -> Result<Vec<u8>, String> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| e.to_string())?
            .map_err(|e| e.to_string())
    }
}

async fn find_user(pool: &SqlitePool, email: &str) -> Result<Option<UserRecord>, sqlx::Error> {
    sqlx::query_as::<_, UserRecord>(
        "SELECT email, password_hash, created_at FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

async fn insert_user(pool: &SqlitePool, record: &UserRecord) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO users (email, password_hash, created_at) VALUES (?, ?, ?)")
        .bind(&record.email)
        .bind(&record.password_hash)
        .bind(record.created_at)
        .execute(pool)
        .await?;
    Ok(())
}
