//! Credential management
//!
//! Persists user identity records and performs password hashing and
//! verification over a lazily connected, shared database handle.

pub mod database;
pub mod error;
pub mod hashing;
pub mod store;

pub use database::Database;
pub use error::{AuthError, DatabaseError, RegistrationError};
pub use hashing::{HashCost, PasswordHasher};
pub use store::{CredentialStore, UserRecord};
