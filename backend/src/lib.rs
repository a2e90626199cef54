//! AI Agent Backend Library
//!
//! User registration and login over a credential store, with gated access to
//! a conversational AI assistant. The main binary is in `src/main.rs`.

pub mod api;
pub mod chat;
pub mod config;
pub mod credentials;
pub mod error;
pub mod model;
pub mod session;
/// Application state management
///
/// Holds the credential store, live sessions and model provider.
pub mod state;
