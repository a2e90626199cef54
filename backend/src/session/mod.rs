//! Session state management
//!
//! Per-session login status and chat transcript, plus the registry that maps
//! session IDs to sessions.

pub mod registry;
pub mod state;

pub use registry::{SessionId, SessionRegistry};
pub use state::Session;
