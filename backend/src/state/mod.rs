// State management module
// Handles application-wide state shared by the HTTP handlers

pub mod app_state;

pub use app_state::{AppState, SharedState};
