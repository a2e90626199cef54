//! Model service configuration
//!
//! Fixed request defaults and per-deployment client settings.

use serde::Serialize;
use std::fmt;

/// System instruction sent with every chat request
pub const SYSTEM_INSTRUCTION: &str = "You are a helpful AI assistant.";

/// Default model name
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default Google Cloud region
pub const DEFAULT_REGION: &str = "us-central1";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Sampling parameters for text generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationParams {
    /// Sampling temperature
    pub temperature: f64,
    /// Maximum number of tokens to generate
    pub max_output_tokens: u32,
    /// Nucleus sampling threshold
    pub top_p: f64,
    /// Top-k sampling cutoff
    pub top_k: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            max_output_tokens: 1024,
            top_p: 0.8,
            top_k: 40,
        }
    }
}

/// Client settings for Vertex AI
#[derive(Clone)]
pub struct VertexSettings {
    /// Model name (e.g., "gemini-1.5-flash")
    pub model: String,
    /// OAuth access token sent as a bearer token
    pub access_token: Option<String>,
    /// Override for the API base URL (defaults to the regional endpoint)
    pub api_base_url: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Sampling parameters
    pub params: GenerationParams,
}

impl Default for VertexSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            access_token: None,
            api_base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            params: GenerationParams::default(),
        }
    }
}

impl fmt::Debug for VertexSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VertexSettings")
            .field("model", &self.model)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("api_base_url", &self.api_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("params", &self.params)
            .finish()
    }
}
