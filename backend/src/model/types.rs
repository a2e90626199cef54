//! Vertex AI wire types
//!
//! Structs that mirror the `generateContent` request and response JSON.

use serde::{Deserialize, Serialize};

/// Request body for `generateContent`
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation turns, oldest first
    pub contents: Vec<RequestContent>,
    /// Optional system instruction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<SystemInstruction>,
    /// Sampling configuration
    pub generation_config: GenerationConfig,
}

/// A single conversation turn in a request
#[derive(Serialize, Debug)]
pub struct RequestContent {
    /// "user" or "model"
    pub role: String,
    /// Content parts (one text part per turn)
    pub parts: Vec<RequestPart>,
}

/// System instruction content
#[derive(Serialize, Debug)]
pub struct SystemInstruction {
    /// Instruction parts
    pub parts: Vec<RequestPart>,
}

/// A text part for requests
#[derive(Serialize, Debug)]
pub struct RequestPart {
    /// The text content
    pub text: String,
}

/// Sampling configuration for requests
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling temperature
    pub temperature: f64,
    /// Maximum number of tokens to generate
    pub max_output_tokens: u32,
    /// Nucleus sampling threshold
    pub top_p: f64,
    /// Top-k sampling cutoff
    pub top_k: u32,
}

/// Top-level `generateContent` response
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidate replies, best first
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Feedback about the prompt (e.g., if it was blocked)
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// A single candidate reply
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content; absent when generation was stopped by a filter
    #[serde(default)]
    pub content: Option<Content>,
    /// Why the model stopped generating
    #[serde(default)]
    pub finish_reason: Option<String>,
    /// Safety attributes of the candidate
    #[serde(default)]
    pub safety_ratings: Vec<SafetyRating>,
    /// Sources the candidate cites
    #[serde(default)]
    pub citation_metadata: Option<CitationMetadata>,
}

/// Content of a candidate
#[derive(Deserialize, Debug)]
pub struct Content {
    /// Role of the content (e.g., "model")
    #[serde(default)]
    pub role: Option<String>,
    /// Content parts
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A single part of candidate content
#[derive(Deserialize, Debug)]
pub struct Part {
    /// Text of this part; non-text parts have none
    #[serde(default)]
    pub text: Option<String>,
}

/// Safety attribute attached to a candidate
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SafetyRating {
    /// Harm category
    pub category: String,
    /// Likelihood bucket (e.g., "NEGLIGIBLE")
    #[serde(default)]
    pub probability: Option<String>,
    /// Whether this category caused blocking
    #[serde(default)]
    pub blocked: bool,
}

/// Citation metadata of a candidate
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct CitationMetadata {
    /// Cited sources
    #[serde(default)]
    pub citations: Vec<Citation>,
}

/// A single cited source
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    /// Start of the cited span in the reply
    #[serde(default)]
    pub start_index: Option<u32>,
    /// End of the cited span in the reply
    #[serde(default)]
    pub end_index: Option<u32>,
    /// Source URI
    #[serde(default)]
    pub uri: Option<String>,
    /// Source title
    #[serde(default)]
    pub title: Option<String>,
    /// Source license
    #[serde(default)]
    pub license: Option<String>,
}

/// Feedback about the prompt
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Reason the prompt was blocked (if applicable)
    #[serde(default)]
    pub block_reason: Option<String>,
}
