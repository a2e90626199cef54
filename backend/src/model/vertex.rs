//! Vertex AI client
//!
//! Direct HTTP client for the Vertex AI `generateContent` endpoint. Sends a
//! role-tagged transcript with a fixed system instruction and sampling
//! parameters, and turns the first candidate into an assistant message.

use crate::chat::{Message, MessageRole};
use crate::model::config::{GenerationParams, VertexSettings, SYSTEM_INSTRUCTION};
use crate::model::error::{InitError, ServiceError};
use crate::model::types::{
    CitationMetadata, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    RequestContent, RequestPart, SafetyRating, SystemInstruction,
};
use crate::model::{ChatModel, ModelProvider};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Text and metadata from the first candidate of a response
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    /// Generated text
    pub text: String,
    /// Safety attributes of the candidate
    pub safety_ratings: Vec<SafetyRating>,
    /// Citation metadata of the candidate, if any
    pub citation_metadata: Option<CitationMetadata>,
}

/// Initialized Vertex AI client for one project and region
pub struct VertexClient {
    http: reqwest::Client,
    endpoint: String,
    access_token: String,
    params: GenerationParams,
}

impl VertexClient {
    /// Build a client for a project and region
    ///
    /// # Arguments
    /// * `project_id` - Google Cloud project identifier
    /// * `region` - Google Cloud region (e.g., "us-central1")
    /// * `settings` - Model, credentials and transport settings
    ///
    /// # Errors
    /// Returns `InitError` if the project or region is empty, no access token
    /// is configured, or the HTTP client cannot be built.
    pub fn initialize(
        project_id: &str,
        region: &str,
        settings: VertexSettings,
    ) -> Result<Self, InitError> {
        let project_id = project_id.trim();
        let region = region.trim();
        if project_id.is_empty() {
            return Err(InitError::MissingProjectId);
        }
        if region.is_empty() {
            return Err(InitError::MissingRegion);
        }
        let access_token = settings
            .access_token
            .filter(|t| !t.trim().is_empty())
            .ok_or(InitError::MissingCredentials)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| InitError::Client(e.to_string()))?;

        let base_url = settings
            .api_base_url
            .unwrap_or_else(|| format!("https://{}-aiplatform.googleapis.com/v1", region));
        let endpoint = format!(
            "{}/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            base_url.trim_end_matches('/'),
            project_id,
            region,
            settings.model
        );

        tracing::info!(
            project_id = %project_id,
            region = %region,
            model = %settings.model,
            "Initialized Vertex AI client"
        );

        Ok(Self {
            http,
            endpoint,
            access_token,
            params: settings.params,
        })
    }

    /// Full URL of the `generateContent` endpoint this client calls
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Generate text for a single prompt, without a system instruction
    pub async fn generate_text(&self, prompt: &str) -> Result<Prediction, ServiceError> {
        let contents = vec![RequestContent {
            role: "user".to_string(),
            parts: vec![RequestPart {
                text: prompt.to_string(),
            }],
        }];
        self.generate(contents, None).await
    }

    async fn generate(
        &self,
        contents: Vec<RequestContent>,
        system_instruction: Option<&str>,
    ) -> Result<Prediction, ServiceError> {
        let request_body = GenerateContentRequest {
            contents,
            system_instruction: system_instruction.map(|text| SystemInstruction {
                parts: vec![RequestPart {
                    text: text.to_string(),
                }],
            }),
            generation_config: GenerationConfig {
                temperature: self.params.temperature,
                max_output_tokens: self.params.max_output_tokens,
                top_p: self.params.top_p,
                top_k: self.params.top_k,
            },
        };

        tracing::debug!(
            endpoint = %self.endpoint,
            turns = request_body.contents.len(),
            "Calling Vertex AI"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.access_token)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());

            tracing::error!(
                status_code = status_code,
                error_body = %error_body,
                "Vertex AI returned error status"
            );

            if status_code == 429 {
                return Err(ServiceError::RateLimited(error_body));
            }
            return Err(ServiceError::Status {
                status: status_code,
                body: error_body,
            });
        }

        let response_body = response.text().await.map_err(|e| {
            ServiceError::Transport(format!("Failed to read response body: {}", e))
        })?;

        let parsed: GenerateContentResponse =
            serde_json::from_str(&response_body).map_err(|e| {
                ServiceError::MalformedResponse(format!(
                    "Failed to parse JSON: {} - Response body: {}",
                    e, response_body
                ))
            })?;

        if let Some(reason) = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_ref())
        {
            return Err(ServiceError::Blocked(reason.clone()));
        }

        let candidate = parsed.candidates.into_iter().next().ok_or_else(|| {
            ServiceError::MalformedResponse("response contains no candidates".to_string())
        })?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
            .unwrap_or_default();

        if text.is_empty() {
            return match candidate.finish_reason {
                Some(reason) if reason == "SAFETY" => Err(ServiceError::Blocked(reason)),
                Some(reason) => Err(ServiceError::MalformedResponse(format!(
                    "candidate has no text (finish reason: {})",
                    reason
                ))),
                None => Err(ServiceError::MalformedResponse(
                    "candidate has no text".to_string(),
                )),
            };
        }

        tracing::debug!(
            response_len = text.len(),
            safety_ratings = candidate.safety_ratings.len(),
            "Successfully received response from Vertex AI"
        );

        Ok(Prediction {
            text,
            safety_ratings: candidate.safety_ratings,
            citation_metadata: candidate.citation_metadata,
        })
    }
}

#[async_trait]
impl ChatModel for VertexClient {
    async fn send_chat(&self, transcript: &[Message]) -> Result<Message, ServiceError> {
        if transcript.is_empty() {
            return Err(ServiceError::EmptyTranscript);
        }

        let contents = transcript
            .iter()
            .map(|message| RequestContent {
                role: wire_role(message.role).to_string(),
                parts: vec![RequestPart {
                    text: message.content.clone(),
                }],
            })
            .collect();

        let prediction = self
            .generate(contents, Some(SYSTEM_INSTRUCTION))
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error getting chat response"))?;
        Ok(Message::assistant(prediction.text))
    }
}

fn wire_role(role: MessageRole) -> &'static str {
    match role {
        MessageRole::User => "user",
        MessageRole::Assistant => "model",
    }
}

/// Builds Vertex AI clients from deployment configuration
#[derive(Debug, Clone)]
pub struct VertexProvider {
    project_id: String,
    region: String,
    settings: VertexSettings,
}

impl VertexProvider {
    /// Create a provider for a project and region
    pub fn new(project_id: String, region: String, settings: VertexSettings) -> Self {
        Self {
            project_id,
            region,
            settings,
        }
    }
}

impl ModelProvider for VertexProvider {
    fn connect(&self) -> Result<Arc<dyn ChatModel>, InitError> {
        let client =
            VertexClient::initialize(&self.project_id, &self.region, self.settings.clone())?;
        Ok(Arc::new(client))
    }
}
