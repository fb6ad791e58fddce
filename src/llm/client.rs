//! Hosted generative model client

use crate::config::ModelConfig;
use crate::error::{AtsError, Result};
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

/// Anything that turns a prompt into model output text.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;

    fn model_name(&self) -> &str;
}

/// API key resolved from the environment for a single analysis call.
#[derive(Clone)]
pub struct ApiCredential(String);

impl ApiCredential {
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(AtsError::MissingCredential("(empty key)".to_string()));
        }
        Ok(Self(key))
    }

    pub fn from_env(var: &str) -> Result<Self> {
        match std::env::var(var) {
            Ok(key) if !key.trim().is_empty() => Ok(Self(key)),
            _ => Err(AtsError::MissingCredential(var.to_string())),
        }
    }

    fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiCredential(<redacted>)")
    }
}

#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub model_name: String,
    pub endpoint: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl From<&ModelConfig> for GenerationSettings {
    fn from(config: &ModelConfig) -> Self {
        Self {
            model_name: config.model_name.clone(),
            endpoint: config.endpoint.clone(),
            max_output_tokens: config.max_output_tokens,
            temperature: config.temperature,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Client for the Generative Language `generateContent` endpoint, always
/// asking for a JSON response.
pub struct GeminiClient {
    client: Client,
    settings: GenerationSettings,
    credential: ApiCredential,
}

impl GeminiClient {
    pub fn new(settings: GenerationSettings, credential: ApiCredential) -> Self {
        Self {
            client: Client::new(),
            settings,
            credential,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.endpoint.trim_end_matches('/'),
            self.settings.model_name
        )
    }

    fn build_request(&self, prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                max_output_tokens: self.settings.max_output_tokens,
                temperature: self.settings.temperature,
            },
        }
    }

    fn response_text(response: GenerateContentResponse) -> Result<String> {
        let Some(candidate) = response.candidates.into_iter().next() else {
            let reason = response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "none given".to_string());
            return Err(AtsError::ModelInvocation(format!(
                "response contained no candidates (block reason: {})",
                reason
            )));
        };

        if let Some(reason) = &candidate.finish_reason {
            debug!("Model finish reason: {}", reason);
        }

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AtsError::ModelInvocation(format!(
                "candidate contained no text (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(text)
    }
}

impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let endpoint = self.endpoint();
        debug!(
            "Model request: endpoint={}, prompt_chars={}, max_output_tokens={}, temperature={}",
            endpoint,
            prompt.len(),
            self.settings.max_output_tokens,
            self.settings.temperature
        );

        let response = self
            .client
            .post(&endpoint)
            .header("x-goog-api-key", self.credential.expose())
            .json(&self.build_request(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(500).collect();
            error!("Model API error: status={}, body={}", status.as_u16(), excerpt);
            return Err(AtsError::ModelInvocation(format!(
                "API returned status {}: {}",
                status.as_u16(),
                excerpt
            )));
        }

        let payload: GenerateContentResponse = response.json().await?;
        Self::response_text(payload)
    }

    fn model_name(&self) -> &str {
        &self.settings.model_name
    }
}
