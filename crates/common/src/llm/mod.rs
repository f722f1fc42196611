//! Chat completion client
//!
//! Provides:
//! - The [`CompletionProvider`] seam used by the summarizer and analyzer
//! - A client for Mistral's OpenAI-compatible `/chat/completions` endpoint
//!
//! Callers own the fallback policy: `complete` reports every failure as an
//! error and leaves substitution to the component that knows its fallback.

use crate::config::CompletionConfig;
use crate::errors::{AppError, Result};
use crate::metrics;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Chat message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// One completion call
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Caller name for logs and metrics (e.g. "summary")
    pub kind: &'static str,

    /// Ordered conversation
    pub messages: Vec<ChatMessage>,

    /// Maximum output tokens
    pub max_tokens: u32,

    /// Temperature (0.0 - 1.0)
    pub temperature: f32,
}

/// Trait for text completion providers
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Run one completion and return the generated text
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;

    /// Get the model name
    fn model_name(&self) -> &str;
}

/// Mistral chat completion client
pub struct MistralChatClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    endpoint: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: String,
}

impl MistralChatClient {
    /// Create a new client from configuration
    pub fn new(config: &CompletionConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            model: config.model.clone(),
            endpoint: format!("{}/chat/completions", config.api_base()),
        })
    }

    async fn call(&self, api_key: &str, request: &CompletionRequest) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Completion {
                message: format!("Request failed: {}", e),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Completion {
                message: format!("API error {}: {}", status, body),
            });
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| AppError::Completion {
            message: format!("Failed to parse response: {}", e),
        })?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AppError::Completion {
                message: "Empty response from LLM".to_string(),
            })
    }
}

#[async_trait]
impl CompletionProvider for MistralChatClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::MissingCredential {
                provider: "completion".to_string(),
                variable: "MISTRAL_API_KEY".to_string(),
            })?;

        let result = self.call(api_key, request).await;
        metrics::record_completion(request.kind, result.is_ok());
        result
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
