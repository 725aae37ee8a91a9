//! LLM-call collaborator.
//!
//! Provides a trait-based abstraction over the chat model so agents can
//! be exercised against stubs in tests, plus the Mistral chat-completions
//! client used in production. Each agent performs exactly one `invoke`
//! per analysis; retry policy, if any, belongs here and not in the
//! agents (currently: no retries).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Error from a chat model call.
///
/// Agents convert every variant into a `Failure` result; none of these
/// ever crosses the agent boundary as a raised error.
#[derive(Debug, Error)]
pub enum CallError {
    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("cannot connect to API at {0}")]
    Connect(String),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("request failed: {0}")]
    Request(String),
}

/// Configuration for the chat model client.
///
/// The API key is threaded in explicitly at construction time; nothing
/// in the agent logic reads the process environment.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<usize>,
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.mistral.ai".to_string(),
            api_key: String::new(),
            model: "mistral-large-latest".to_string(),
            temperature: 0.2,
            max_tokens: None,
            timeout_seconds: 120,
        }
    }
}

/// A chat model that answers one prompt under fixed instructions.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Issue a single call and return the assistant's text.
    async fn invoke(&self, instructions: &str, prompt: &str) -> Result<String, CallError>;

    /// Model name, for report metadata.
    fn model_name(&self) -> &str;
}

/// Chat API request body (Mistral chat completions).
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Chat API response body.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Mistral chat-completions client.
pub struct MistralClient {
    config: LlmConfig,
    http_client: reqwest::Client,
}

impl MistralClient {
    pub fn new(config: LlmConfig) -> Result<Self, CallError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| CallError::Request(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }
}

#[async_trait]
impl ChatModel for MistralClient {
    async fn invoke(&self, instructions: &str, prompt: &str) -> Result<String, CallError> {
        let url = format!("{}/v1/chat/completions", self.config.api_url);

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: instructions.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        debug!("Sending chat request ({} prompt chars)", prompt.len());

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CallError::Timeout(self.config.timeout_seconds)
                } else if e.is_connect() {
                    CallError::Connect(self.config.api_url.clone())
                } else {
                    CallError::Request(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CallError::Api { status, body });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| CallError::MalformedResponse(e.to_string()))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| CallError::MalformedResponse("response contained no choices".into()))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
