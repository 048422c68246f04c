use std::time::Duration;

use async_trait::async_trait;
use revline_core::{LlmConfig, RevlineError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::retry::{retry_transient, RetryPolicy};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// A message in a chat conversation with the LLM.
///
/// # Examples
///
/// ```
/// use revline_review::llm::{ChatMessage, Role};
///
/// let msg = ChatMessage::user("Review this code");
/// assert!(matches!(msg.role, Role::User));
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// Role of the message sender.
    pub role: Role,
    /// Text content of the message.
    pub content: String,
}

impl ChatMessage {
    /// A user-role message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Role in the chat conversation.
///
/// # Examples
///
/// ```
/// use revline_review::llm::Role;
///
/// let role = Role::System;
/// assert_eq!(serde_json::to_string(&role).unwrap(), "\"system\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System-level instructions.
    System,
    /// User input.
    User,
    /// Assistant response.
    Assistant,
}

/// Anything that turns a list of chat messages into one text completion.
///
/// [`LlmClient`] talks to a real endpoint; tests plug in canned responses.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Send `messages` and return the text of the first choice.
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, RevlineError>;

    /// Model identifier, for logs and summaries.
    fn model(&self) -> &str;
}

/// OpenAI-compatible chat completions client.
///
/// Works with any provider that exposes the `/v1/chat/completions` endpoint:
/// OpenAI, Ollama, vLLM, LiteLLM, etc. The API key travels inside the
/// [`LlmConfig`] the client is built from; nothing is read from global state.
///
/// # Examples
///
/// ```
/// use revline_core::LlmConfig;
/// use revline_review::llm::LlmClient;
///
/// let config = LlmConfig {
///     api_key: Some("test-key".into()),
///     ..LlmConfig::default()
/// };
/// let client = LlmClient::new(&config).unwrap();
/// assert_eq!(client.endpoint(), "https://api.openai.com/v1/chat/completions");
/// ```
pub struct LlmClient {
    client: reqwest::Client,
    config: LlmConfig,
    retry: RetryPolicy,
}

impl LlmClient {
    /// Create a new LLM client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RevlineError::Llm`] if the HTTP client cannot be built.
    pub fn new(config: &LlmConfig) -> Result<Self, RevlineError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RevlineError::llm(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            config: config.clone(),
            retry: RetryPolicy::new(config.max_retries),
        })
    }

    /// Replace the retry policy derived from the configuration.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Full URL of the chat completions endpoint.
    pub fn endpoint(&self) -> String {
        let base_url = self
            .config
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/');
        format!("{base_url}/v1/chat/completions")
    }

    /// Send a single chat completion request and return the text response.
    ///
    /// # Errors
    ///
    /// Returns [`RevlineError::Llm`] on transport errors, non-success HTTP
    /// statuses or unexpected response bodies. Transport errors, 429 and 5xx
    /// responses are marked transient.
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String, RevlineError> {
        let url = self.endpoint();

        let mut body = serde_json::json!({
            "model": self.config.model,
            "messages": messages,
        });
        if let Some(temperature) = self.config.temperature {
            body["temperature"] = serde_json::json!(temperature);
        }

        let mut request = self.client.post(&url);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        debug!(%url, model = %self.config.model, "sending chat completion request");
        let response = request
            .json(&body)
            .send()
            .await
            .map_err(|e| RevlineError::llm_transient(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            let message = format!("LLM API error {status}: {body_text}");
            return Err(if status.as_u16() == 429 || status.is_server_error() {
                RevlineError::llm_transient(message)
            } else {
                RevlineError::llm(message)
            });
        }

        let response_body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RevlineError::llm(format!("failed to parse response: {e}")))?;

        let content = response_body
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| {
                RevlineError::llm(format!("unexpected response structure: {response_body}"))
            })?;

        Ok(content.to_string())
    }
}

#[async_trait]
impl ChatCompletion for LlmClient {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, RevlineError> {
        let messages = &messages;
        retry_transient(&self.retry, move || self.chat(messages)).await
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
