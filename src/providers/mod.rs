/*!
 * Chat transports for LLM based engines.
 *
 * This module contains client implementations for chat completion APIs:
 * - OpenAI: OpenAI-compatible `/chat/completions` endpoints (OpenAI, Mistral,
 *   Alibaba Model Studio)
 * - Anthropic: Anthropic messages API
 *
 * Engines only see the narrow `ChatProvider` trait, so tests can swap the
 * HTTP clients for fakes.
 */

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::catalog::ModelInfo;
use crate::errors::ProviderError;

/// Default request timeout for vendor calls
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// One message of a chat conversation
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    /// Role of the sender (system, assistant, user)
    pub role: String,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Transport independent chat completion request
#[derive(Debug, Clone, PartialEq)]
pub struct ChatPrompt {
    /// Model identifier
    pub model: String,
    /// Conversation, oldest message first
    pub messages: Vec<ChatMessage>,
    /// Upper bound for generated tokens, when the vendor needs one
    pub max_tokens: Option<u32>,
}

impl ChatPrompt {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            max_tokens: None,
        }
    }

    /// Add a message to the prompt
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage::new(role, content));
        self
    }

    /// Set the maximum number of tokens to generate
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Common trait for all chat transports
///
/// This trait defines the interface that LLM engines use to reach a model,
/// allowing vendor clients and test fakes to be used interchangeably.
#[async_trait]
pub trait ChatProvider: Send + Sync + Debug {
    /// Send one chat completion request and return the text of the reply
    ///
    /// # Arguments
    /// * `prompt` - The conversation to complete
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The reply text or an error
    async fn chat(&self, prompt: ChatPrompt) -> Result<String, ProviderError>;

    /// List the models the vendor account can use
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ProviderError>;
}

/// Build an HTTP client with the given timeout
pub fn http_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_default()
}

/// Check the status of a vendor response and decode its JSON body
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    vendor: &str,
) -> Result<T, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await
            .unwrap_or_else(|_| "Failed to get error response text".to_string());
        let message = if error_text.is_empty() {
            status.canonical_reason().unwrap_or("Unknown error").to_string()
        } else {
            error_text
        };
        error!("{} API error ({}): {}", vendor, status, message);
        return Err(ProviderError::from_status(status.as_u16(), message));
    }

    response.json::<T>().await
        .map_err(|e| ProviderError::ParseError(format!("{} response: {}", vendor, e)))
}

pub mod anthropic;
pub mod openai;
