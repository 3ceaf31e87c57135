use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::catalog::ModelInfo;
use crate::errors::ProviderError;
use crate::providers::{ChatPrompt, ChatProvider, DEFAULT_TIMEOUT_SECS, http_client, read_json};

/// Public OpenAI API base URL
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

/// Client for OpenAI-compatible chat completion APIs
///
/// Mistral and Alibaba Model Studio expose the same wire format, so the
/// client only differs by base URL and vendor label.
#[derive(Debug)]
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// API key sent as a bearer token
    api_key: String,
    /// Base URL, up to and including the version segment
    endpoint: String,
    /// Vendor label used in logs and errors
    vendor: String,
}

/// Chat completion request
#[derive(Debug, Serialize, Default)]
pub struct OpenAIRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<OpenAIMessage>,

    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// Chat message format
#[derive(Debug, Serialize, Deserialize)]
pub struct OpenAIMessage {
    /// Role of the message sender (system, assistant, user)
    pub role: String,

    /// Content of the message
    #[serde(default)]
    pub content: String,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
pub struct OpenAIResponse {
    /// Generated alternatives, the first one is used
    pub choices: Vec<OpenAIChoice>,
}

/// One generated alternative
#[derive(Debug, Deserialize)]
pub struct OpenAIChoice {
    pub message: OpenAIMessage,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
}

impl OpenAIRequest {
    /// Create a new chat completion request
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(OpenAIMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Build a request from a transport independent prompt
    pub fn from_prompt(prompt: ChatPrompt) -> Self {
        let mut request = prompt.messages.into_iter().fold(
            Self::new(prompt.model),
            |request, message| request.add_message(message.role, message.content),
        );
        request.max_tokens = prompt.max_tokens;
        request
    }
}

impl OpenAI {
    /// Create a new client for the given base URL (empty means OpenAI)
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self::with_timeout(api_key, endpoint, DEFAULT_TIMEOUT_SECS)
    }

    /// Create a new client with a request timeout
    pub fn with_timeout(api_key: impl Into<String>, endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: http_client(timeout_secs),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            vendor: "OpenAI".to_string(),
        }
    }

    /// Set the vendor label used in logs and errors
    pub fn vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = vendor.into();
        self
    }

    fn url(&self, path: &str) -> String {
        let base = if self.endpoint.is_empty() {
            DEFAULT_ENDPOINT
        } else {
            self.endpoint.trim_end_matches('/')
        };
        format!("{}{}", base, path)
    }

    /// Complete a chat request
    pub async fn complete(&self, request: OpenAIRequest) -> Result<OpenAIResponse, ProviderError> {
        let api_url = self.url("/chat/completions");
        debug!("Sending {} request to {} with model {}", self.vendor, api_url, request.model);

        let response = self.client.post(&api_url)
            .header("Content-Type", "application/json")
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        read_json(response, &self.vendor).await
    }

    /// Extract the text of the first choice
    pub fn extract_text(response: &OpenAIResponse) -> Option<String> {
        response.choices.first().map(|choice| choice.message.content.clone())
    }
}

#[async_trait]
impl ChatProvider for OpenAI {
    async fn chat(&self, prompt: ChatPrompt) -> Result<String, ProviderError> {
        let response = self.complete(OpenAIRequest::from_prompt(prompt)).await?;
        Self::extract_text(&response).ok_or_else(|| {
            ProviderError::ParseError(format!("{} response has no choices", self.vendor))
        })
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, ProviderError> {
        let response = self.client.get(self.url("/models"))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let list: ModelList = read_json(response, &self.vendor).await?;
        Ok(list.data.into_iter()
            .map(|model| {
                let display_name = model.display_name
                    .or(model.name)
                    .unwrap_or_else(|| model.id.clone());
                ModelInfo::new(model.id, display_name)
            })
            .collect())
    }
}
