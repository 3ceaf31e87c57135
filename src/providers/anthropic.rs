use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::catalog::ModelInfo;
use crate::errors::ProviderError;
use crate::providers::{ChatPrompt, ChatProvider, DEFAULT_TIMEOUT_SECS, http_client, read_json};

/// Public Anthropic API host
pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com";

const API_VERSION: &str = "2023-06-01";

/// Anthropic client for interacting with Anthropic API
#[derive(Debug)]
pub struct Anthropic {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL (empty means the public API)
    endpoint: String,
}

/// Anthropic message request
#[derive(Debug, Serialize)]
pub struct AnthropicRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<AnthropicMessage>,

    /// System prompt to guide the AI
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,

    /// Maximum number of tokens to generate
    max_tokens: u32,
}

/// Anthropic message format
#[derive(Debug, Serialize, Deserialize)]
pub struct AnthropicMessage {
    /// Role of the message sender (user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

/// Anthropic response
#[derive(Debug, Deserialize)]
pub struct AnthropicResponse {
    /// The content of the response
    pub content: Vec<AnthropicContent>,
}

/// Individual content block in an Anthropic response
#[derive(Debug, Deserialize)]
pub struct AnthropicContent {
    /// The type of content
    #[serde(rename = "type")]
    pub content_type: String,

    /// The actual text content
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
    #[serde(default)]
    display_name: Option<String>,
}

impl Default for AnthropicRequest {
    fn default() -> Self {
        Self {
            model: String::new(),
            messages: Vec::new(),
            system: None,
            max_tokens: 1024,
        }
    }
}

impl AnthropicRequest {
    /// Create a new Anthropic request
    pub fn new(model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            max_tokens,
            ..Default::default()
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(AnthropicMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the system prompt, appending to an existing one
    pub fn system(mut self, system: impl Into<String>) -> Self {
        let system = system.into();
        self.system = Some(match self.system.take() {
            Some(existing) => format!("{}\n{}", existing, system),
            None => system,
        });
        self
    }

    /// Build a request from a transport independent prompt
    ///
    /// System messages move to the `system` field, which is the only place
    /// the messages API accepts them.
    pub fn from_prompt(prompt: ChatPrompt, default_max_tokens: u32) -> Self {
        let max_tokens = prompt.max_tokens.unwrap_or(default_max_tokens);
        prompt.messages.into_iter().fold(
            Self::new(prompt.model, max_tokens),
            |request, message| {
                if message.role == "system" {
                    request.system(message.content)
                } else {
                    request.add_message(message.role, message.content)
                }
            },
        )
    }
}

impl Anthropic {
    /// Create a new Anthropic client
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self::with_timeout(api_key, endpoint, DEFAULT_TIMEOUT_SECS)
    }

    /// Create a new Anthropic client with a request timeout
    pub fn with_timeout(api_key: impl Into<String>, endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: http_client(timeout_secs),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let base = if self.endpoint.is_empty() {
            DEFAULT_ENDPOINT
        } else {
            self.endpoint.trim_end_matches('/')
        };
        format!("{}{}", base, path)
    }

    /// Complete a messages request
    pub async fn complete(&self, request: AnthropicRequest) -> Result<AnthropicResponse, ProviderError> {
        let api_url = self.url("/v1/messages");
        debug!("Sending Anthropic request to {} with model {}", api_url, request.model);

        let response = self.client.post(&api_url)
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await?;

        read_json(response, "Anthropic").await
    }

    /// Extract text from Anthropic response
    pub fn extract_text(response: &AnthropicResponse) -> String {
        response.content.iter()
            .filter(|c| c.content_type == "text")
            .map(|c| c.text.as_str())
            .collect()
    }
}

#[async_trait]
impl ChatProvider for Anthropic {
    async fn chat(&self, prompt: ChatPrompt) -> Result<String, ProviderError> {
        let request = AnthropicRequest::from_prompt(prompt, 1024);
        let response = self.complete(request).await?;
        Ok(Self::extract_text(&response))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, ProviderError> {
        let response = self.client.get(self.url("/v1/models"))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .send()
            .await?;

        let list: ModelList = read_json(response, "Anthropic").await?;
        Ok(list.data.into_iter()
            .map(|model| {
                let display_name = model.display_name.unwrap_or_else(|| model.id.clone());
                ModelInfo::new(model.id, display_name)
            })
            .collect())
    }
}
