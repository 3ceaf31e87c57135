/*!
 * Engines backed by a chat model.
 *
 * `LlmEngine` turns contract calls into prompts, sends them through a
 * `ChatProvider` and normalizes the reply. What differs between vendors
 * (names, default model, where the role text goes, capabilities) lives in an
 * `LlmProfile`.
 */

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use crate::catalog::{LanguageCatalog, ModelCatalog, ModelInfo};
use crate::engines::{MtEngine, require_languages};
use crate::errors::EngineError;
use crate::match_record::{MatchRecord, TerminologyPair};
use crate::normalizer::{normalize_element, normalize_translation};
use crate::prompts::PromptBuilder;
use crate::providers::anthropic::Anthropic;
use crate::providers::openai::OpenAI;
use crate::providers::{ChatPrompt, ChatProvider, DEFAULT_TIMEOUT_SECS};
use crate::xml::XmlElement;

/// Mistral chat completions base URL
pub const MISTRAL_ENDPOINT: &str = "https://api.mistral.ai/v1";

/// How to reach a chat vendor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatConnection<'a> {
    pub api_key: &'a str,
    /// Base URL override, empty for the vendor's public endpoint
    pub endpoint: &'a str,
    pub timeout_secs: u64,
}

impl<'a> ChatConnection<'a> {
    pub fn new(api_key: &'a str) -> Self {
        Self {
            api_key,
            endpoint: "",
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_endpoint(mut self, endpoint: &'a str) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    fn endpoint_or<'b>(&'b self, default: &'b str) -> &'b str {
        if self.endpoint.is_empty() { default } else { self.endpoint }
    }

    fn openai(&self, default_endpoint: &str, vendor: &str) -> OpenAI {
        OpenAI::with_timeout(self.api_key, self.endpoint_or(default_endpoint), self.timeout_secs).vendor(vendor)
    }
}

/// Where the role description is placed in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolePlacement {
    /// A system message ahead of the prompt
    System,
    /// An assistant message ahead of the prompt
    Assistant,
    /// Prepended to the user prompt
    Inline,
    /// A fixed system message that does not name the languages
    FixedSystem(&'static str),
}

/// Vendor specific settings of an `LlmEngine`
#[derive(Debug, Clone, PartialEq)]
pub struct LlmProfile {
    pub name: &'static str,
    pub short_name: &'static str,
    /// Model used until `set_model` is called
    pub default_model: Option<&'static str>,
    pub role_placement: RolePlacement,
    /// Whether `get_mt_match` sends markup instead of plain text
    pub handles_tags: bool,
    /// Whether `fix_match` and `fix_tags` are offered
    pub fixes: bool,
    /// Token limit sent with each request, for vendors that require one
    pub max_tokens: Option<u32>,
}

impl LlmProfile {
    pub fn chatgpt() -> Self {
        Self {
            name: "ChatGPT API",
            short_name: "ChatGPT",
            default_model: Some("gpt-3.5-turbo"),
            role_placement: RolePlacement::FixedSystem("You are a professional translator"),
            handles_tags: false,
            fixes: false,
            max_tokens: None,
        }
    }

    pub fn anthropic() -> Self {
        Self {
            name: "Anthropic Claude",
            short_name: "Anthropic",
            default_model: Some("claude-3-5-sonnet-20241022"),
            role_placement: RolePlacement::Inline,
            handles_tags: true,
            fixes: true,
            max_tokens: Some(1024),
        }
    }

    pub fn alibaba() -> Self {
        Self {
            name: "Alibaba Translator",
            short_name: "Alibaba",
            default_model: None,
            role_placement: RolePlacement::Assistant,
            handles_tags: true,
            fixes: true,
            max_tokens: None,
        }
    }

    pub fn mistral() -> Self {
        Self {
            name: "Mistral AI",
            short_name: "Mistral",
            default_model: None,
            role_placement: RolePlacement::System,
            handles_tags: true,
            fixes: true,
            max_tokens: None,
        }
    }
}

/// Machine translation through a chat model
#[derive(Debug)]
pub struct LlmEngine {
    profile: LlmProfile,
    provider: Arc<dyn ChatProvider>,
    model: Option<String>,
    languages: LanguageCatalog,
    /// Models known without asking the vendor
    models: Vec<ModelInfo>,
    /// Whether `available_models` asks the vendor instead of using `models`
    remote_models: bool,
    source_language: String,
    target_language: String,
}

impl LlmEngine {
    /// Create an engine for a profile on top of any chat transport
    pub fn new(profile: LlmProfile, provider: Arc<dyn ChatProvider>) -> Self {
        Self {
            model: profile.default_model.map(str::to_string),
            profile,
            provider,
            languages: LanguageCatalog::default(),
            models: Vec::new(),
            remote_models: false,
            source_language: String::new(),
            target_language: String::new(),
        }
    }

    /// ChatGPT through the public OpenAI API
    pub fn chatgpt(api_key: &str, model: Option<&str>) -> Self {
        Self::chatgpt_over(ChatConnection::new(api_key), model)
    }

    pub fn chatgpt_over(connection: ChatConnection<'_>, model: Option<&str>) -> Self {
        Self::new(LlmProfile::chatgpt(), Arc::new(connection.openai("", "ChatGPT")))
            .with_models(ModelCatalog::default().chatgpt)
            .with_optional_model(model)
    }

    /// Claude through the public Anthropic API
    pub fn anthropic(api_key: &str, model: Option<&str>) -> Self {
        Self::anthropic_over(ChatConnection::new(api_key), model)
    }

    pub fn anthropic_over(connection: ChatConnection<'_>, model: Option<&str>) -> Self {
        let provider = Anthropic::with_timeout(connection.api_key, connection.endpoint, connection.timeout_secs);
        Self::new(LlmProfile::anthropic(), Arc::new(provider))
            .with_models(ModelCatalog::default().anthropic)
            .with_remote_models()
            .with_optional_model(model)
    }

    /// Qwen MT models through an Alibaba Model Studio region
    pub fn alibaba(api_key: &str, region: &str, model: Option<&str>) -> Result<Self, EngineError> {
        Self::alibaba_with_catalog(api_key, region, model, &ModelCatalog::default())
    }

    /// Like `alibaba`, with region data taken from `catalog`
    pub fn alibaba_with_catalog(
        api_key: &str,
        region: &str,
        model: Option<&str>,
        catalog: &ModelCatalog,
    ) -> Result<Self, EngineError> {
        Self::alibaba_over(ChatConnection::new(api_key), region, model, catalog)
    }

    /// Alibaba engine; an endpoint on the connection replaces the region's base URL
    pub fn alibaba_over(
        connection: ChatConnection<'_>,
        region: &str,
        model: Option<&str>,
        catalog: &ModelCatalog,
    ) -> Result<Self, EngineError> {
        let info = catalog.alibaba_region(region)
            .ok_or_else(|| EngineError::InvalidState(format!("Unknown Alibaba region: {}", region)))?;
        let models = catalog.alibaba_models(region).unwrap_or_default();
        let provider = connection.openai(info.base_url.as_str(), "Alibaba");
        Ok(Self::new(LlmProfile::alibaba(), Arc::new(provider))
            .with_models(models)
            .with_optional_model(model))
    }

    /// Mistral through the public Mistral API
    pub fn mistral(api_key: &str, model: Option<&str>) -> Self {
        Self::mistral_over(ChatConnection::new(api_key), model)
    }

    pub fn mistral_over(connection: ChatConnection<'_>, model: Option<&str>) -> Self {
        Self::new(LlmProfile::mistral(), Arc::new(connection.openai(MISTRAL_ENDPOINT, "Mistral")))
            .with_remote_models()
            .with_optional_model(model)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    fn with_optional_model(self, model: Option<&str>) -> Self {
        match model {
            Some(model) => self.with_model(model),
            None => self,
        }
    }

    /// Replace the list of languages offered as source and target
    pub fn with_languages(mut self, languages: LanguageCatalog) -> Self {
        self.languages = languages;
        self
    }

    /// Replace the static model list
    pub fn with_models(mut self, models: Vec<ModelInfo>) -> Self {
        self.models = models;
        self
    }

    /// Ask the vendor for models in `available_models`
    pub fn with_remote_models(mut self) -> Self {
        self.remote_models = true;
        self
    }

    pub fn profile(&self) -> &LlmProfile {
        &self.profile
    }

    pub fn set_model(&mut self, model: &str) {
        self.model = Some(model.to_string());
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Models known without a network call
    pub fn models(&self) -> &[ModelInfo] {
        &self.models
    }

    /// Models the account can use, from the vendor when it publishes them
    pub async fn available_models(&self) -> Result<Vec<ModelInfo>, EngineError> {
        if self.remote_models {
            Ok(self.provider.list_models().await?)
        } else {
            Ok(self.models.clone())
        }
    }

    /// Check the configuration and build prompts for the current pair
    fn prepare(&self) -> Result<(&str, PromptBuilder), EngineError> {
        let model = self.model.as_deref()
            .filter(|model| !model.is_empty())
            .ok_or_else(|| EngineError::InvalidState("Model is not set".to_string()))?;
        require_languages(self)?;
        Ok((model, PromptBuilder::new(&self.source_language, &self.target_language)))
    }

    fn chat_prompt(&self, model: &str, builder: &PromptBuilder, prompt: String) -> ChatPrompt {
        let role = builder.role();
        let chat = ChatPrompt::new(model);
        let chat = match self.profile.role_placement {
            RolePlacement::System => chat.add_message("system", role).add_message("user", prompt),
            RolePlacement::Assistant => chat.add_message("assistant", role).add_message("user", prompt),
            RolePlacement::Inline => chat.add_message("user", format!("{} {}", role, prompt)),
            RolePlacement::FixedSystem(text) => chat.add_message("system", text).add_message("user", prompt),
        };
        match self.profile.max_tokens {
            Some(max_tokens) => chat.max_tokens(max_tokens),
            None => chat,
        }
    }

    async fn send(&self, model: &str, builder: &PromptBuilder, prompt: String) -> Result<String, EngineError> {
        debug!(
            "{} request with model {}, prompt of {} chars",
            self.profile.short_name, model, prompt.len()
        );
        let chat = self.chat_prompt(model, builder, prompt);
        Ok(self.provider.chat(chat).await?)
    }

    fn require_fixes(&self, operation: &str) -> Result<(), EngineError> {
        if self.profile.fixes {
            Ok(())
        } else {
            Err(EngineError::NotImplemented(format!("{} cannot {}", self.profile.name, operation)))
        }
    }
}

#[async_trait]
impl MtEngine for LlmEngine {
    fn name(&self) -> &str {
        self.profile.name
    }

    fn short_name(&self) -> &str {
        self.profile.short_name
    }

    async fn source_languages(&self) -> Result<Vec<String>, EngineError> {
        Ok(self.languages.codes().to_vec())
    }

    async fn target_languages(&self) -> Result<Vec<String>, EngineError> {
        Ok(self.languages.codes().to_vec())
    }

    fn set_source_language(&mut self, language: &str) {
        self.source_language = language.to_string();
    }

    fn source_language(&self) -> &str {
        &self.source_language
    }

    fn set_target_language(&mut self, language: &str) {
        self.target_language = language.to_string();
    }

    fn target_language(&self) -> &str {
        &self.target_language
    }

    async fn translate(&self, text: &str) -> Result<String, EngineError> {
        let (model, builder) = self.prepare()?;
        let prompt = builder.translate(text);
        let raw = self.send(model, &builder, prompt).await?;
        Ok(normalize_translation(&raw, text))
    }

    async fn get_mt_match(
        &self,
        source: &XmlElement,
        terms: &[TerminologyPair],
    ) -> Result<MatchRecord, EngineError> {
        if !self.profile.handles_tags {
            let translation = self.translate(&source.text()).await?;
            let mut target = XmlElement::new("target");
            target.add_text(&translation);
            return Ok(MatchRecord::new(source.clone(), target, self.profile.short_name));
        }

        let (model, builder) = self.prepare()?;
        let prompt = builder.generate_match(source, terms);
        let raw = self.send(model, &builder, prompt).await?;
        let mut target = normalize_element(&raw)?;
        target.copy_space_from(source);
        Ok(MatchRecord::new(source.clone(), target, self.profile.short_name))
    }

    fn handles_tags(&self) -> bool {
        self.profile.handles_tags
    }

    fn fixes_matches(&self) -> bool {
        self.profile.fixes
    }

    async fn fix_match(
        &self,
        original_source: &XmlElement,
        match_source: &XmlElement,
        match_target: &XmlElement,
    ) -> Result<MatchRecord, EngineError> {
        self.require_fixes("fix matches")?;
        let (model, builder) = self.prepare()?;
        let prompt = builder.fix_match(original_source, match_source, match_target);
        let raw = self.send(model, &builder, prompt).await?;
        let mut target = normalize_element(&raw)?;
        target.copy_space_from(original_source);
        Ok(MatchRecord::new(original_source.clone(), target, self.profile.short_name))
    }

    fn fixes_tags(&self) -> bool {
        self.profile.fixes
    }

    async fn fix_tags(&self, source: &XmlElement, target: &XmlElement) -> Result<XmlElement, EngineError> {
        self.require_fixes("fix tags")?;
        let (model, builder) = self.prepare()?;
        let prompt = builder.fix_tags(source, target);
        let raw = self.send(model, &builder, prompt).await?;
        let mut fixed = normalize_element(&raw)?;
        fixed.copy_space_from(source);
        Ok(fixed)
    }
}
