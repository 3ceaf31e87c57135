/*!
 * Engines backed by a vendor REST API.
 *
 * `RestEngine` owns the configuration, the HTTP client and the contract
 * logic; a `RestVendor` descriptor supplies what differs per vendor: names,
 * endpoint, request shape and where the translation sits in the response.
 */

use std::fmt::Debug;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use crate::engines::{MtEngine, require_languages};
use crate::errors::EngineError;
use crate::match_record::{MatchRecord, TerminologyPair};
use crate::providers::{DEFAULT_TIMEOUT_SECS, http_client, read_json};
use crate::xml::{XmlElement, parse_element};

/// Which side of a language pair a lookup is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageSide {
    Source,
    Target,
}

/// How a vendor publishes its supported languages
pub enum LanguageLookup {
    /// Known without asking the vendor
    Static(Vec<String>),
    /// Fetched with this request, decoded by `RestVendor::extract_languages`
    Request(RequestBuilder),
}

/// Everything a descriptor needs to shape a request
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    pub client: &'a Client,
    pub endpoint: &'a str,
    pub api_key: &'a str,
    pub source_language: &'a str,
    pub target_language: &'a str,
    /// The text is an element's inner markup rather than plain text
    pub markup: bool,
}

/// Per-vendor strategy for `RestEngine`
pub trait RestVendor: Send + Sync + Debug {
    /// Human readable engine name
    fn name(&self) -> &'static str;

    /// Short engine name
    fn short_name(&self) -> &'static str;

    /// Base URL used when no endpoint override is configured
    fn default_endpoint(&self, api_key: &str) -> String;

    /// Whether the vendor translates markup natively
    fn handles_tags(&self) -> bool;

    /// Request that translates `text`
    fn translate_request(&self, ctx: &RequestContext<'_>, text: &str) -> RequestBuilder;

    /// Pull the translated text out of a decoded response
    fn extract_translation(&self, body: &Value) -> Result<String, EngineError>;

    /// Where the supported languages come from
    fn languages(&self, ctx: &RequestContext<'_>, side: LanguageSide) -> LanguageLookup;

    /// Decode the response of a `LanguageLookup::Request`
    fn extract_languages(&self, _side: LanguageSide, _body: &Value) -> Result<Vec<String>, EngineError> {
        Ok(Vec::new())
    }
}

/// String found at a JSON pointer, or a malformed response error
pub(crate) fn string_at(body: &Value, pointer: &str, vendor: &str) -> Result<String, EngineError> {
    body.pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| EngineError::MalformedResponse(format!("{} response has no {}", vendor, pointer)))
}

/// Generic engine for vendor REST APIs
#[derive(Debug)]
pub struct RestEngine<V: RestVendor> {
    vendor: V,
    client: Client,
    api_key: String,
    endpoint: String,
    source_language: String,
    target_language: String,
}

impl<V: RestVendor> RestEngine<V> {
    /// Create an engine for the vendor's public endpoint
    pub fn new(vendor: V, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        let endpoint = vendor.default_endpoint(&api_key);
        Self {
            vendor,
            client: http_client(DEFAULT_TIMEOUT_SECS),
            api_key,
            endpoint,
            source_language: String::new(),
            target_language: String::new(),
        }
    }

    /// Send requests to another base URL (gateways, tests)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.client = http_client(timeout_secs);
        self
    }

    pub fn vendor(&self) -> &V {
        &self.vendor
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn context(&self) -> RequestContext<'_> {
        self.context_for(false)
    }

    fn context_for(&self, markup: bool) -> RequestContext<'_> {
        RequestContext {
            client: &self.client,
            endpoint: &self.endpoint,
            api_key: &self.api_key,
            source_language: &self.source_language,
            target_language: &self.target_language,
            markup,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, EngineError> {
        let response = request.send().await.map_err(crate::errors::ProviderError::from)?;
        Ok(read_json(response, self.vendor.short_name()).await?)
    }

    async fn languages(&self, side: LanguageSide) -> Result<Vec<String>, EngineError> {
        match self.vendor.languages(&self.context(), side) {
            LanguageLookup::Static(languages) => Ok(languages),
            LanguageLookup::Request(request) => {
                let body = self.send(request).await?;
                self.vendor.extract_languages(side, &body)
            }
        }
    }

    async fn request_translation(&self, text: &str, markup: bool) -> Result<String, EngineError> {
        require_languages(self)?;
        debug!(
            "{} translating {} chars from {} to {}",
            self.vendor.short_name(), text.len(), self.source_language, self.target_language
        );
        let request = self.vendor.translate_request(&self.context_for(markup), text);
        let body = self.send(request).await?;
        self.vendor.extract_translation(&body)
    }
}

#[async_trait]
impl<V: RestVendor> MtEngine for RestEngine<V> {
    fn name(&self) -> &str {
        self.vendor.name()
    }

    fn short_name(&self) -> &str {
        self.vendor.short_name()
    }

    async fn source_languages(&self) -> Result<Vec<String>, EngineError> {
        self.languages(LanguageSide::Source).await
    }

    async fn target_languages(&self) -> Result<Vec<String>, EngineError> {
        self.languages(LanguageSide::Target).await
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
        self.request_translation(text, false).await
    }

    async fn get_mt_match(
        &self,
        source: &XmlElement,
        _terms: &[TerminologyPair],
    ) -> Result<MatchRecord, EngineError> {
        let target = if self.vendor.handles_tags() {
            let translation = self.request_translation(&source.inner_xml(), true).await?;
            let mut target = parse_element(&format!("<target>{}</target>", translation))?;
            target.copy_space_from(source);
            target
        } else {
            let translation = self.request_translation(&source.text(), false).await?;
            let mut target = XmlElement::new("target");
            target.add_text(&translation);
            target
        };
        Ok(MatchRecord::new(source.clone(), target, self.vendor.short_name()))
    }

    fn handles_tags(&self) -> bool {
        self.vendor.handles_tags()
    }
}
