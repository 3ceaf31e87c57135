use reqwest::RequestBuilder;
use serde_json::{Value, json};

use crate::engines::rest::{LanguageLookup, LanguageSide, RequestContext, RestVendor, string_at};
use crate::errors::EngineError;

/// Global Azure Translator endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.cognitive.microsofttranslator.com";

const API_VERSION: &str = "3.0";

/// Azure Translator Text descriptor
///
/// Regional (non global) resources must send their region with every call.
#[derive(Debug, Clone, Default)]
pub struct Azure {
    region: Option<String>,
}

impl Azure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptor for a resource bound to an Azure region
    pub fn with_region(region: impl Into<String>) -> Self {
        Self { region: Some(region.into()) }
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }
}

impl RestVendor for Azure {
    fn name(&self) -> &'static str {
        "Azure Translator Text"
    }

    fn short_name(&self) -> &'static str {
        "Azure"
    }

    fn default_endpoint(&self, _api_key: &str) -> String {
        DEFAULT_ENDPOINT.to_string()
    }

    fn handles_tags(&self) -> bool {
        false
    }

    fn translate_request(&self, ctx: &RequestContext<'_>, text: &str) -> RequestBuilder {
        let mut request = ctx.client
            .post(format!("{}/translate", ctx.endpoint))
            .query(&[
                ("api-version", API_VERSION),
                ("from", ctx.source_language),
                ("to", ctx.target_language),
            ])
            .header("Ocp-Apim-Subscription-Key", ctx.api_key)
            .json(&json!([{ "Text": text }]));
        if let Some(region) = &self.region {
            request = request.header("Ocp-Apim-Subscription-Region", region.as_str());
        }
        request
    }

    fn extract_translation(&self, body: &Value) -> Result<String, EngineError> {
        string_at(body, "/0/translations/0/text", self.short_name())
    }

    fn languages(&self, ctx: &RequestContext<'_>, _side: LanguageSide) -> LanguageLookup {
        LanguageLookup::Request(
            ctx.client
                .get(format!("{}/languages", ctx.endpoint))
                .query(&[("api-version", API_VERSION), ("scope", "translation")]),
        )
    }

    fn extract_languages(&self, _side: LanguageSide, body: &Value) -> Result<Vec<String>, EngineError> {
        body.get("translation")
            .and_then(Value::as_object)
            .map(|languages| languages.keys().cloned().collect())
            .ok_or_else(|| EngineError::MalformedResponse("Azure languages have no translation scope".to_string()))
    }
}
