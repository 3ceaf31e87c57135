use reqwest::RequestBuilder;
use serde_json::{Value, json};

use crate::engines::rest::{LanguageLookup, LanguageSide, RequestContext, RestVendor, string_at};
use crate::errors::{EngineError, ProviderError};

/// ModernMT API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.modernmt.com";

/// ModernMT descriptor
///
/// ModernMT wraps every answer in an envelope with its own `status`; a
/// non-200 status is an error even when HTTP succeeded.
#[derive(Debug, Clone, Default)]
pub struct ModernMT;

impl ModernMT {
    pub fn new() -> Self {
        Self
    }
}

/// Payload of a successful envelope
fn envelope_data(body: &Value) -> Result<&Value, EngineError> {
    let status = body.get("status").and_then(Value::as_u64).unwrap_or(0);
    if status != 200 {
        let message = body
            .pointer("/error/message")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error")
            .to_string();
        return Err(ProviderError::from_status(status as u16, message).into());
    }
    body.get("data")
        .ok_or_else(|| EngineError::MalformedResponse("ModernMT response has no data".to_string()))
}

impl RestVendor for ModernMT {
    fn name(&self) -> &'static str {
        "ModernMT"
    }

    fn short_name(&self) -> &'static str {
        "ModernMT"
    }

    fn default_endpoint(&self, _api_key: &str) -> String {
        DEFAULT_ENDPOINT.to_string()
    }

    fn handles_tags(&self) -> bool {
        true
    }

    fn translate_request(&self, ctx: &RequestContext<'_>, text: &str) -> RequestBuilder {
        ctx.client
            .post(format!("{}/translate", ctx.endpoint))
            .header("MMT-ApiKey", ctx.api_key)
            .header("X-HTTP-Method-Override", "GET")
            .json(&json!({
                "source": ctx.source_language,
                "target": ctx.target_language,
                "q": text,
            }))
    }

    fn extract_translation(&self, body: &Value) -> Result<String, EngineError> {
        let data = envelope_data(body)?;
        string_at(data, "/translation", self.short_name())
    }

    fn languages(&self, ctx: &RequestContext<'_>, _side: LanguageSide) -> LanguageLookup {
        LanguageLookup::Request(ctx.client.get(format!("{}/translate/languages", ctx.endpoint)))
    }

    fn extract_languages(&self, _side: LanguageSide, body: &Value) -> Result<Vec<String>, EngineError> {
        let data = envelope_data(body)?;
        let mut languages: Vec<String> = data
            .as_array()
            .ok_or_else(|| EngineError::MalformedResponse("ModernMT languages are not a list".to_string()))?
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
        languages.sort();
        Ok(languages)
    }
}
