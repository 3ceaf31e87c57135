use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use reqwest::RequestBuilder;
use serde_json::Value;

use crate::engines::rest::{LanguageLookup, LanguageSide, RequestContext, RestVendor, string_at};
use crate::errors::EngineError;

/// Google Cloud Translation v2 endpoint
pub const DEFAULT_ENDPOINT: &str = "https://translation.googleapis.com/language/translate/v2";

static NUMERIC_ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&#(\d+);").expect("valid numeric entity pattern")
});

/// Google Cloud Translation descriptor
#[derive(Debug, Clone)]
pub struct Google {
    neural: bool,
}

impl Google {
    /// Descriptor using the neural (`nmt`) or phrase based (`base`) model
    pub fn new(neural: bool) -> Self {
        Self { neural }
    }

    fn model(&self) -> &'static str {
        if self.neural { "nmt" } else { "base" }
    }
}

impl Default for Google {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Replace decimal character references such as `&#39;` with their characters
pub fn decode_numeric_entities(text: &str) -> String {
    NUMERIC_ENTITY
        .replace_all(text, |caps: &Captures<'_>| {
            caps[1]
                .parse::<u32>()
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

impl RestVendor for Google {
    fn name(&self) -> &'static str {
        "Google Cloud Translation"
    }

    fn short_name(&self) -> &'static str {
        "Google"
    }

    fn default_endpoint(&self, _api_key: &str) -> String {
        DEFAULT_ENDPOINT.to_string()
    }

    fn handles_tags(&self) -> bool {
        false
    }

    fn translate_request(&self, ctx: &RequestContext<'_>, text: &str) -> RequestBuilder {
        ctx.client.get(ctx.endpoint).query(&[
            ("key", ctx.api_key),
            ("q", text),
            ("source", ctx.source_language),
            ("target", ctx.target_language),
            ("model", self.model()),
            ("format", "text"),
        ])
    }

    fn extract_translation(&self, body: &Value) -> Result<String, EngineError> {
        let translation = string_at(body, "/data/translations/0/translatedText", self.short_name())?;
        Ok(decode_numeric_entities(&translation))
    }

    fn languages(&self, ctx: &RequestContext<'_>, _side: LanguageSide) -> LanguageLookup {
        LanguageLookup::Request(
            ctx.client
                .get(format!("{}/languages", ctx.endpoint))
                .query(&[("key", ctx.api_key), ("model", self.model())]),
        )
    }

    fn extract_languages(&self, _side: LanguageSide, body: &Value) -> Result<Vec<String>, EngineError> {
        let languages = body
            .pointer("/data/languages")
            .and_then(Value::as_array)
            .ok_or_else(|| EngineError::MalformedResponse("Google languages response has no data".to_string()))?;
        Ok(languages
            .iter()
            .filter_map(|entry| entry.get("language").and_then(Value::as_str))
            .map(str::to_string)
            .collect())
    }
}
