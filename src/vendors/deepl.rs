use reqwest::RequestBuilder;
use serde_json::{Value, json};

use crate::engines::rest::{LanguageLookup, LanguageSide, RequestContext, RestVendor, string_at};
use crate::errors::EngineError;

/// DeepL Pro endpoint
pub const PRO_ENDPOINT: &str = "https://api.deepl.com";
/// DeepL Free endpoint, used by keys ending in ":fx"
pub const FREE_ENDPOINT: &str = "https://api-free.deepl.com";

/// DeepL API descriptor
///
/// Markup from matches is sent with XML tag handling so inline elements come
/// back in place; plain text goes without it.
#[derive(Debug, Clone, Default)]
pub struct DeepL;

impl DeepL {
    pub fn new() -> Self {
        Self
    }
}

impl RestVendor for DeepL {
    fn name(&self) -> &'static str {
        "DeepL API"
    }

    fn short_name(&self) -> &'static str {
        "DeepL"
    }

    fn default_endpoint(&self, api_key: &str) -> String {
        if api_key.ends_with(":fx") {
            FREE_ENDPOINT.to_string()
        } else {
            PRO_ENDPOINT.to_string()
        }
    }

    fn handles_tags(&self) -> bool {
        true
    }

    fn translate_request(&self, ctx: &RequestContext<'_>, text: &str) -> RequestBuilder {
        let mut body = json!({
            "text": [text],
            "source_lang": ctx.source_language,
            "target_lang": ctx.target_language,
        });
        if ctx.markup {
            body["tag_handling"] = json!("xml");
        }
        ctx.client
            .post(format!("{}/v2/translate", ctx.endpoint))
            .header("Authorization", format!("DeepL-Auth-Key {}", ctx.api_key))
            .json(&body)
    }

    fn extract_translation(&self, body: &Value) -> Result<String, EngineError> {
        string_at(body, "/translations/0/text", self.short_name())
    }

    fn languages(&self, ctx: &RequestContext<'_>, side: LanguageSide) -> LanguageLookup {
        let kind = match side {
            LanguageSide::Source => "source",
            LanguageSide::Target => "target",
        };
        LanguageLookup::Request(
            ctx.client
                .get(format!("{}/v2/languages", ctx.endpoint))
                .query(&[("type", kind)])
                .header("Authorization", format!("DeepL-Auth-Key {}", ctx.api_key)),
        )
    }

    fn extract_languages(&self, _side: LanguageSide, body: &Value) -> Result<Vec<String>, EngineError> {
        let languages = body
            .as_array()
            .ok_or_else(|| EngineError::MalformedResponse("DeepL languages response is not a list".to_string()))?;
        Ok(languages
            .iter()
            .filter_map(|entry| entry.get("language").and_then(Value::as_str))
            .map(str::to_string)
            .collect())
    }
}
