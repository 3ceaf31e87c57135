use reqwest::RequestBuilder;
use serde_json::{Value, json};

use crate::catalog::DirectionTable;
use crate::engines::rest::{LanguageLookup, LanguageSide, RequestContext, RestVendor, string_at};
use crate::errors::EngineError;

/// Yandex Cloud Translate v2 endpoint
pub const DEFAULT_ENDPOINT: &str = "https://translate.api.cloud.yandex.net/translate/v2";

/// Yandex Translate descriptor, with supported pairs from a direction table
#[derive(Debug, Clone)]
pub struct Yandex {
    directions: DirectionTable,
}

impl Yandex {
    pub fn new(directions: DirectionTable) -> Self {
        Self { directions }
    }

    /// Supported pairs, written as "source-target"
    pub fn directions(&self) -> &[String] {
        self.directions.directions()
    }
}

impl Default for Yandex {
    fn default() -> Self {
        Self::new(DirectionTable::yandex())
    }
}

impl RestVendor for Yandex {
    fn name(&self) -> &'static str {
        "Yandex Translate API"
    }

    fn short_name(&self) -> &'static str {
        "Yandex"
    }

    fn default_endpoint(&self, _api_key: &str) -> String {
        DEFAULT_ENDPOINT.to_string()
    }

    fn handles_tags(&self) -> bool {
        false
    }

    fn translate_request(&self, ctx: &RequestContext<'_>, text: &str) -> RequestBuilder {
        ctx.client
            .post(format!("{}/translate", ctx.endpoint))
            .header("Authorization", format!("Api-Key {}", ctx.api_key))
            .json(&json!({
                "texts": [text],
                "targetLanguageCode": ctx.target_language,
                "sourceLanguageCode": ctx.source_language,
            }))
    }

    fn extract_translation(&self, body: &Value) -> Result<String, EngineError> {
        string_at(body, "/translations/0/text", self.short_name())
    }

    fn languages(&self, _ctx: &RequestContext<'_>, side: LanguageSide) -> LanguageLookup {
        LanguageLookup::Static(match side {
            LanguageSide::Source => self.directions.sources(),
            LanguageSide::Target => self.directions.targets(),
        })
    }
}
