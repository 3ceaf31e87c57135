/*!
 * Static language and model tables.
 *
 * Engines receive these tables as data instead of reading constants, so a
 * caller can replace them when vendors add languages or retire models.
 */

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A model identifier with its display name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub display_name: String,
}

impl ModelInfo {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

const COMMON_LANGUAGES: &[&str] = &[
    "af", "am", "ar", "az", "be", "bg", "bn", "bs", "ca", "cs", "cy", "da", "de", "el", "en",
    "en-GB", "en-US", "es", "es-419", "et", "eu", "fa", "fi", "fil", "fr", "fr-CA", "ga", "gl",
    "gu", "he", "hi", "hr", "hu", "hy", "id", "is", "it", "ja", "ka", "kk", "km", "kn", "ko",
    "lo", "lt", "lv", "mk", "ml", "mn", "mr", "ms", "mt", "my", "nb", "ne", "nl", "pa", "pl",
    "pt", "pt-BR", "pt-PT", "ro", "ru", "si", "sk", "sl", "sq", "sr", "sv", "sw", "ta", "te",
    "th", "tr", "uk", "ur", "uz", "vi", "zh-Hans", "zh-Hant", "zu",
];

/// Languages offered by engines that can translate between any pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageCatalog {
    codes: Vec<String>,
}

impl LanguageCatalog {
    pub fn new(codes: Vec<String>) -> Self {
        Self { codes }
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }
}

impl Default for LanguageCatalog {
    fn default() -> Self {
        Self::new(COMMON_LANGUAGES.iter().map(|code| code.to_string()).collect())
    }
}

// Reading pairs from the Yandex API times out, so they are kept here.
const YANDEX_DIRECTIONS: &[&str] = &[
    "az-ru", "be-bg", "be-cs", "be-de", "be-en", "be-es", "be-fr", "be-it", "be-pl", "be-ro",
    "be-ru", "be-sr", "be-tr", "bg-be", "bg-ru", "bg-uk", "ca-en", "ca-ru", "cs-be", "cs-en",
    "cs-ru", "cs-uk", "da-en", "da-ru", "de-be", "de-en", "de-es", "de-fr", "de-it", "de-ru",
    "de-tr", "de-uk", "el-en", "el-ru", "en-be", "en-ca", "en-cs", "en-da", "en-de", "en-el",
    "en-es", "en-et", "en-fi", "en-fr", "en-hu", "en-it", "en-lt", "en-lv", "en-mk", "en-nl",
    "en-no", "en-pt", "en-ru", "en-sk", "en-sl", "en-sq", "en-sv", "en-tr", "en-uk", "es-be",
    "es-de", "es-en", "es-ru", "es-uk", "et-en", "et-ru", "fi-en", "fi-ru", "fr-be", "fr-de",
    "fr-en", "fr-ru", "fr-uk", "hr-ru", "hu-en", "hu-ru", "hy-ru", "it-be", "it-de", "it-en",
    "it-ru", "it-uk", "lt-en", "lt-ru", "lv-en", "lv-ru", "mk-en", "mk-ru", "nl-en", "nl-ru",
    "no-en", "no-ru", "pl-be", "pl-ru", "pl-uk", "pt-en", "pt-ru", "ro-be", "ro-ru", "ro-uk",
    "ru-az", "ru-be", "ru-bg", "ru-ca", "ru-cs", "ru-da", "ru-de", "ru-el", "ru-en", "ru-es",
    "ru-et", "ru-fi", "ru-fr", "ru-hr", "ru-hu", "ru-hy", "ru-it", "ru-lt", "ru-lv", "ru-mk",
    "ru-nl", "ru-no", "ru-pl", "ru-pt", "ru-ro", "ru-sk", "ru-sl", "ru-sq", "ru-sr", "ru-sv",
    "ru-tr", "ru-uk", "sk-en", "sk-ru", "sl-en", "sl-ru", "sq-en", "sq-ru", "sr-be", "sr-ru",
    "sr-uk", "sv-en", "sv-ru", "tr-be", "tr-de", "tr-en", "tr-ru", "tr-uk", "uk-bg", "uk-cs",
    "uk-de", "uk-en", "uk-es", "uk-fr", "uk-it", "uk-pl", "uk-ro", "uk-ru", "uk-sr", "uk-tr",
];

/// Supported translation directions, written as "source-target"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionTable {
    directions: Vec<String>,
}

impl DirectionTable {
    pub fn new(directions: Vec<String>) -> Self {
        Self { directions }
    }

    /// Table of the pairs Yandex accepts
    pub fn yandex() -> Self {
        Self::new(YANDEX_DIRECTIONS.iter().map(|pair| pair.to_string()).collect())
    }

    pub fn directions(&self) -> &[String] {
        &self.directions
    }

    /// Unique, sorted source languages
    pub fn sources(&self) -> Vec<String> {
        self.side(0)
    }

    /// Unique, sorted target languages
    pub fn targets(&self) -> Vec<String> {
        self.side(1)
    }

    fn side(&self, index: usize) -> Vec<String> {
        let mut languages: Vec<String> = self
            .directions
            .iter()
            .filter_map(|pair| pair.split('-').nth(index))
            .map(str::to_string)
            .collect();
        languages.sort();
        languages.dedup();
        languages
    }
}

/// Endpoint and model list of one Alibaba Model Studio region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionInfo {
    pub base_url: String,
    pub models: Vec<String>,
}

fn models(ids: &[&str]) -> Vec<ModelInfo> {
    ids.iter().map(|id| ModelInfo::new(*id, *id)).collect()
}

/// Known models per engine and region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCatalog {
    pub chatgpt: Vec<ModelInfo>,
    pub anthropic: Vec<ModelInfo>,
    pub alibaba_regions: BTreeMap<String, RegionInfo>,
}

impl ModelCatalog {
    /// Region settings for Alibaba, matched case-insensitively
    pub fn alibaba_region(&self, region: &str) -> Option<&RegionInfo> {
        self.alibaba_regions
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(region.trim()))
            .map(|(_, info)| info)
    }

    /// Models offered in an Alibaba region
    pub fn alibaba_models(&self, region: &str) -> Option<Vec<ModelInfo>> {
        self.alibaba_region(region).map(|info| {
            info.models
                .iter()
                .map(|id| ModelInfo::new(id.clone(), id.clone()))
                .collect()
        })
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        let mut alibaba_regions = BTreeMap::new();
        alibaba_regions.insert(
            "Singapore".to_string(),
            RegionInfo {
                base_url: "https://dashscope-intl.aliyuncs.com/compatible-mode/v1".to_string(),
                models: vec!["qwen-mt-plus".into(), "qwen-mt-flash".into(), "qwen-mt-lite".into(), "qwen-mt-turbo".into()],
            },
        );
        alibaba_regions.insert(
            "Virginia".to_string(),
            RegionInfo {
                base_url: "https://dashscope-us.aliyuncs.com/compatible-mode/v1".to_string(),
                models: vec!["qwen-mt-plus".into(), "qwen-mt-flash".into(), "qwen-mt-lite".into()],
            },
        );
        alibaba_regions.insert(
            "Beijing".to_string(),
            RegionInfo {
                base_url: "https://dashscope.aliyuncs.com/compatible-mode/v1".to_string(),
                models: vec!["qwen-mt-plus".into(), "qwen-mt-flash".into(), "qwen-mt-lite".into(), "qwen-mt-turbo".into()],
            },
        );

        let mut anthropic = vec![
            ModelInfo::new("claude-haiku-4-5-20251001", "Claude Haiku 4.5"),
            ModelInfo::new("claude-sonnet-4-5-20250929", "Claude Sonnet 4.5"),
            ModelInfo::new("claude-opus-4-1-20250805", "Claude Opus 4.1"),
            ModelInfo::new("claude-opus-4-20250514", "Claude Opus 4"),
            ModelInfo::new("claude-sonnet-4-20250514", "Claude Sonnet 4"),
            ModelInfo::new("claude-3-7-sonnet-20250219", "Claude Sonnet 3.7"),
            ModelInfo::new("claude-3-5-haiku-20241022", "Claude Haiku 3.5"),
            ModelInfo::new("claude-3-5-sonnet-20241022", "Claude Sonnet 3.5"),
            ModelInfo::new("claude-3-haiku-20240307", "Claude Haiku 3"),
            ModelInfo::new("claude-3-opus-20240229", "Claude Opus 3"),
            ModelInfo::new("claude-3-sonnet-20240229", "Claude Sonnet 3"),
        ];
        anthropic.sort_by(|a, b| a.id.cmp(&b.id));

        Self {
            chatgpt: models(&["gpt-3.5-turbo", "gpt-4", "gpt-4-turbo-preview"]),
            anthropic,
            alibaba_regions,
        }
    }
}
