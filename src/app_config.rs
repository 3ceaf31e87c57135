use anyhow::{Context, Result, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Application configuration module
/// This module handles loading, validating and saving the engine settings
/// used by the command line front end.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    pub source_language: String,

    /// Target language code (ISO)
    pub target_language: String,

    /// Engine to use
    #[serde(default)]
    pub engine: EngineKind,

    /// Settings for each engine
    #[serde(default)]
    pub available_engines: Vec<EngineConfig>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Machine translation engine type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    Azure,
    Google,
    Yandex,
    #[default]
    DeepL,
    ModernMT,
    ChatGPT,
    Anthropic,
    Alibaba,
    Mistral,
}

impl EngineKind {
    /// Every engine, in display order
    pub const ALL: [EngineKind; 9] = [
        Self::Azure,
        Self::Google,
        Self::Yandex,
        Self::DeepL,
        Self::ModernMT,
        Self::ChatGPT,
        Self::Anthropic,
        Self::Alibaba,
        Self::Mistral,
    ];

    // @returns: Human readable engine name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Azure => "Azure Translator Text",
            Self::Google => "Google Cloud Translation",
            Self::Yandex => "Yandex Translate API",
            Self::DeepL => "DeepL API",
            Self::ModernMT => "ModernMT",
            Self::ChatGPT => "ChatGPT API",
            Self::Anthropic => "Anthropic Claude",
            Self::Alibaba => "Alibaba Translator",
            Self::Mistral => "Mistral AI",
        }
    }

    // @returns: Lowercase engine identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Azure => "azure".to_string(),
            Self::Google => "google".to_string(),
            Self::Yandex => "yandex".to_string(),
            Self::DeepL => "deepl".to_string(),
            Self::ModernMT => "modernmt".to_string(),
            Self::ChatGPT => "chatgpt".to_string(),
            Self::Anthropic => "anthropic".to_string(),
            Self::Alibaba => "alibaba".to_string(),
            Self::Mistral => "mistral".to_string(),
        }
    }

    /// Whether the engine talks to a chat model
    pub fn is_llm(&self) -> bool {
        matches!(self, Self::ChatGPT | Self::Anthropic | Self::Alibaba | Self::Mistral)
    }
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for EngineKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "azure" => Ok(Self::Azure),
            "google" => Ok(Self::Google),
            "yandex" => Ok(Self::Yandex),
            "deepl" => Ok(Self::DeepL),
            "modernmt" => Ok(Self::ModernMT),
            "chatgpt" | "openai" => Ok(Self::ChatGPT),
            "anthropic" => Ok(Self::Anthropic),
            "alibaba" => Ok(Self::Alibaba),
            "mistral" => Ok(Self::Mistral),
            _ => Err(anyhow!("Invalid engine type: {}", s)),
        }
    }
}

/// Settings of one engine
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EngineConfig {
    // @field: Engine type identifier
    #[serde(rename = "type")]
    pub engine_type: EngineKind,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Model name, LLM engines only (empty means the engine default)
    #[serde(default = "String::new")]
    pub model: String,

    // @field: Base URL override (empty means the vendor's public endpoint)
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Azure resource region or Alibaba Model Studio region
    #[serde(default = "String::new")]
    pub region: String,

    // @field: Google neural model switch
    #[serde(default = "default_true")]
    pub neural: bool,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl EngineConfig {
    // @param engine_type: Engine enum
    // @returns: Engine config with defaults
    pub fn new(engine_type: EngineKind) -> Self {
        Self {
            engine_type,
            api_key: String::new(),
            model: default_model(engine_type),
            endpoint: String::new(),
            region: default_region(engine_type),
            neural: default_true(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for log::LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_timeout_secs() -> u64 {
    crate::providers::DEFAULT_TIMEOUT_SECS
}

fn default_true() -> bool {
    true
}

fn default_model(engine_type: EngineKind) -> String {
    match engine_type {
        EngineKind::ChatGPT => "gpt-3.5-turbo".to_string(),
        EngineKind::Anthropic => "claude-3-5-sonnet-20241022".to_string(),
        EngineKind::Alibaba => "qwen-mt-plus".to_string(),
        EngineKind::Mistral => "mistral-large-latest".to_string(),
        _ => String::new(),
    }
}

fn default_region(engine_type: EngineKind) -> String {
    match engine_type {
        EngineKind::Alibaba => "Singapore".to_string(),
        _ => String::new(),
    }
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .context(format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", path.display()))
    }

    /// Write the configuration as pretty printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .context(format!("Failed to write config to file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate languages
        let _source_name = crate::language_utils::get_language_name(&self.source_language)?;
        let _target_name = crate::language_utils::get_language_name(&self.target_language)?;
        if crate::language_utils::language_codes_match(&self.source_language, &self.target_language) {
            warn!(
                "Source and target language are the same ({} / {})",
                self.source_language, self.target_language
            );
        }

        let engine = self.get_active_engine_config()
            .ok_or_else(|| anyhow!("No settings found for engine {}", self.engine))?;

        if engine.api_key.is_empty() {
            return Err(anyhow!("API key is required for {}", self.engine.display_name()));
        }

        if !engine.endpoint.is_empty() {
            url::Url::parse(&engine.endpoint)
                .context(format!("Invalid endpoint for {}: {}", self.engine, engine.endpoint))?;
        }

        match self.engine {
            EngineKind::Alibaba if engine.region.is_empty() => {
                return Err(anyhow!("A region is required for {}", self.engine.display_name()));
            },
            EngineKind::Alibaba | EngineKind::Mistral if engine.model.is_empty() => {
                return Err(anyhow!("A model is required for {}", self.engine.display_name()));
            },
            _ => {}
        }

        Ok(())
    }

    /// Get the active engine configuration from the available_engines array
    pub fn get_active_engine_config(&self) -> Option<&EngineConfig> {
        self.get_engine_config(self.engine)
    }

    /// Get a specific engine configuration by type
    pub fn get_engine_config(&self, engine_type: EngineKind) -> Option<&EngineConfig> {
        self.available_engines.iter()
            .find(|e| e.engine_type == engine_type)
    }

    /// Mutable settings of an engine, added with defaults when missing
    pub fn engine_config_mut(&mut self, engine_type: EngineKind) -> &mut EngineConfig {
        let index = match self.available_engines.iter().position(|e| e.engine_type == engine_type) {
            Some(index) => index,
            None => {
                self.available_engines.push(EngineConfig::new(engine_type));
                self.available_engines.len() - 1
            }
        };
        &mut self.available_engines[index]
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: "en".to_string(),
            target_language: "fr".to_string(),
            engine: EngineKind::default(),
            available_engines: EngineKind::ALL.iter().map(|kind| EngineConfig::new(*kind)).collect(),
            log_level: LogLevel::default(),
        }
    }
}
