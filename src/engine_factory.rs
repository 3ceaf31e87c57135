/*!
 * Builds engines from configuration.
 */

use anyhow::{Context, Result, anyhow};
use log::debug;

use crate::app_config::{Config, EngineConfig, EngineKind};
use crate::catalog::ModelCatalog;
use crate::engines::{ChatConnection, LlmEngine, MtEngine, RestEngine, RestVendor};
use crate::vendors::{Azure, DeepL, Google, ModernMT, Yandex};

/// Create the configured engine with the configured language pair
pub fn create_engine(config: &Config) -> Result<Box<dyn MtEngine>> {
    let settings = config.get_active_engine_config()
        .ok_or_else(|| anyhow!("No settings found for engine {}", config.engine))?;
    debug!("Creating {} engine", config.engine.display_name());

    let mut engine: Box<dyn MtEngine> = match config.engine {
        EngineKind::Azure => {
            let vendor = if settings.region.is_empty() {
                Azure::new()
            } else {
                Azure::with_region(settings.region.as_str())
            };
            Box::new(rest_engine(vendor, settings))
        },
        EngineKind::Google => Box::new(rest_engine(Google::new(settings.neural), settings)),
        EngineKind::Yandex => Box::new(rest_engine(Yandex::default(), settings)),
        EngineKind::DeepL => Box::new(rest_engine(DeepL::new(), settings)),
        EngineKind::ModernMT => Box::new(rest_engine(ModernMT::new(), settings)),
        kind => Box::new(create_llm_engine(kind, settings)?),
    };

    engine.set_source_language(&config.source_language);
    engine.set_target_language(&config.target_language);
    Ok(engine)
}

fn rest_engine<V: RestVendor>(vendor: V, settings: &EngineConfig) -> RestEngine<V> {
    let engine = RestEngine::new(vendor, settings.api_key.as_str()).with_timeout(settings.timeout_secs);
    if settings.endpoint.is_empty() {
        engine
    } else {
        engine.with_endpoint(settings.endpoint.as_str())
    }
}

/// Create a chat model engine, without a language pair
pub fn create_llm_engine(kind: EngineKind, settings: &EngineConfig) -> Result<LlmEngine> {
    let connection = ChatConnection::new(settings.api_key.as_str())
        .with_endpoint(settings.endpoint.as_str())
        .with_timeout(settings.timeout_secs);
    let model = Some(settings.model.as_str()).filter(|model| !model.is_empty());

    Ok(match kind {
        EngineKind::ChatGPT => LlmEngine::chatgpt_over(connection, model),
        EngineKind::Anthropic => LlmEngine::anthropic_over(connection, model),
        EngineKind::Alibaba => {
            LlmEngine::alibaba_over(connection, &settings.region, model, &ModelCatalog::default())
                .with_context(|| format!("Cannot create the Alibaba engine for region {}", settings.region))?
        },
        EngineKind::Mistral => LlmEngine::mistral_over(connection, model),
        other => return Err(anyhow!("{} is not a chat model engine", other.display_name())),
    })
}
