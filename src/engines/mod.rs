/*!
 * The machine translation engine contract and its two implementations.
 *
 * - `rest`: engines backed by a vendor REST API, one descriptor per vendor
 * - `llm`: engines backed by a chat model, one profile per vendor
 */

use async_trait::async_trait;

use crate::errors::EngineError;
use crate::match_record::{MatchRecord, TerminologyPair};
use crate::xml::XmlElement;

pub mod llm;
pub mod rest;

pub use self::llm::{ChatConnection, LlmEngine, LlmProfile, RolePlacement};
pub use self::rest::{RestEngine, RestVendor};

/// Common trait for all machine translation engines
///
/// Callers configure the language pair, check the capability flags and then
/// call the translation operations. Every operation issues at most one
/// request to the vendor.
#[async_trait]
pub trait MtEngine: Send + Sync {
    /// Human readable engine name
    fn name(&self) -> &str;

    /// Short engine name, recorded as the origin of matches
    fn short_name(&self) -> &str;

    /// Language codes accepted as source
    async fn source_languages(&self) -> Result<Vec<String>, EngineError>;

    /// Language codes accepted as target
    async fn target_languages(&self) -> Result<Vec<String>, EngineError>;

    fn set_source_language(&mut self, language: &str);

    fn source_language(&self) -> &str;

    fn set_target_language(&mut self, language: &str);

    fn target_language(&self) -> &str;

    /// Translate plain text
    async fn translate(&self, text: &str) -> Result<String, EngineError>;

    /// Translate the content of a `<source>` element into a match
    ///
    /// Terminology is a hint; engines that cannot use it ignore it.
    async fn get_mt_match(
        &self,
        source: &XmlElement,
        terms: &[TerminologyPair],
    ) -> Result<MatchRecord, EngineError>;

    /// Whether inline elements survive translation structurally
    fn handles_tags(&self) -> bool;

    /// Whether `fix_match` is available
    fn fixes_matches(&self) -> bool {
        false
    }

    /// Translate `original_source` following the style of a known match
    async fn fix_match(
        &self,
        _original_source: &XmlElement,
        _match_source: &XmlElement,
        _match_target: &XmlElement,
    ) -> Result<MatchRecord, EngineError> {
        Err(EngineError::NotImplemented(format!("{} cannot fix matches", self.name())))
    }

    /// Whether `fix_tags` is available
    fn fixes_tags(&self) -> bool {
        false
    }

    /// Restore inline elements of `source` that are missing from `target`
    async fn fix_tags(
        &self,
        _source: &XmlElement,
        _target: &XmlElement,
    ) -> Result<XmlElement, EngineError> {
        Err(EngineError::NotImplemented(format!("{} cannot fix tags", self.name())))
    }
}

/// Fail unless both languages of the pair are set
pub(crate) fn require_languages<E: MtEngine + ?Sized>(engine: &E) -> Result<(), EngineError> {
    if engine.source_language().is_empty() || engine.target_language().is_empty() {
        return Err(EngineError::InvalidState(
            "Source and target languages must be set before translation".to_string(),
        ));
    }
    Ok(())
}
