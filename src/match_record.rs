/*!
 * Translation results and terminology hints.
 */

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::xml::{XmlElement, parse_element};

/// A term and the translation an engine should use for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminologyPair {
    pub source: String,
    pub target: String,
}

impl TerminologyPair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// A source segment, the target an engine produced for it and the engine's short name
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    source: XmlElement,
    target: XmlElement,
    origin: String,
}

/// Serialized form, with both elements as markup strings
#[derive(Serialize, Deserialize)]
struct MatchRecordJson {
    source: String,
    target: String,
    origin: String,
}

impl MatchRecord {
    pub fn new(source: XmlElement, target: XmlElement, origin: impl Into<String>) -> Self {
        Self {
            source,
            target,
            origin: origin.into(),
        }
    }

    pub fn source(&self) -> &XmlElement {
        &self.source
    }

    pub fn target(&self) -> &XmlElement {
        &self.target
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Give up the record, keeping the elements
    pub fn into_parts(self) -> (XmlElement, XmlElement, String) {
        (self.source, self.target, self.origin)
    }

    /// Plain JSON object view of the record
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "source": self.source.to_string(),
            "target": self.target.to_string(),
            "origin": self.origin,
        })
    }
}

impl Serialize for MatchRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        MatchRecordJson {
            source: self.source.to_string(),
            target: self.target.to_string(),
            origin: self.origin.clone(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MatchRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = MatchRecordJson::deserialize(deserializer)?;
        let source = parse_element(&json.source).map_err(D::Error::custom)?;
        let target = parse_element(&json.target).map_err(D::Error::custom)?;
        Ok(Self::new(source, target, json.origin))
    }
}
