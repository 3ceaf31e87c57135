/*!
 * Prompt construction for chat-based engines.
 *
 * Four prompt shapes are produced: plain translation, generation of a
 * `<target>` for an XLIFF `<source>`, adapting a known match to a new source,
 * and repairing a target that lost inline elements. Language codes are shown
 * to the model by display name.
 */

use crate::language_utils::display_name;
use crate::match_record::TerminologyPair;
use crate::xml::XmlElement;

const RETURN_TARGET_ONLY: &str =
    "Return only the <target> element, without explanations, comments or Markdown formatting.";

/// Builds prompts for one language pair
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    source_language: String,
    target_language: String,
}

impl PromptBuilder {
    /// Create a builder, resolving both codes to display names
    pub fn new(source_language: &str, target_language: &str) -> Self {
        Self {
            source_language: display_name(source_language),
            target_language: display_name(target_language),
        }
    }

    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    /// Role description sent as system text or prepended to the prompt
    pub fn role(&self) -> String {
        format!(
            "You are an expert translator specialized in translating from {} to {}.",
            self.source_language, self.target_language
        )
    }

    /// Prompt for translating plain text
    pub fn translate(&self, text: &str) -> String {
        format!(
            "Translate the text enclosed in triple quotes from {} to {}. \
             Return only the translation, without quotes, notes or explanations: \"\"\"{}\"\"\"",
            self.source_language, self.target_language, text
        )
    }

    /// Prompt for translating an XLIFF `<source>` element into a `<target>` element
    pub fn generate_match(&self, source: &XmlElement, terms: &[TerminologyPair]) -> String {
        let mut prompt = format!(
            "Translate the content of this XLIFF <source> element from {} to {}:\n\n{}\n\n",
            self.source_language, self.target_language, source
        );
        if !terms.is_empty() {
            prompt.push_str(
                "Use the following terminology, a JSON object that maps source terms to their \
                 translations. Adjust gender and number of the translated terms to fit each sentence:\n\n",
            );
            prompt.push_str(&terms_to_json(terms));
            prompt.push_str("\n\n");
        }
        prompt.push_str(
            "Keep every inline element (like <ph>, <pc>, <sc>, <ec> or <mrk>) with its attributes \
             unchanged and place it where it belongs in the translation. ",
        );
        prompt.push_str(RETURN_TARGET_ONLY);
        prompt
    }

    /// Prompt for adapting a known translation to a new, similar source
    pub fn fix_match(
        &self,
        original_source: &XmlElement,
        match_source: &XmlElement,
        match_target: &XmlElement,
    ) -> String {
        format!(
            "A translation memory contains this {} <source> element and its {} translation:\n\n{}\n{}\n\n\
             Translate the following <source> element reusing the wording and style of that \
             translation wherever the meaning allows, and keep its inline elements unchanged:\n\n{}\n\n{}",
            self.source_language,
            self.target_language,
            match_source,
            match_target,
            original_source,
            RETURN_TARGET_ONLY
        )
    }

    /// Prompt for restoring inline elements that a target lost
    pub fn fix_tags(&self, source: &XmlElement, target: &XmlElement) -> String {
        let mut prompt = format!(
            "This <target> element is a {} translation of the {} <source> element below, \
             but some inline elements of the source are missing or misplaced in the target:\n\n{}\n{}\n\n",
            self.target_language, self.source_language, source, target
        );
        let missing = missing_inline_elements(source, target);
        if !missing.is_empty() {
            prompt.push_str(&format!("Missing elements: {}.\n\n", missing.join(", ")));
        }
        prompt.push_str(
            "Insert the inline elements of the source at the matching places of the target \
             without changing the translated text. ",
        );
        prompt.push_str(RETURN_TARGET_ONLY);
        prompt
    }
}

/// Terminology as a JSON object, keeping the caller's order
fn terms_to_json(terms: &[TerminologyPair]) -> String {
    let entries: Vec<String> = terms
        .iter()
        .map(|term| {
            format!(
                "{}: {}",
                serde_json::Value::from(term.source.as_str()),
                serde_json::Value::from(term.target.as_str())
            )
        })
        .collect();
    format!("{{{}}}", entries.join(", "))
}

/// Inline element names present in the source more often than in the target
pub fn missing_inline_elements(source: &XmlElement, target: &XmlElement) -> Vec<String> {
    let mut remaining: Vec<&str> = target.descendant_names();
    let mut missing = Vec::new();
    for name in source.descendant_names() {
        match remaining.iter().position(|candidate| *candidate == name) {
            Some(index) => {
                remaining.swap_remove(index);
            }
            None => missing.push(format!("<{}>", name)),
        }
    }
    missing
}
