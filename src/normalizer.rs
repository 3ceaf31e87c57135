/*!
 * Cleanup of chat model responses.
 *
 * Models wrap answers in blank lines, quotes and Markdown fences even when
 * told not to. These helpers peel those layers off and, when an element is
 * expected, coerce what is left into a `<target>` element. The checks are
 * textual; parsing the result is the only validation.
 */

use log::debug;

use crate::errors::EngineError;
use crate::xml::{XmlElement, parse_element};

const FENCE: &str = "```";

/// Remove one leading blank line
pub fn strip_leading_blank_line(text: &str) -> &str {
    text.strip_prefix("\n\n").unwrap_or(text)
}

/// Remove matching double quotes around the text, as many times as they appear
pub fn strip_wrapping_quotes(text: &str) -> &str {
    let mut text = text;
    while text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        text = &text[1..text.len() - 1];
    }
    text
}

/// Remove a Markdown code fence such as ```` ```xml ... ``` ```` around the text
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed
        .strip_prefix(FENCE)
        .and_then(|rest| rest.strip_suffix(FENCE))
    else {
        return trimmed;
    };

    // Drop the info string ("xml", "html", ...) that may follow the opening fence
    let info_len = inner
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(inner.len());
    let after_info = &inner[info_len..];
    let opens_line = after_info.starts_with('\n') || after_info.starts_with("\r\n");
    let opens_markup = after_info.trim_start_matches([' ', '\t']).starts_with('<');
    if info_len > 0 && (opens_line || opens_markup) {
        after_info.trim()
    } else {
        inner.trim()
    }
}

fn is_quoted(text: &str) -> bool {
    text.len() >= 2 && text.starts_with('"') && text.ends_with('"')
}

/// Clean a plain-text translation of `source`
///
/// When the source itself was quote-delimited the translation gets its
/// quotes back, so callers see the same shape they sent.
pub fn normalize_translation(raw: &str, source: &str) -> String {
    let text = strip_leading_blank_line(raw).trim();
    let text = strip_wrapping_quotes(text);
    if is_quoted(source) {
        format!("\"{}\"", text)
    } else {
        text.to_string()
    }
}

/// Wrap the text in `<target>` unless it already holds a target element
///
/// Text that mentions `<target` anywhere is returned as is: a target
/// surrounded by commentary must fail to parse rather than end up nested.
pub fn ensure_target_wrapper(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.contains("<target") {
        trimmed.to_string()
    } else {
        debug!("Response is not a <target> element, wrapping it");
        format!("<target>{}</target>", trimmed)
    }
}

/// Clean a response that should hold a `<target>` element and parse it
pub fn normalize_element(raw: &str) -> Result<XmlElement, EngineError> {
    let text = strip_leading_blank_line(raw).trim();
    let text = strip_wrapping_quotes(text);
    let text = strip_code_fence(text);
    let markup = ensure_target_wrapper(text);
    parse_element(&markup)
        .map_err(|e| EngineError::MalformedResponse(format!("{} in response: {}", e, markup)))
}
