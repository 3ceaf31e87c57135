use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for BCP-47 language tags
///
/// Only the primary language subtag is resolved against ISO 639; script and
/// region subtags are carried through verbatim in display names.
/// Split a BCP-47 tag into its primary subtag and the remainder
pub fn split_tag(code: &str) -> (String, Option<String>) {
    let normalized = code.trim().replace('_', "-");
    match normalized.split_once('-') {
        Some((primary, rest)) if !rest.is_empty() => (primary.to_lowercase(), Some(rest.to_string())),
        Some((primary, _)) => (primary.to_lowercase(), None),
        None => (normalized.to_lowercase(), None),
    }
}

/// Resolve the ISO language behind the primary subtag of a tag
fn lookup(primary: &str) -> Option<Language> {
    match primary.len() {
        2 => Language::from_639_1(primary),
        3 => Language::from_639_3(primary),
        _ => None,
    }
}

/// Get the English language name for a tag, ignoring subtags
pub fn get_language_name(code: &str) -> Result<String> {
    let (primary, _) = split_tag(code);
    let lang = lookup(&primary)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", code))?;

    Ok(lang.to_name().to_string())
}

/// Human readable name for a tag, e.g. "Portuguese (BR)" for "pt-BR"
///
/// Unknown tags fall back to the tag itself so prompts stay usable.
pub fn display_name(code: &str) -> String {
    let (_, rest) = split_tag(code);
    match (get_language_name(code), rest) {
        (Ok(name), Some(rest)) => format!("{} ({})", name, rest),
        (Ok(name), None) => name,
        (Err(_), _) => code.trim().to_string(),
    }
}

/// Check if two tags name the same primary language
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    let (primary1, _) = split_tag(code1);
    let (primary2, _) = split_tag(code2);
    match (lookup(&primary1), lookup(&primary2)) {
        (Some(lang1), Some(lang2)) => lang1 == lang2,
        _ => false,
    }
}
