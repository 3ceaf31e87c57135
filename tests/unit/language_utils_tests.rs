/*!
 * Tests for language tag utilities
 */

use mtengines::language_utils::{display_name, get_language_name, language_codes_match, split_tag};

#[test]
fn test_getLanguageName_withIso6391_shouldReturnEnglishName() {
    assert_eq!(get_language_name("fr").unwrap(), "French");
    assert_eq!(get_language_name("de").unwrap(), "German");
}

#[test]
fn test_getLanguageName_withIso6393_shouldReturnEnglishName() {
    assert_eq!(get_language_name("deu").unwrap(), "German");
}

#[test]
fn test_getLanguageName_withRegionSubtag_shouldIgnoreSubtag() {
    assert_eq!(get_language_name("pt-BR").unwrap(), "Portuguese");
}

#[test]
fn test_getLanguageName_withUnknownCode_shouldFail() {
    assert!(get_language_name("xx").is_err());
    assert!(get_language_name("").is_err());
}

#[test]
fn test_splitTag_withUnderscore_shouldNormalize() {
    assert_eq!(split_tag("pt_BR"), ("pt".to_string(), Some("BR".to_string())));
    assert_eq!(split_tag("EN"), ("en".to_string(), None));
    assert_eq!(split_tag("zh-Hans"), ("zh".to_string(), Some("Hans".to_string())));
}

#[test]
fn test_displayName_shouldKeepSubtags() {
    assert_eq!(display_name("en"), "English");
    assert_eq!(display_name("pt-BR"), "Portuguese (BR)");
    assert_eq!(display_name("zh-Hans"), "Chinese (Hans)");
}

#[test]
fn test_displayName_withUnknownTag_shouldFallBackToTag() {
    assert_eq!(display_name("abcd-x"), "abcd-x");
}

#[test]
fn test_languageCodesMatch_shouldCompareIsoLanguages() {
    assert!(language_codes_match("en", "eng"));
    assert!(language_codes_match("en-US", "en-GB"));
    assert!(!language_codes_match("en", "fr"));
    assert!(!language_codes_match("xx", "xx"));
}
