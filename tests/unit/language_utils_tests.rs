/*!
 * Tests for language code utilities
 */

use termguard::language_utils::{
    base_language, display_name, get_language_name, language_codes_match, validate_language_code,
};

#[test]
fn test_validateLanguageCode_withValidCodes_shouldSucceed() {
    for code in ["en", "fr", "de", "ja", "eng", "fra", "ger", "pt-BR", "zh_CN", "es_419"] {
        assert!(validate_language_code(code).is_ok(), "{code} should be valid");
    }
}

#[test]
fn test_validateLanguageCode_withInvalidCodes_shouldFail() {
    for code in ["", "x", "xx", "qqq", "english", "_CA"] {
        assert!(validate_language_code(code).is_err(), "{code} should be invalid");
    }
}

#[test]
fn test_getLanguageName_shouldReturnEnglishNames() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("deu").unwrap(), "German");
    assert_eq!(get_language_name("pt-BR").unwrap(), "Portuguese (BR)");
    assert!(get_language_name("xx").is_err());
}

#[test]
fn test_languageCodesMatch_withEquivalentCodes_shouldMatch() {
    assert!(language_codes_match("en", "eng"));
    assert!(language_codes_match("fre", "fra"));
    assert!(language_codes_match("zh_TW", "zh_CN"));
    assert!(!language_codes_match("es", "pt"));
    assert!(!language_codes_match("xx", "xx"));
}

#[test]
fn test_displayName_shouldFallBackToRawCode() {
    assert_eq!(display_name("ja"), "Japanese");
    assert_eq!(display_name("klingon"), "klingon");
    assert_eq!(base_language("FR_ca"), "fr");
}
