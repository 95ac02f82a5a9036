use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for glossary language codes
///
/// Glossaries key translations by locale-style codes such as `fr`,
/// `es_419`, `zh_CN` or `pt-BR`. The base language part is an ISO 639-1
/// (2-letter) or ISO 639-2 (3-letter) code; the region part is kept as-is.
/// Split a locale code into its base language and optional region
pub fn split_locale(code: &str) -> (String, Option<String>) {
    let trimmed = code.trim();
    match trimmed.split_once(['_', '-']) {
        Some((base, region)) if !region.is_empty() => (base.to_lowercase(), Some(region.to_string())),
        Some((base, _)) => (base.to_lowercase(), None),
        None => (trimmed.to_lowercase(), None),
    }
}

/// Base language of a locale code (`es_419` -> `es`)
pub fn base_language(code: &str) -> String {
    split_locale(code).0
}

/// Map ISO 639-2/B bibliographic codes to their 639-2/T equivalents
fn part2b_to_part2t(code: &str) -> Option<&'static str> {
    let mapped = match code {
        "fre" => "fra",
        "ger" => "deu",
        "dut" => "nld",
        "gre" => "ell",
        "chi" => "zho",
        "cze" => "ces",
        "ice" => "isl",
        "alb" => "sqi",
        "arm" => "hye",
        "baq" => "eus",
        "bur" => "mya",
        "per" => "fas",
        "geo" => "kat",
        "may" => "msa",
        "mac" => "mkd",
        "rum" => "ron",
        "slo" => "slk",
        "wel" => "cym",
        _ => return None,
    };
    Some(mapped)
}

/// Resolve the base language of a locale code
fn resolve_language(code: &str) -> Option<Language> {
    let base = base_language(code);
    match base.len() {
        2 => Language::from_639_1(&base),
        3 => part2b_to_part2t(&base)
            .and_then(Language::from_639_3)
            .or_else(|| Language::from_639_3(&base)),
        _ => None,
    }
}

/// Validate a language or locale code
pub fn validate_language_code(code: &str) -> Result<()> {
    resolve_language(code)
        .map(|_| ())
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Check if two codes share the same base language
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (resolve_language(code1), resolve_language(code2)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// English display name for a code, with the region in parentheses
pub fn get_language_name(code: &str) -> Result<String> {
    let language = resolve_language(code).ok_or_else(|| anyhow!("Invalid language code: {}", code))?;
    let name = language.to_name();

    Ok(match split_locale(code).1 {
        Some(region) => format!("{} ({})", name, region),
        None => name.to_string(),
    })
}

/// Display name for prompts; unknown codes are shown verbatim
pub fn display_name(code: &str) -> String {
    get_language_name(code).unwrap_or_else(|_| code.to_string())
}
