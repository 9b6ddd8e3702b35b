//! Locale Detection
//!
//! Preference order: locale cookie, then `Accept-Language`.

use crate::domain::locale::Locale;

/// Language ranges of an `Accept-Language` header, highest q first
///
/// Entries with `q=0` are dropped; ties keep header order.
pub fn parse_accept_language(header: &str) -> Vec<(String, f32)> {
    let mut ranges: Vec<(String, f32)> = header
        .split(',')
        .filter_map(|part| {
            let mut pieces = part.split(';');
            let tag = pieces.next()?.trim();
            if tag.is_empty() {
                return None;
            }

            let q = pieces
                .filter_map(|p| p.trim().strip_prefix("q="))
                .find_map(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);

            (q > 0.0).then(|| (tag.to_string(), q))
        })
        .collect();

    // sort_by is stable
    ranges.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranges
}

/// Best supported locale from an `Accept-Language` header
pub fn match_accept_language(header: &str, supported: &[Locale]) -> Option<Locale> {
    parse_accept_language(header)
        .iter()
        .filter_map(|(tag, _)| Locale::parse(tag))
        .find(|locale| supported.contains(locale))
}

/// The visitor's preferred locale
pub fn preferred_locale(
    cookie: Option<&str>,
    accept_language: Option<&str>,
    supported: &[Locale],
) -> Option<Locale> {
    cookie
        .and_then(Locale::parse)
        .filter(|locale| supported.contains(locale))
        .or_else(|| accept_language.and_then(|h| match_accept_language(h, supported)))
}
