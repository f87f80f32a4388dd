use std::sync::LazyLock;

use regex::Regex;

static FOOTNOTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\d+\]").unwrap());

/// First all-digit token of a phone cell, footnote markers removed.
/// Falls back to the whole trimmed text when no token qualifies.
pub fn extract_number(value: Option<&str>) -> Option<String> {
    let value = value.map(str::trim).filter(|v| !v.is_empty())?;

    let number = value
        .split_whitespace()
        .map(|token| FOOTNOTE_RE.replace_all(token, ""))
        .map(|token| token.trim().to_string())
        .find(|token| !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()));

    Some(number.unwrap_or_else(|| value.to_string()))
}
