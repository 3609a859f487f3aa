//! Scored guess at whether the first line of a paste names the columns.
//!
//! The weights are fixed; downstream behaviour is pinned to them, so new
//! rules are not added to patch individual misclassifications.

use regex::Regex;
use std::sync::LazyLock;

static ALL_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());
static DATE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{4}-[0-9]{2}-[0-9]{2}|[0-9]{2}/[0-9]{2}/[0-9]{4})").unwrap());
static UPPER_IDENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z_]+$").unwrap());

const HEADER_KEYWORDS: &[&str] = &[
    "CODIGO", "CODE", "NOMBRE", "NAME", "FECHA", "DATE", "TIPO", "TYPE", "ID", "NUM", "COD",
];

/// Score contribution of a single token.
fn token_score(token: &str) -> i32 {
    let mut score = 0;

    if token.contains('_') {
        score += 2;
    }
    if ALL_DIGITS.is_match(token) {
        score -= 2;
    }
    if DATE_PREFIX.is_match(token) {
        score -= 2;
    }
    let upper = token.to_uppercase();
    if HEADER_KEYWORDS.iter().any(|k| upper.contains(k)) {
        score += 1;
    }
    if token.chars().count() > 50 {
        score -= 1;
    }
    if token.len() > 2 && UPPER_IDENT.is_match(token) {
        score += 1;
    }
    if token.contains('@') && token.contains('.') {
        score -= 2;
    }

    score
}

/// Sum of per-token scores, skipping empty and `NULL` tokens.
pub fn header_score<S: AsRef<str>>(tokens: &[S]) -> i32 {
    tokens
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty() && *t != "NULL")
        .map(token_score)
        .sum()
}

/// A line is taken as a header when its score is strictly positive.
pub fn looks_like_header_row<S: AsRef<str>>(tokens: &[S]) -> bool {
    header_score(tokens) > 0
}
