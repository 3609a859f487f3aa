//! Line splitting for pasted result grids.
//!
//! A line is split on a single delimiter chosen for the whole line: tab if
//! present, otherwise pipe, otherwise runs of two or more whitespace
//! characters (the fixed-width "Results to Text" layout of SSMS).

use regex::Regex;
use std::sync::LazyLock;

static WIDE_GAP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

static SEPARATOR_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s|+]*[-=][\s|+\-=]*$").unwrap());

static FOOTER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\([0-9]+ rows? affected\)|\([0-9]+ row\(s\) affected\)|[0-9]+ rows? selected\.?)\s*$")
        .unwrap()
});

/// Split one line into trimmed fields, keeping empty fields in place.
pub fn tokenize_line(line: &str) -> Vec<String> {
    let line = line.strip_suffix('\r').unwrap_or(line);

    if line.contains('\t') {
        line.split('\t').map(|t| t.trim().to_string()).collect()
    } else if line.contains('|') {
        // Bordered grids open and close each line with a pipe.
        let inner = line.trim();
        let inner = inner.strip_prefix('|').unwrap_or(inner);
        let inner = inner.strip_suffix('|').unwrap_or(inner);
        inner.split('|').map(|t| t.trim().to_string()).collect()
    } else {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }
        WIDE_GAP
            .split(trimmed)
            .map(|t| t.trim().to_string())
            .collect()
    }
}

/// Tokens of a header line. Empty fields cannot name a column and are dropped.
pub fn header_tokens(line: &str) -> Vec<String> {
    tokenize_line(line)
        .into_iter()
        .filter(|t| !t.is_empty())
        .collect()
}

/// Fit a data row to `expected` columns.
///
/// Rows reaching half the expected width are padded with empty cells or
/// truncated; shorter rows yield `None`.
pub fn align_row(tokens: Vec<String>, expected: usize) -> Option<Vec<String>> {
    align_row_with_fill(tokens, expected, 0.5)
}

pub(crate) fn align_row_with_fill(
    mut tokens: Vec<String>,
    expected: usize,
    min_fill: f64,
) -> Option<Vec<String>> {
    if expected == 0 || (tokens.len() as f64) < expected as f64 * min_fill {
        return None;
    }
    tokens.resize(expected, String::new());
    Some(tokens)
}

/// Non-blank lines of a paste, with Windows line endings removed.
pub(crate) fn content_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .filter(|l| !l.trim().is_empty())
}

/// Separator rules and row-count footers that SSMS and SQL*Plus print around a result grid.
pub(crate) fn is_decoration_line(line: &str) -> bool {
    SEPARATOR_LINE.is_match(line) || FOOTER_LINE.is_match(line)
}
