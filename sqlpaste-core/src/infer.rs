//! Majority-vote type inference over the sample values of one column.

use crate::column::SqlType;
use regex::Regex;
use std::sync::LazyLock;

static INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?[0-9]+$").unwrap());
static DECIMAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?[0-9]+[.,][0-9]+$").unwrap());
static DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4}-[0-9]{2}-[0-9]{2}|[0-9]{2}/[0-9]{2}/[0-9]{4}|[0-9]{4}/[0-9]{2}/[0-9]{2}|[0-9]{8}$)").unwrap()
});

const BOOLEAN_LITERALS: &[&str] = &["true", "false", "1", "0", "yes", "no", "si", "y", "n"];

/// Digit count at which an integer column is widened to BIGINT regardless of magnitude.
const BIGINT_DIGITS: usize = 10;

/// Reported class of a single sample value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    Integer,
    Decimal,
    Date,
    Boolean,
    Unclassified,
}

fn is_boolean_literal(value: &str) -> bool {
    BOOLEAN_LITERALS
        .iter()
        .any(|b| b.eq_ignore_ascii_case(value))
}

/// First matching kind, tested as integer, decimal, date, boolean.
pub fn classify_sample(value: &str) -> SampleKind {
    let value = value.trim();
    if INTEGER.is_match(value) {
        SampleKind::Integer
    } else if DECIMAL.is_match(value) {
        SampleKind::Decimal
    } else if DATE.is_match(value) {
        SampleKind::Date
    } else if is_boolean_literal(value) {
        SampleKind::Boolean
    } else {
        SampleKind::Unclassified
    }
}

fn is_null_sample(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case("NULL")
}

/// Whether an integer literal needs more than a signed 32-bit column.
fn needs_bigint(value: &str) -> bool {
    let digits = value.trim_start_matches('-');
    if digits.len() >= BIGINT_DIGITS {
        return true;
    }
    match value.parse::<i64>() {
        Ok(n) => i32::try_from(n).is_err(),
        Err(_) => true,
    }
}

/// Per-pattern tallies for one column. A sample may count toward several patterns.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct TypeVotes {
    pub total: usize,
    pub integer: usize,
    pub decimal: usize,
    pub date: usize,
    pub boolean: usize,
    pub wide_integer: bool,
}

impl TypeVotes {
    pub fn tally<S: AsRef<str>>(values: &[S]) -> Self {
        let mut votes = TypeVotes::default();
        for value in values.iter().map(|v| v.as_ref().trim()) {
            if is_null_sample(value) {
                continue;
            }
            votes.total += 1;
            if INTEGER.is_match(value) {
                votes.integer += 1;
                votes.wide_integer |= needs_bigint(value);
            }
            if DECIMAL.is_match(value) {
                votes.decimal += 1;
            }
            if DATE.is_match(value) {
                votes.date += 1;
            }
            if is_boolean_literal(value) {
                votes.boolean += 1;
            }
        }
        votes
    }

    /// Resolve the vote. BIT, DATE, DECIMAL and integer are checked in that order.
    pub fn decide(&self, threshold: f64) -> SqlType {
        if self.total == 0 {
            return SqlType::Varchar;
        }
        let reaches = |count: usize| count as f64 / self.total as f64 >= threshold;

        if reaches(self.boolean) {
            SqlType::Bit
        } else if reaches(self.date) {
            SqlType::Date
        } else if reaches(self.decimal) {
            SqlType::Decimal
        } else if reaches(self.integer) {
            if self.wide_integer {
                SqlType::BigInt
            } else {
                SqlType::Int
            }
        } else {
            SqlType::Varchar
        }
    }
}

/// Infer a column type from its sample values with the default 80% majority.
///
/// Blank and `NULL` samples are ignored; with nothing left the column stays VARCHAR.
pub fn infer_type<S: AsRef<str>>(values: &[S]) -> SqlType {
    infer_type_with_threshold(values, 0.8)
}

pub(crate) fn infer_type_with_threshold<S: AsRef<str>>(values: &[S], threshold: f64) -> SqlType {
    TypeVotes::tally(values).decide(threshold)
}
