use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static GENERATED_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^COL_([0-9]+)$").unwrap());

const KEY_SUFFIXES: &[&str] = &["_ID", "_CODIGO", "_CODE", "_KEY", "_PK", "_NUM"];
const KEY_NAMES: &[&str] = &["ID", "CODIGO", "CODE", "KEY"];

/// Coarse SQL column types a paste can resolve to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SqlType {
    #[default]
    Varchar,
    NVarchar,
    Text,
    Int,
    BigInt,
    Decimal,
    Number,
    Float,
    Date,
    DateTime,
    DateTime2,
    Bit,
}

impl SqlType {
    pub const ALL: [SqlType; 12] = [
        SqlType::Varchar,
        SqlType::NVarchar,
        SqlType::Text,
        SqlType::Int,
        SqlType::BigInt,
        SqlType::Decimal,
        SqlType::Number,
        SqlType::Float,
        SqlType::Date,
        SqlType::DateTime,
        SqlType::DateTime2,
        SqlType::Bit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SqlType::Varchar => "VARCHAR",
            SqlType::NVarchar => "NVARCHAR",
            SqlType::Text => "TEXT",
            SqlType::Int => "INT",
            SqlType::BigInt => "BIGINT",
            SqlType::Decimal => "DECIMAL",
            SqlType::Number => "NUMBER",
            SqlType::Float => "FLOAT",
            SqlType::Date => "DATE",
            SqlType::DateTime => "DATETIME",
            SqlType::DateTime2 => "DATETIME2",
            SqlType::Bit => "BIT",
        }
    }

    /// VARCHAR is what an inconclusive inference or an unknown vendor type falls back to.
    pub fn is_default(&self) -> bool {
        matches!(self, SqlType::Varchar)
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SqlType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        SqlType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| format!("Unknown SQL type: {}", s.trim()))
    }
}

/// One detected or declared column.
///
/// The usage fields (`used_in_visuals`, `participates_in_filters`, `is_metric`) start
/// empty and belong to whoever consumes the schema; parsing never reads them back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub sql_type: SqlType,
    /// Declared length from a structure dump; empty when unknown.
    pub length: String,
    pub nullable: bool,
    pub is_key_candidate: bool,
    pub description: String,
    pub used_in_visuals: Vec<String>,
    pub participates_in_filters: bool,
    pub is_metric: bool,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        let name = name.into().trim().to_string();
        Self {
            is_key_candidate: is_key_candidate(&name),
            description: describe_column(&name),
            name,
            sql_type,
            length: String::new(),
            nullable: false,
            used_in_visuals: Vec::new(),
            participates_in_filters: false,
            is_metric: false,
        }
    }

    pub fn with_length(mut self, length: impl Into<String>) -> Self {
        self.length = length.into();
        self
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }
}

/// Whether the naming convention suggests a primary or foreign key.
pub fn is_key_candidate(name: &str) -> bool {
    let upper = name.trim().to_uppercase();
    KEY_NAMES.contains(&upper.as_str())
        || upper.starts_with("COD_")
        || KEY_SUFFIXES.iter().any(|s| upper.ends_with(s))
}

fn title_case(words: &str) -> String {
    words
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

enum Affix {
    Prefix(&'static str),
    Suffix(&'static str),
}

// First match wins.
const GLOSS_RULES: &[(Affix, &str)] = &[
    (Affix::Suffix("_ID"), "Identifier of"),
    (Affix::Prefix("COD_"), "Code of"),
    (Affix::Suffix("_CODIGO"), "Code of"),
    (Affix::Prefix("NOM_"), "Name of"),
    (Affix::Suffix("_NOMBRE"), "Name of"),
    (Affix::Suffix("_FECHA"), "Date of"),
    (Affix::Prefix("NUM_"), "Number of"),
];

/// Human-readable gloss derived from the shape of a column name.
pub fn describe_column(name: &str) -> String {
    let name = name.trim();
    if let Some(caps) = GENERATED_NAME.captures(name) {
        return format!("Column {}", &caps[1]);
    }

    let upper = name.to_uppercase();
    for (affix, lead) in GLOSS_RULES {
        // Affixes are ASCII, so byte offsets computed on `upper` line up with `name`.
        let rest = match affix {
            Affix::Prefix(p) if upper.starts_with(p) && name.is_char_boundary(p.len()) => {
                &name[p.len()..]
            }
            Affix::Suffix(s)
                if upper.ends_with(s)
                    && upper.len() == name.len()
                    && name.is_char_boundary(name.len() - s.len()) =>
            {
                &name[..name.len() - s.len()]
            }
            _ => continue,
        };
        let subject = title_case(rest);
        if !subject.is_empty() {
            return format!("{} {}", lead, subject);
        }
    }

    title_case(name)
}
