//! Vendor type names (SQL Server and Oracle) mapped onto [`SqlType`].

use crate::column::SqlType;

const VENDOR_TYPES: &[(&str, SqlType)] = &[
    // character
    ("VARCHAR", SqlType::Varchar),
    ("CHAR", SqlType::Varchar),
    ("VARCHAR2", SqlType::Varchar),
    ("CHARACTER VARYING", SqlType::Varchar),
    ("NVARCHAR", SqlType::NVarchar),
    ("NCHAR", SqlType::NVarchar),
    ("NVARCHAR2", SqlType::NVarchar),
    ("TEXT", SqlType::Text),
    ("NTEXT", SqlType::Text),
    ("CLOB", SqlType::Text),
    ("NCLOB", SqlType::Text),
    ("LONG", SqlType::Text),
    // exact numerics
    ("INT", SqlType::Int),
    ("INTEGER", SqlType::Int),
    ("SMALLINT", SqlType::Int),
    ("TINYINT", SqlType::Int),
    ("BIGINT", SqlType::BigInt),
    ("DECIMAL", SqlType::Decimal),
    ("NUMERIC", SqlType::Decimal),
    ("MONEY", SqlType::Decimal),
    ("SMALLMONEY", SqlType::Decimal),
    ("NUMBER", SqlType::Number),
    // approximate numerics
    ("FLOAT", SqlType::Float),
    ("REAL", SqlType::Float),
    ("DOUBLE", SqlType::Float),
    ("DOUBLE PRECISION", SqlType::Float),
    ("BINARY_FLOAT", SqlType::Float),
    ("BINARY_DOUBLE", SqlType::Float),
    // temporal
    ("DATE", SqlType::Date),
    ("DATETIME", SqlType::DateTime),
    ("SMALLDATETIME", SqlType::DateTime),
    ("TIMESTAMP", SqlType::DateTime),
    ("DATETIME2", SqlType::DateTime2),
    ("DATETIMEOFFSET", SqlType::DateTime2),
    // boolean
    ("BIT", SqlType::Bit),
    ("BOOLEAN", SqlType::Bit),
];

/// Map a vendor type spelling such as `nvarchar(50)` or `NUMBER(10,2)` to a [`SqlType`].
///
/// Parameters in parentheses are ignored. Unknown names fall back to VARCHAR.
pub fn map_vendor_type(raw: &str) -> SqlType {
    let base = raw.split('(').next().unwrap_or_default();
    let normalized = base
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();

    VENDOR_TYPES
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, t)| *t)
        .unwrap_or_default()
}
