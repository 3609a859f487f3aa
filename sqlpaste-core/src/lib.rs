pub mod column;
pub mod config;
pub mod dialect;
pub mod error;
pub mod header;
pub mod infer;
pub mod schema;
pub mod tokenize;


// Re-export commonly used items
pub use column::{describe_column, is_key_candidate, ColumnDescriptor, SqlType};
pub use config::{DebugVerbosity, ParseConfig};
pub use dialect::map_vendor_type;
pub use error::ParseError;
pub use header::{header_score, looks_like_header_row};
pub use infer::{classify_sample, infer_type, SampleKind};
pub use schema::{
    merge_column_sets, parse_pasted, parse_result_set, parse_result_set_with_config,
    parse_structure_dump, parse_structure_dump_with_config, PasteInput, SchemaParseResult,
};
pub use tokenize::{align_row, header_tokens, tokenize_line};

/// Helper function to infer a column schema from either or both kinds of paste
pub fn infer_columns(
    structure_dump: Option<&str>,
    result_set: Option<&str>,
    config: Option<ParseConfig>,
) -> Result<SchemaParseResult, ParseError> {
    let input = PasteInput {
        structure_dump: structure_dump.map(str::to_string),
        result_set: result_set.map(str::to_string),
    };
    parse_pasted(&input, &config.unwrap_or_default())
}

/// Create a default parse configuration
pub fn default_config() -> ParseConfig {
    ParseConfig::default()
}
