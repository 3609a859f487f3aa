use crate::column::{ColumnDescriptor, SqlType};
use crate::config::ParseConfig;
use crate::dialect::map_vendor_type;
use crate::error::{ParseError, Result};
use crate::header::{header_score, looks_like_header_row};
use crate::infer::TypeVotes;
use crate::tokenize::{align_row_with_fill, content_lines, header_tokens, is_decoration_line, tokenize_line};
use crate::{debug, debug_verbose};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const NO_HEADER_WARNING: &str =
    "Column headers were not detected; generated names COL_1..COL_N were used. Rename them as needed.";
pub const NO_DATA_WARNING: &str =
    "Not enough data rows to infer column types; defaulted to VARCHAR.";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaParseResult {
    pub columns: Vec<ColumnDescriptor>,
    /// Non-fatal notes for the user, in the order they were raised
    pub warnings: Vec<String>,
    /// Data rows that passed alignment and fed type inference
    pub rows_sampled: usize,
}

impl SchemaParseResult {
    /// The first warning, if any.
    pub fn warning(&self) -> Option<&str> {
        self.warnings.first().map(String::as_str)
    }
}

/// Text pasted by the user. Either side may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PasteInput {
    /// `INFORMATION_SCHEMA.COLUMNS`-style listing
    pub structure_dump: Option<String>,
    /// Output rows of a `SELECT`
    pub result_set: Option<String>,
}

fn usable_lines<'a>(text: &'a str, config: &ParseConfig) -> Vec<&'a str> {
    content_lines(text)
        .filter(|line| !(config.skip_decorations && is_decoration_line(line)))
        .collect()
}

fn non_blank(text: &Option<String>) -> Option<&str> {
    text.as_deref().filter(|t| !t.trim().is_empty())
}

fn find_field(header: &[String], needles: &[&str]) -> Option<usize> {
    header.iter().position(|field| {
        let upper = field.to_uppercase();
        needles.iter().any(|n| upper.contains(n))
    })
}

/// Columns declared by an `INFORMATION_SCHEMA.COLUMNS`-style paste.
///
/// An empty list means the header was not recognised.
pub fn parse_structure_dump(text: &str) -> Vec<ColumnDescriptor> {
    parse_structure_dump_with_config(text, &ParseConfig::default())
}

#[cfg_attr(feature = "trace", tracing::instrument(skip_all, fields(bytes = text.len())))]
pub fn parse_structure_dump_with_config(text: &str, config: &ParseConfig) -> Vec<ColumnDescriptor> {
    let lines = usable_lines(text, config);
    let Some((first, rows)) = lines.split_first() else {
        return Vec::new();
    };

    let header = header_tokens(first);
    let (Some(name_idx), Some(type_idx)) = (
        find_field(&header, &["COLUMN", "CAMPO"]),
        find_field(&header, &["DATA_TYPE", "TIPO"]),
    ) else {
        debug!(config, "Structure dump header not recognised: {:?}", header);
        return Vec::new();
    };
    let nullable_idx = find_field(&header, &["NULL", "NULO"]);
    let length_idx = find_field(&header, &["LENGTH", "LONGITUD", "SIZE"]);

    let mut columns = Vec::new();
    for (line_no, line) in rows.iter().enumerate() {
        let Some(row) = align_row_with_fill(tokenize_line(line), header.len(), config.min_row_fill)
        else {
            debug_verbose!(config, "Skipping structure row {}: too few fields", line_no + 2);
            continue;
        };

        let name = row[name_idx].as_str();
        if name.is_empty() {
            debug_verbose!(config, "Skipping structure row {}: no column name", line_no + 2);
            continue;
        }

        let nullable = nullable_idx
            .map(|i| matches!(row[i].to_uppercase().as_str(), "YES" | "Y" | "1"))
            .unwrap_or(false);
        let length = length_idx
            .map(|i| row[i].as_str())
            .filter(|l| !l.eq_ignore_ascii_case("NULL"))
            .unwrap_or_default();

        columns.push(
            ColumnDescriptor::new(name, map_vendor_type(&row[type_idx]))
                .with_length(length)
                .with_nullable(nullable),
        );
    }

    debug!(config, "Structure dump declared {} column(s)", columns.len());
    columns
}

/// Columns inferred from the rows of a pasted result grid.
pub fn parse_result_set(text: &str) -> SchemaParseResult {
    parse_result_set_with_config(text, &ParseConfig::default())
}

#[cfg_attr(feature = "trace", tracing::instrument(skip_all, fields(bytes = text.len())))]
pub fn parse_result_set_with_config(text: &str, config: &ParseConfig) -> SchemaParseResult {
    let lines = usable_lines(text, config);
    let Some(first) = lines.first() else {
        return SchemaParseResult::default();
    };

    let mut warnings = Vec::new();
    let first_tokens = tokenize_line(first);
    debug!(
        config,
        "First line score {} over {} token(s)",
        header_score(&first_tokens),
        first_tokens.len()
    );

    let (names, data_lines) = if looks_like_header_row(&first_tokens) {
        (header_tokens(first), &lines[1..])
    } else {
        warnings.push(NO_HEADER_WARNING.to_string());
        let names: Vec<String> = (1..=first_tokens.len()).map(|i| format!("COL_{}", i)).collect();
        (names, &lines[..])
    };

    if names.is_empty() {
        return SchemaParseResult {
            warnings,
            ..Default::default()
        };
    }

    let mut rows = Vec::with_capacity(data_lines.len());
    for line in data_lines {
        let tokens = tokenize_line(line);
        let len = tokens.len();
        match align_row_with_fill(tokens, names.len(), config.min_row_fill) {
            Some(row) => rows.push(row),
            None => debug_verbose!(
                config,
                "Dropping row with {} of {} field(s) from sampling: {:?}",
                len,
                names.len(),
                line
            ),
        }
    }

    if rows.is_empty() {
        warnings.push(NO_DATA_WARNING.to_string());
        let columns = names
            .iter()
            .map(|name| ColumnDescriptor::new(name.as_str(), SqlType::Varchar))
            .collect();
        return SchemaParseResult {
            columns,
            warnings,
            rows_sampled: 0,
        };
    }

    let columns = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let samples: Vec<&str> = rows.iter().map(|row| row[i].as_str()).collect();
            let votes = TypeVotes::tally(&samples);
            let sql_type = votes.decide(config.majority_threshold);
            debug!(config, "Column {:?} -> {} ({:?})", name, sql_type, votes);
            ColumnDescriptor::new(name.as_str(), sql_type)
        })
        .collect();

    SchemaParseResult {
        columns,
        warnings,
        rows_sampled: rows.len(),
    }
}

/// Combine declared and inferred columns.
///
/// Structure columns keep their position, length and nullability; a VARCHAR
/// default is upgraded to a more specific inferred type of the same name
/// (case-insensitive) and a specific declared type is never replaced.
/// Columns only seen in the result set are appended in their original order.
pub fn merge_column_sets(
    structure_columns: &[ColumnDescriptor],
    result_columns: &[ColumnDescriptor],
) -> Vec<ColumnDescriptor> {
    if structure_columns.is_empty() {
        return result_columns.to_vec();
    }
    if result_columns.is_empty() {
        return structure_columns.to_vec();
    }

    let mut merged = structure_columns.to_vec();
    let mut by_name: HashMap<String, usize> = HashMap::with_capacity(merged.len());
    for (i, column) in merged.iter().enumerate() {
        by_name.entry(column.name.to_uppercase()).or_insert(i);
    }

    for column in result_columns {
        match by_name.get(&column.name.to_uppercase()) {
            Some(&i) => {
                if merged[i].sql_type.is_default() && !column.sql_type.is_default() {
                    merged[i].sql_type = column.sql_type;
                }
            }
            None => merged.push(column.clone()),
        }
    }

    merged
}

/// Parse whichever pastes are present and merge them.
///
/// Fails when nothing was pasted or when a structure dump was given but its
/// format was not recognised.
#[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
pub fn parse_pasted(input: &PasteInput, config: &ParseConfig) -> Result<SchemaParseResult> {
    let structure_text = non_blank(&input.structure_dump);
    let result_text = non_blank(&input.result_set);

    if structure_text.is_none() && result_text.is_none() {
        return Err(ParseError::EmptyInput);
    }

    let structure_columns = match structure_text {
        Some(text) => {
            let columns = parse_structure_dump_with_config(text, config);
            if columns.is_empty() {
                return Err(ParseError::UnrecognizedStructureDump);
            }
            columns
        }
        None => Vec::new(),
    };

    let inferred = result_text
        .map(|text| parse_result_set_with_config(text, config))
        .unwrap_or_default();

    Ok(SchemaParseResult {
        columns: merge_column_sets(&structure_columns, &inferred.columns),
        warnings: inferred.warnings,
        rows_sampled: inferred.rows_sampled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRUCTURE: &str = "COLUMN_NAME\tDATA_TYPE\tCHARACTER_MAXIMUM_LENGTH\tIS_NULLABLE\n\
                             ESTUDIANTE_ID\tint\tNULL\tNO\n\
                             NOMBRE_COMPLETO\tnvarchar\t150\tYES\n\
                             FECHA_INGRESO\tdate\tNULL\tYES\n\
                             OBSERVACION\tvarchar\t-1\tY";

    fn column(name: &str, sql_type: SqlType) -> ColumnDescriptor {
        ColumnDescriptor::new(name, sql_type)
    }

    #[test]
    fn test_structure_dump_columns() {
        let columns = parse_structure_dump(STRUCTURE);
        assert_eq!(columns.len(), 4);

        assert_eq!(columns[0].name, "ESTUDIANTE_ID");
        assert_eq!(columns[0].sql_type, SqlType::Int);
        assert_eq!(columns[0].length, "");
        assert!(!columns[0].nullable);
        assert!(columns[0].is_key_candidate);
        assert_eq!(columns[0].description, "Identifier of Estudiante");

        assert_eq!(columns[1].sql_type, SqlType::NVarchar);
        assert_eq!(columns[1].length, "150");
        assert!(columns[1].nullable);

        assert_eq!(columns[2].sql_type, SqlType::Date);
        assert_eq!(columns[3].length, "-1");
        assert!(columns[3].nullable);
    }

    #[test]
    fn test_structure_dump_spanish_header() {
        let text = "CAMPO | TIPO | LONGITUD\nCOD_SEDE | varchar2(10) | 10\nVALOR | NUMBER | NULL";
        let columns = parse_structure_dump(text);
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].sql_type, SqlType::Varchar);
        assert_eq!(columns[0].length, "10");
        assert_eq!(columns[1].sql_type, SqlType::Number);
        assert_eq!(columns[1].length, "");
        assert!(!columns[1].nullable);
    }

    #[test]
    fn test_structure_dump_bordered_grid() {
        let text = "| COLUMN_NAME | DATA_TYPE | IS_NULLABLE |\n\
                    |-------------|-----------|-------------|\n\
                    | ID | int | 0 |\n\
                    | NAME | varchar | 1 |";
        let columns = parse_structure_dump(text);
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].name, "ID");
        assert_eq!(columns[0].sql_type, SqlType::Int);
        assert!(!columns[0].nullable);
        assert_eq!(columns[1].name, "NAME");
        assert_eq!(columns[1].sql_type, SqlType::Varchar);
        assert!(columns[1].nullable);
    }

    #[test]
    fn test_structure_dump_unrecognised_header() {
        assert!(parse_structure_dump("NAME\tKIND\nA\tint").is_empty());
        assert!(parse_structure_dump("COLUMN_NAME\tLEN\nA\t10").is_empty());
        assert!(parse_structure_dump("").is_empty());
    }

    #[test]
    fn test_structure_dump_unknown_type_and_missing_name() {
        let text = "COLUMN_NAME\tDATA_TYPE\nGEO\tgeography\n\tint\n";
        let columns = parse_structure_dump(text);
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].sql_type, SqlType::Varchar);
    }

    #[test]
    fn test_result_set_with_header() {
        let text = "COD_PERIODO_ACADEMICO\tNUM_DOC_PERSONA\n202110\t1046908774\n202110\t1234567890";
        let result = parse_result_set(text);
        assert!(result.warnings.is_empty());
        assert_eq!(result.rows_sampled, 2);
        assert_eq!(
            result.columns,
            vec![
                column("COD_PERIODO_ACADEMICO", SqlType::Int),
                column("NUM_DOC_PERSONA", SqlType::BigInt),
            ]
        );
    }

    #[test]
    fn test_result_set_without_header() {
        let result = parse_result_set("202110\tCC\t1046908774");
        let names: Vec<&str> = result.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["COL_1", "COL_2", "COL_3"]);
        assert_eq!(result.warning(), Some(NO_HEADER_WARNING));
        assert_eq!(result.rows_sampled, 1);
        assert_eq!(result.columns[0].sql_type, SqlType::Int);
        assert_eq!(result.columns[1].sql_type, SqlType::Varchar);
        assert_eq!(result.columns[2].sql_type, SqlType::BigInt);
        assert_eq!(result.columns[0].description, "Column 1");
    }

    #[test]
    fn test_result_set_header_only() {
        let result = parse_result_set("CLIENTE_ID\tNOMBRE_CLIENTE\n");
        assert_eq!(result.columns.len(), 2);
        assert!(result.columns.iter().all(|c| c.sql_type == SqlType::Varchar));
        assert_eq!(result.warnings, vec![NO_DATA_WARNING.to_string()]);
        assert_eq!(result.rows_sampled, 0);
    }

    #[test]
    fn test_short_rows_are_not_sampled() {
        let text = "A_ID\tB_ID\tC_ID\tD_ID\n1\t2\t3\t4\nx\n5\t6\n";
        let result = parse_result_set(text);
        assert_eq!(result.rows_sampled, 2);
        assert_eq!(result.columns.len(), 4);
        assert_eq!(result.columns[0].sql_type, SqlType::Int);
        // the padded row leaves one blank sample, which is ignored
        assert_eq!(result.columns[3].sql_type, SqlType::Int);
    }

    #[test]
    fn test_empty_result_set() {
        assert_eq!(parse_result_set(""), SchemaParseResult::default());
        assert_eq!(parse_result_set("\n  \r\n"), SchemaParseResult::default());
    }

    #[test]
    fn test_ssms_text_output_matches_tab_output() {
        let text_mode = "CLIENTE_ID  FECHA_ALTA\n\
                         ----------- ----------\n\
                         1           2024-01-01\n\
                         2           2024-03-15\n\
                         \n\
                         (2 rows affected)\n";
        let tab_mode = "CLIENTE_ID\tFECHA_ALTA\n1\t2024-01-01\n2\t2024-03-15";
        assert_eq!(parse_result_set(text_mode), parse_result_set(tab_mode));
    }

    #[test]
    fn test_bordered_result_grid_keeps_alignment() {
        let text = "| CLIENTE_ID | FECHA_ALTA |\n|----|----|\n| 1 | 2024-01-01 |\n| 2 | 2024-03-15 |";
        let result = parse_result_set(text);
        assert_eq!(result.rows_sampled, 2);
        assert_eq!(
            result.columns,
            vec![
                column("CLIENTE_ID", SqlType::Int),
                column("FECHA_ALTA", SqlType::Date),
            ]
        );
    }

    #[test]
    fn test_keep_decorations_samples_separator() {
        let config = ParseConfig {
            skip_decorations: false,
            ..Default::default()
        };
        let text = "CLIENTE_ID  TOTAL\n----------- -----\n1           10\n";
        let result = parse_result_set_with_config(text, &config);
        assert_eq!(result.rows_sampled, 2);
        assert_eq!(result.columns[0].sql_type, SqlType::Varchar);
    }

    #[test]
    fn test_custom_threshold() {
        let config = ParseConfig {
            majority_threshold: 0.5,
            ..Default::default()
        };
        let text = "MONTO_TOTAL\n1\n2\nabc\n";
        assert_eq!(parse_result_set(text).columns[0].sql_type, SqlType::Varchar);
        assert_eq!(
            parse_result_set_with_config(text, &config).columns[0].sql_type,
            SqlType::Int
        );
    }

    #[test]
    fn test_merge_upgrades_default_type() {
        let merged = merge_column_sets(&[column("X", SqlType::Varchar)], &[column("x", SqlType::Int)]);
        assert_eq!(merged, vec![column("X", SqlType::Int)]);
    }

    #[test]
    fn test_merge_never_downgrades() {
        let merged = merge_column_sets(&[column("X", SqlType::Date)], &[column("X", SqlType::Varchar)]);
        assert_eq!(merged, vec![column("X", SqlType::Date)]);

        let merged = merge_column_sets(&[column("X", SqlType::Date)], &[column("X", SqlType::Int)]);
        assert_eq!(merged[0].sql_type, SqlType::Date);
    }

    #[test]
    fn test_merge_keeps_structure_metadata_and_appends_extras() {
        let structure = vec![
            column("A", SqlType::Varchar).with_length("20").with_nullable(true),
            column("B", SqlType::Bit),
        ];
        let result = vec![
            column("C", SqlType::Int),
            column("a", SqlType::Date),
            column("D", SqlType::Varchar),
        ];
        let merged = merge_column_sets(&structure, &result);
        let names: Vec<&str> = merged.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
        assert_eq!(merged[0].sql_type, SqlType::Date);
        assert_eq!(merged[0].length, "20");
        assert!(merged[0].nullable);
    }

    #[test]
    fn test_merge_with_empty_side() {
        let columns = vec![column("A", SqlType::Int)];
        assert_eq!(merge_column_sets(&columns, &[]), columns);
        assert_eq!(merge_column_sets(&[], &columns), columns);
    }

    #[test]
    fn test_parse_pasted_errors() {
        let config = ParseConfig::default();
        assert_eq!(
            parse_pasted(&PasteInput::default(), &config),
            Err(ParseError::EmptyInput)
        );
        let input = PasteInput {
            structure_dump: Some("NAME\tKIND\nA\tint".to_string()),
            result_set: Some("A\n1".to_string()),
        };
        assert_eq!(
            parse_pasted(&input, &config),
            Err(ParseError::UnrecognizedStructureDump)
        );
    }
}
