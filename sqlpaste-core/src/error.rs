use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("No structure dump or result set text provided")]
    EmptyInput,
    #[error(
        "Unrecognised structure dump: header needs a column name field (COLUMN/CAMPO) \
         and a data type field (DATA_TYPE/TIPO)"
    )]
    UnrecognizedStructureDump,
}

pub type Result<T> = std::result::Result<T, ParseError>;
