use thiserror::Error;

/// Errors raised while reading and aggregating abundance tables.
///
/// Every variant is fatal for the run. Line numbers are 1-based positions in
/// the input table, columns are 1-based positions among the tab-separated
/// fields of that line.
#[derive(Error, Debug, PartialEq)]
pub enum SummaryError {
    #[error("line {line}: expected an identifier and a lineage field, found {fields} field(s)")]
    Parse { line: usize, fields: usize },

    #[error("line {line}, column {column}: invalid count value '{value}'")]
    Numeric {
        value: String,
        line: usize,
        column: usize,
    },

    #[error("line {line}: expected {expected} sample value(s), found {actual}")]
    ShapeMismatch {
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error("missing header line: {0}")]
    MissingHeader(String),
}

pub type Result<T> = std::result::Result<T, SummaryError>;
