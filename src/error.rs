use thiserror::Error;

use crate::types::TypeTag;

/// Convenience result type used across ingestion, dataset access and statistics.
pub type DataResult<T> = Result<T, DataError>;

/// Error type returned by the tokenizer, the dataset and the statistics functions.
///
/// This is a single error enum shared by every layer of the crate.
#[derive(Debug, Error)]
pub enum DataError {
    /// Underlying I/O error (e.g. file not found, permission denied, failed write).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writer error raised while serializing a dataset.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON encoding error raised while exporting a profile.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input bytes are not valid UTF-8.
    #[error("input is not valid utf-8 (valid up to byte {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },

    /// A quoted field reached the end of the input without a closing quote.
    #[error("unterminated quoted field starting at byte {offset}")]
    UnterminatedQuote { offset: usize },

    /// Something other than whitespace or a delimiter followed a closing quote.
    #[error("unexpected character '{found}' after closing quote at byte {offset}")]
    TrailingCharacters { offset: usize, found: char },

    /// A record does not have the same number of fields as the header.
    #[error("malformed record at row {row}: expected {expected} fields, found {found}")]
    MalformedRecord {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A field tagged numeric could not be converted (e.g. integer overflow).
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },

    /// No column has this exact name.
    #[error("unknown column '{name}'")]
    UnknownColumn { name: String },

    /// A column index is past the last column.
    #[error("column index {index} out of range ({columns} columns)")]
    ColumnOutOfRange { index: usize, columns: usize },

    /// A row index is past the last row.
    #[error("row index {index} out of range ({rows} rows)")]
    RowOutOfRange { index: usize, rows: usize },

    /// The operation needs a different stored type than the one found.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: TypeTag,
    },

    /// The statistic needs at least one non-null value.
    #[error("no data")]
    EmptyData,

    /// An integer sum does not fit in the requested type.
    #[error("arithmetic overflow")]
    Overflow,

    /// Every value occurs exactly once.
    #[error("no mode value exists")]
    NoModeExists,
}
