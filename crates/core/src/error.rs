//! Error types for the standings converter.

use standings_sheet::SheetError;
use thiserror::Error;

/// Result type for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Errors that abort a conversion run.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Workbook or sheet could not be read (missing file, missing sheet, ...).
    #[error(transparent)]
    Sheet(#[from] SheetError),

    /// A required column is absent from a sheet.
    #[error("Sheet '{sheet}' is missing required column '{column}'")]
    MissingColumn { sheet: String, column: String },

    /// A required column appears more than once.
    #[error("Sheet '{sheet}' has more than one '{column}' column")]
    DuplicateColumn { sheet: String, column: String },

    /// A required cell is empty.
    #[error("Sheet '{sheet}' row {row}: '{column}' is empty")]
    MissingValue {
        sheet: String,
        row: usize,
        column: String,
    },

    /// A numeric cell holds something that is not a number.
    #[error("Sheet '{sheet}' row {row}: '{column}' is not a number ({kind} '{value}')")]
    MalformedNumber {
        sheet: String,
        row: usize,
        column: String,
        kind: &'static str,
        value: String,
    },

    /// Season configuration is invalid.
    #[error("Season configuration error: {0}")]
    Config(String),

    /// I/O error while writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Why the timing detail for one driver in one race could not be recovered.
///
/// Never fatal: the joiner logs it and falls back to empty timing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    #[error("detail sheet '{0}' not found")]
    SheetMissing(String),

    #[error("detail sheet '{sheet}' has no '{column}' column")]
    ColumnMissing { sheet: String, column: String },

    #[error("detail sheet '{sheet}' has more than one '{column}' column")]
    DuplicateColumn { sheet: String, column: String },

    #[error("detail sheet '{sheet}' could not be read: {message}")]
    Unreadable { sheet: String, message: String },

    #[error("no row for this driver in '{0}'")]
    NoMatch(String),

    #[error("'{column}' in '{sheet}' is not a number ({value})")]
    Malformed {
        sheet: String,
        column: String,
        value: String,
    },
}
