//! Error types for data operations
//!
//! [`DataError`] covers the delimited-text parser, [`LoadError`] is the
//! taxonomy surfaced by the data loader: a non-success fetch or a parse failure.

use thiserror::Error;

pub use crate::constants::{MAX_CSV_ROWS, MAX_CSV_SIZE_MB};

/// Errors raised while parsing delimited text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    /// Resource body is not UTF-8
    #[error("resource is not valid UTF-8: {0}")]
    InvalidEncoding(String),

    /// Resource is too large for eager loading
    #[error("File too large: {size_mb}MB (max {max_mb}MB)")]
    TooLarge { size_mb: u64, max_mb: usize },

    /// Too many rows for eager loading
    #[error("Too many rows: {rows} (max {max_rows})")]
    TooManyRows { rows: usize, max_rows: usize },

    /// Resource has no header line
    #[error("Empty file")]
    EmptyFile,

    /// Header line names no columns
    #[error("No columns found")]
    NoColumns,

    /// A quoted field runs to the end of input
    #[error("Unterminated quoted field starting on line {line}")]
    UnterminatedQuote { line: usize },
}

/// Result type alias for parser operations
pub type DataResult<T> = Result<T, DataError>;

/// Failure of a single load attempt
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The fetch completed with a non-success status
    #[error("HTTP error! status: {status}")]
    Network { status: u16 },

    /// The body could not be parsed into records
    #[error("Parse error: {message}")]
    Parse { message: String },
}

impl LoadError {
    pub fn network(status: u16) -> Self {
        Self::Network { status }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// HTTP status for network failures
    pub fn status(&self) -> Option<u16> {
        match self {
            LoadError::Network { status } => Some(*status),
            LoadError::Parse { .. } => None,
        }
    }
}

impl From<DataError> for LoadError {
    fn from(err: DataError) -> Self {
        LoadError::parse(err.to_string())
    }
}

/// Result type alias for load operations
pub type LoadResult<T> = Result<T, LoadError>;
