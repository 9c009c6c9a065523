//! Error types for the Tabula library.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-checkable category of a failure.
///
/// Every [`TabulaError`] maps onto exactly one kind; callers branch on the
/// kind and show the error's message to humans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    FileNotFound,
    UnsupportedFormat,
    DecodeError,
    EncodeError,
    ColumnNotFound,
    UnsupportedOperator,
    InvalidArgument,
    OutOfMemory,
}

impl ErrorKind {
    /// The snake_case name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::FileNotFound => "file_not_found",
            ErrorKind::UnsupportedFormat => "unsupported_format",
            ErrorKind::DecodeError => "decode_error",
            ErrorKind::EncodeError => "encode_error",
            ErrorKind::ColumnNotFound => "column_not_found",
            ErrorKind::UnsupportedOperator => "unsupported_operator",
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::OutOfMemory => "out_of_memory",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for Tabula operations.
#[derive(Debug, Error)]
pub enum TabulaError {
    /// The input path does not exist.
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// No registered format matches the hint, extension or content.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The decoder rejected the file's structure.
    #[error("Failed to decode '{}': {message}", path.display())]
    Decode { path: PathBuf, message: String },

    /// Writing the output file failed.
    #[error("Failed to encode '{}': {message}", path.display())]
    Encode { path: PathBuf, message: String },

    /// Column name is not present in the table.
    #[error("Column '{column}' not found. Available columns: {}", available.join(", "))]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },

    /// Operator is unknown or cannot be applied to the column's type.
    #[error("Unsupported operator '{operator}': {reason}")]
    UnsupportedOperator { operator: String, reason: String },

    /// A caller-supplied argument is missing or out of range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The input could not be held in memory.
    #[error("Out of memory loading '{}' ({size_bytes} bytes)", path.display())]
    OutOfMemory { path: PathBuf, size_bytes: u64 },

    /// A result could not be rendered as JSON.
    #[error("Failed to serialize response: {0}")]
    Response(#[source] serde_json::Error),
}

impl TabulaError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TabulaError::FileNotFound { .. } => ErrorKind::FileNotFound,
            TabulaError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            TabulaError::Decode { .. } => ErrorKind::DecodeError,
            TabulaError::Encode { .. } => ErrorKind::EncodeError,
            TabulaError::ColumnNotFound { .. } => ErrorKind::ColumnNotFound,
            TabulaError::UnsupportedOperator { .. } => ErrorKind::UnsupportedOperator,
            TabulaError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            TabulaError::OutOfMemory { .. } => ErrorKind::OutOfMemory,
            TabulaError::Response(_) => ErrorKind::EncodeError,
        }
    }

    pub(crate) fn decode(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        TabulaError::Decode {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn encode(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        TabulaError::Encode {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Result type alias for Tabula operations.
pub type Result<T> = std::result::Result<T, TabulaError>;
