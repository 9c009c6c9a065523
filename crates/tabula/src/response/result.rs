//! The success-or-failure envelope every operation returns.

use serde::Serialize;

use crate::error::{ErrorKind, Result, TabulaError};

// Emitted if even the failure payload cannot be rendered.
const FALLBACK_JSON: &str =
    r#"{"error_kind":"encode_error","message":"response could not be serialized"}"#;

/// Stable two-field failure shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    pub error_kind: ErrorKind,
    pub message: String,
}

impl From<TabulaError> for ErrorPayload {
    fn from(err: TabulaError) -> Self {
        Self {
            error_kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Outcome of one operation.
///
/// Serializes as the success payload itself, or as an [`ErrorPayload`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OperationResult<T> {
    Success(T),
    Failure(ErrorPayload),
}

impl<T> OperationResult<T> {
    /// The payload, if the operation succeeded.
    pub fn success(self) -> Option<T> {
        match self {
            OperationResult::Success(value) => Some(value),
            OperationResult::Failure(_) => None,
        }
    }

    /// The failure, if the operation failed.
    pub fn failure(&self) -> Option<&ErrorPayload> {
        match self {
            OperationResult::Success(_) => None,
            OperationResult::Failure(payload) => Some(payload),
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.failure().map(|f| f.error_kind)
    }
}

impl<T: Serialize> OperationResult<T> {
    /// Render as a JSON string. Never fails.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| {
            let payload = ErrorPayload::from(TabulaError::Response(err));
            serde_json::to_string(&payload).unwrap_or_else(|_| FALLBACK_JSON.to_string())
        })
    }

    /// Render as indented JSON. Never fails.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_json())
    }
}

impl<T> From<Result<T>> for OperationResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => OperationResult::Success(value),
            Err(err) => OperationResult::Failure(err.into()),
        }
    }
}

impl<T> From<TabulaError> for OperationResult<T> {
    fn from(err: TabulaError) -> Self {
        OperationResult::Failure(err.into())
    }
}
