//! CLI command implementations.

pub mod call;
pub mod formats;
pub mod serve;

use serde::Serialize;
use tabula::OperationResult;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Writes responses to stdout.
pub struct Output {
    compact: bool,
}

impl Output {
    pub fn new(compact: bool) -> Self {
        Self { compact }
    }

    pub fn print<T: Serialize>(&self, value: &T) -> CommandResult {
        let text = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        println!("{}", text);
        Ok(())
    }

    /// Print the response; a failure is printed too, then returned so the
    /// process exits non-zero.
    pub fn report<T: Serialize>(&self, result: OperationResult<T>) -> CommandResult {
        let text = if self.compact {
            result.to_json()
        } else {
            result.to_json_pretty()
        };
        println!("{}", text);

        match result.failure() {
            Some(failure) => Err(format!("[{}] {}", failure.error_kind, failure.message).into()),
            None => Ok(()),
        }
    }
}
