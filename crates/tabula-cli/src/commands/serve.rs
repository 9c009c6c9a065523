//! Serve command - JSON-lines tool calls over stdin/stdout.
//!
//! Each input line is `{"tool": "<name>", "arguments": {...}}`; each output
//! line is the tool's response or an error payload. Blank lines are skipped.

use std::io::{BufRead, Write};

use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use tabula::{OperationResult, Tabula, TabulaError};
use tracing::{debug, info};

use super::CommandResult;

#[derive(Debug, Deserialize)]
struct Request {
    #[serde(alias = "name")]
    tool: String,
    #[serde(default, alias = "args")]
    arguments: Map<String, JsonValue>,
}

pub fn run(tabula: &Tabula) -> CommandResult {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    let mut handled = 0usize;

    info!("serving tool calls on stdin");
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = handle_line(tabula, &line);
        writeln!(stdout, "{}", response)?;
        stdout.flush()?;
        handled += 1;
    }

    info!(calls = handled, "stdin closed");
    Ok(())
}

fn handle_line(tabula: &Tabula, line: &str) -> String {
    match serde_json::from_str::<Request>(line) {
        Ok(request) => {
            debug!(tool = %request.tool, "call");
            tabula.call(&request.tool, &request.arguments).to_json()
        }
        Err(e) => {
            let result: OperationResult<()> =
                TabulaError::InvalidArgument(format!("malformed request: {}", e)).into();
            result.to_json()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_line_lists_formats() {
        let response = handle_line(&Tabula::new(), r#"{"tool": "list_formats"}"#);
        let value: JsonValue = serde_json::from_str(&response).unwrap();
        assert!(value["total_formats"].as_u64().unwrap() >= 2);
    }

    #[test]
    fn test_handle_line_rejects_garbage() {
        let response = handle_line(&Tabula::new(), "not json");
        let value: JsonValue = serde_json::from_str(&response).unwrap();
        assert_eq!(value["error_kind"], "invalid_argument");
    }
}
