//! Call command - invoke a tool by name, as a tool host would.

use tabula::{tool_definitions, Tabula};

use super::{CommandResult, Output};

pub fn run(tabula: &Tabula, tool: &str, args: &str, out: &Output) -> CommandResult {
    let response = tabula.call_json(tool, args);
    let value: serde_json::Value = serde_json::from_str(&response)?;
    out.print(&value)?;

    match value.get("error_kind").and_then(|kind| kind.as_str()) {
        Some(kind) => {
            let message = value["message"].as_str().unwrap_or_default();
            Err(format!("[{}] {}", kind, message).into())
        }
        None => Ok(()),
    }
}

pub fn list_tools(out: &Output) -> CommandResult {
    out.print(&tool_definitions())
}
