//! Name-plus-arguments dispatch for tool hosts.
//!
//! A host registers each [`ToolName`] with its description and argument
//! schema, then forwards calls to [`Tabula::call`] or [`Tabula::call_json`].

use std::path::Path;
use std::str::FromStr;

use serde::Serialize;
use serde_json::{json, Map, Value as JsonValue};

use crate::error::{Result, TabulaError};
use crate::response::{ConvertResponse, FormatsResponse, OperationResult};
use crate::table::parse_boolean;
use crate::tabula::Tabula;
use crate::transform::{FilterOperator, FilterSpec};

/// The operations exposed to tool hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    Load,
    Sample,
    Analyze,
    ColumnStats,
    Filter,
    Sort,
    Convert,
    ListFormats,
}

impl ToolName {
    pub const ALL: [ToolName; 8] = [
        ToolName::Load,
        ToolName::Sample,
        ToolName::Analyze,
        ToolName::ColumnStats,
        ToolName::Filter,
        ToolName::Sort,
        ToolName::Convert,
        ToolName::ListFormats,
    ];

    /// Registered name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::Load => "load_data",
            ToolName::Sample => "get_data_sample",
            ToolName::Analyze => "analyze_data",
            ToolName::ColumnStats => "get_column_stats",
            ToolName::Filter => "filter_data",
            ToolName::Sort => "sort_data",
            ToolName::Convert => "convert_data",
            ToolName::ListFormats => "get_supported_formats",
        }
    }

    /// Short name, also accepted by [`FromStr`].
    pub fn alias(&self) -> &'static str {
        match self {
            ToolName::Load => "load",
            ToolName::Sample => "sample",
            ToolName::Analyze => "analyze",
            ToolName::ColumnStats => "column_stats",
            ToolName::Filter => "filter",
            ToolName::Sort => "sort",
            ToolName::Convert => "convert",
            ToolName::ListFormats => "list_formats",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolName::Load => {
                "Load a data file and report its row count, column names and inferred column types"
            }
            ToolName::Sample => "Return the first rows of a data file",
            ToolName::Analyze => {
                "Describe the structure of a data file: each column's type and a few example values"
            }
            ToolName::ColumnStats => {
                "Statistics for one column: counts, nulls, distinct values and, for numeric columns, min, max, mean, median and standard deviation"
            }
            ToolName::Filter => {
                "Keep rows whose column value satisfies a comparison, optionally saving the result to a file"
            }
            ToolName::Sort => {
                "Sort rows by a column, optionally saving the result to a file. Nulls sort last"
            }
            ToolName::Convert => {
                "Convert a data file to another format, chosen by the destination's extension"
            }
            ToolName::ListFormats => "List the file formats that can be read or written",
        }
    }

    /// JSON schema for the tool's arguments.
    pub fn parameters_schema(&self) -> JsonValue {
        let path = json!({
            "type": "string",
            "description": "Path to the data file"
        });
        let column = json!({
            "type": "string",
            "description": "Column name"
        });
        let operators = FilterOperator::ALL.map(|o| o.as_str());
        let output_path = json!({
            "type": "string",
            "description": "Where to write the result; omit to return rows inline"
        });

        match self {
            ToolName::Load => json!({
                "type": "object",
                "properties": {
                    "path": path,
                    "format": {
                        "type": "string",
                        "description": "Format identifier or extension, overriding detection"
                    }
                },
                "required": ["path"]
            }),
            ToolName::Sample => json!({
                "type": "object",
                "properties": {
                    "path": path,
                    "n": {
                        "type": "integer",
                        "minimum": 1,
                        "description": "Number of rows to return"
                    }
                },
                "required": ["path"]
            }),
            ToolName::Analyze => json!({
                "type": "object",
                "properties": { "path": path },
                "required": ["path"]
            }),
            ToolName::ColumnStats => json!({
                "type": "object",
                "properties": { "path": path, "column": column },
                "required": ["path", "column"]
            }),
            ToolName::Filter => json!({
                "type": "object",
                "properties": {
                    "path": path,
                    "column": column,
                    "operator": {
                        "type": "string",
                        "enum": operators
                    },
                    "operand": {
                        "type": "string",
                        "description": "Value to compare against, read as the column's type"
                    },
                    "output_path": output_path
                },
                "required": ["path", "column", "operator", "operand"]
            }),
            ToolName::Sort => json!({
                "type": "object",
                "properties": {
                    "path": path,
                    "column": column,
                    "descending": { "type": "boolean", "default": false },
                    "output_path": output_path
                },
                "required": ["path", "column"]
            }),
            ToolName::Convert => json!({
                "type": "object",
                "properties": {
                    "source_path": path,
                    "destination_path": {
                        "type": "string",
                        "description": "Output file; its extension selects the format"
                    },
                    "format": {
                        "type": "string",
                        "description": "Output format, overriding the extension"
                    }
                },
                "required": ["source_path", "destination_path"]
            }),
            ToolName::ListFormats => json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.as_str(),
            description: self.description(),
            parameters: self.parameters_schema(),
        }
    }
}

impl FromStr for ToolName {
    type Err = TabulaError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        ToolName::ALL
            .into_iter()
            .find(|tool| tool.as_str() == name || tool.alias() == name)
            .ok_or_else(|| TabulaError::InvalidArgument(format!("unknown tool '{}'", name)))
    }
}

impl std::fmt::Display for ToolName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a host needs to register one tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: JsonValue,
}

/// Every tool's registration record.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    ToolName::ALL.iter().map(ToolName::definition).collect()
}

impl Tabula {
    /// Run a tool by name.
    pub fn call(&self, name: &str, arguments: &Map<String, JsonValue>) -> OperationResult<JsonValue> {
        match self.dispatch(name, arguments) {
            Ok(value) => OperationResult::Success(value),
            Err(err) => err.into(),
        }
    }

    /// Run a tool with JSON-encoded arguments and return a JSON document.
    ///
    /// Always returns either the tool's payload or an error payload.
    pub fn call_json(&self, name: &str, arguments: &str) -> String {
        let result = match parse_arguments(arguments) {
            Ok(arguments) => self.call(name, &arguments),
            Err(err) => err.into(),
        };
        result.to_json()
    }

    fn dispatch(&self, name: &str, arguments: &Map<String, JsonValue>) -> Result<JsonValue> {
        let tool: ToolName = name.parse()?;
        let args = Arguments(arguments);

        match tool {
            ToolName::Load => {
                let path = args.required_str(&["path", "file_path"])?;
                let format = args.optional_str(&["format"])?;
                to_json(self.try_load(Path::new(path), format)?)
            }
            ToolName::Sample => {
                let path = args.required_str(&["path", "file_path"])?;
                let n = args.optional_usize(&["n", "rows"])?;
                to_json(self.try_sample(Path::new(path), n)?)
            }
            ToolName::Analyze => {
                let path = args.required_str(&["path", "file_path"])?;
                to_json(self.try_analyze(Path::new(path))?)
            }
            ToolName::ColumnStats => {
                let path = args.required_str(&["path", "file_path"])?;
                let column = args.required_str(&["column", "column_name"])?;
                to_json(self.try_column_stats(Path::new(path), column)?)
            }
            ToolName::Filter => {
                let path = args.required_str(&["path", "file_path"])?;
                let spec = FilterSpec::new(
                    args.required_str(&["column", "column_name"])?,
                    args.required_str(&["operator"])?.parse()?,
                    args.required_text(&["operand", "value"])?,
                );
                let output = args.optional_str(&["output_path"])?.map(Path::new);
                to_json(self.try_filter(Path::new(path), &spec, output)?)
            }
            ToolName::Sort => {
                let path = args.required_str(&["path", "file_path"])?;
                let column = args.required_str(&["column", "column_name"])?;
                let descending = args.optional_bool(&["descending"])?.unwrap_or(false);
                let output = args.optional_str(&["output_path"])?.map(Path::new);
                to_json(self.try_sort(Path::new(path), column, descending, output)?)
            }
            ToolName::Convert => {
                let source = args.required_str(&["source_path", "input_path"])?;
                let destination = args.required_str(&["destination_path", "output_path"])?;
                let format = args.optional_str(&["format"])?;
                let conversion = self.transformer().convert(source, destination, format)?;
                to_json(ConvertResponse::from(conversion))
            }
            ToolName::ListFormats => to_json(FormatsResponse::from(self.registry())),
        }
    }
}

fn to_json(payload: impl Serialize) -> Result<JsonValue> {
    serde_json::to_value(payload).map_err(TabulaError::Response)
}

fn parse_arguments(text: &str) -> Result<Map<String, JsonValue>> {
    if text.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str(text) {
        Ok(JsonValue::Object(map)) => Ok(map),
        Ok(JsonValue::Null) => Ok(Map::new()),
        Ok(other) => Err(TabulaError::InvalidArgument(format!(
            "arguments must be a JSON object, got {}",
            json_type(&other)
        ))),
        Err(e) => Err(TabulaError::InvalidArgument(format!(
            "arguments are not valid JSON: {}",
            e
        ))),
    }
}

fn json_type(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Typed access to a call's arguments. Each lookup takes the canonical name
/// first, then its aliases.
struct Arguments<'a>(&'a Map<String, JsonValue>);

impl<'a> Arguments<'a> {
    fn get<'k>(&self, keys: &[&'k str]) -> Option<(&'k str, &'a JsonValue)> {
        keys.iter()
            .find_map(|&key| self.0.get(key).map(|value| (key, value)))
            .filter(|(_, value)| !value.is_null())
    }

    fn optional_str(&self, keys: &[&str]) -> Result<Option<&'a str>> {
        match self.get(keys) {
            None => Ok(None),
            Some((_, JsonValue::String(s))) => Ok(Some(s.as_str())),
            Some((key, other)) => Err(ill_typed(key, "a string", other)),
        }
    }

    fn required_str(&self, keys: &[&str]) -> Result<&'a str> {
        self.optional_str(keys)?.ok_or_else(|| missing(keys))
    }

    /// A scalar argument rendered as text, so `70000` and `"70000"` agree.
    fn required_text(&self, keys: &[&str]) -> Result<String> {
        match self.get(keys) {
            None => Err(missing(keys)),
            Some((_, JsonValue::String(s))) => Ok(s.clone()),
            Some((_, JsonValue::Number(n))) => Ok(n.to_string()),
            Some((_, JsonValue::Bool(b))) => Ok(b.to_string()),
            Some((key, other)) => Err(ill_typed(key, "a scalar", other)),
        }
    }

    fn optional_usize(&self, keys: &[&str]) -> Result<Option<usize>> {
        let Some((key, value)) = self.get(keys) else {
            return Ok(None);
        };
        let parsed = match value {
            JsonValue::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
            JsonValue::String(s) => s.trim().parse::<usize>().ok(),
            _ => None,
        };
        parsed
            .map(Some)
            .ok_or_else(|| ill_typed(key, "a non-negative integer", value))
    }

    fn optional_bool(&self, keys: &[&str]) -> Result<Option<bool>> {
        let Some((key, value)) = self.get(keys) else {
            return Ok(None);
        };
        let parsed = match value {
            JsonValue::Bool(b) => Some(*b),
            JsonValue::String(s) => parse_boolean(s.trim()),
            _ => None,
        };
        parsed
            .map(Some)
            .ok_or_else(|| ill_typed(key, "a boolean", value))
    }
}

fn missing(keys: &[&str]) -> TabulaError {
    TabulaError::InvalidArgument(format!("missing required argument '{}'", keys[0]))
}

fn ill_typed(key: &str, expected: &str, value: &JsonValue) -> TabulaError {
    TabulaError::InvalidArgument(format!(
        "argument '{}' must be {}, got {}",
        key,
        expected,
        json_type(value)
    ))
}
