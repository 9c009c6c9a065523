//! Tabula: format-agnostic tabular data engine.
//!
//! Tabula loads delimited text, JSON, Parquet and spreadsheet files into one
//! typed table model, then samples, describes, filters, sorts and converts
//! them. Every operation returns a structured [`OperationResult`] whose JSON
//! form is stable, so tool hosts can forward calls by name.
//!
//! # Core Principles
//!
//! - **Format-agnostic**: one table model regardless of the file on disk
//! - **Non-destructive**: inputs are never modified; results are new tables
//! - **Total responses**: failures come back as `{error_kind, message}`
//!
//! # Example
//!
//! ```no_run
//! use tabula::{FilterOperator, FilterSpec, Tabula};
//!
//! let tabula = Tabula::new();
//! let spec = FilterSpec::new("salary", FilterOperator::GreaterThan, "70000");
//! let result = tabula.filter("employees.csv", &spec, None);
//!
//! println!("{}", result.to_json_pretty());
//! ```

pub mod error;
pub mod format;
pub mod inference;
pub mod input;
pub mod inspect;
pub mod response;
pub mod table;
pub mod tools;
pub mod transform;

mod tabula;

pub use crate::tabula::{Tabula, TabulaConfig};
pub use error::{ErrorKind, Result, TabulaError};
pub use format::{FormatDescriptor, FormatRegistry};
pub use inference::InferenceConfig;
pub use input::Loader;
pub use inspect::Inspector;
pub use response::{ErrorPayload, OperationResult};
pub use table::{Column, ColumnType, Row, Table, Value};
pub use tools::{ToolDefinition, ToolName, tool_definitions};
pub use transform::{Conversion, FilterOperator, FilterSpec, Transformer};
