//! Loads files into typed tables.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::error::{Result, TabulaError};
use crate::format::FormatRegistry;
use crate::inference::{InferenceConfig, TypeInferrer};
use crate::table::Table;

/// Decodes a file through the registry and infers column types.
#[derive(Debug, Clone)]
pub struct Loader {
    registry: Arc<FormatRegistry>,
    inferrer: TypeInferrer,
}

impl Loader {
    pub fn new(registry: Arc<FormatRegistry>) -> Self {
        Self::with_config(registry, InferenceConfig::default())
    }

    pub fn with_config(registry: Arc<FormatRegistry>, inference: InferenceConfig) -> Self {
        Self {
            registry,
            inferrer: TypeInferrer::with_config(inference),
        }
    }

    /// Load `path`, optionally forcing a format by identifier or extension.
    pub fn load(&self, path: impl AsRef<Path>, format_hint: Option<&str>) -> Result<Table> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(TabulaError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        if !path.is_file() {
            return Err(TabulaError::decode(path, "not a regular file"));
        }

        let descriptor = self.registry.resolve(path, format_hint)?;
        if !descriptor.supports_read {
            return Err(TabulaError::UnsupportedFormat(format!(
                "format '{}' cannot be read",
                descriptor.identifier
            )));
        }

        let raw = descriptor.codec.decode(path)?;
        let columns = self.inferrer.build_columns(&raw);
        let table = Table::new(path, columns)?;

        info!(
            path = %path.display(),
            format = descriptor.identifier,
            rows = table.row_count(),
            columns = table.column_count(),
            "loaded table"
        );

        Ok(table)
    }
}
