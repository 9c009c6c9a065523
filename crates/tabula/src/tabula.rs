//! Main Tabula struct and public API.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TabulaError};
use crate::format::FormatRegistry;
use crate::inference::InferenceConfig;
use crate::input::Loader;
use crate::inspect::Inspector;
use crate::response::{
    AnalyzeResponse, ColumnStatsResponse, ConvertResponse, FilterResponse, FormatsResponse,
    LoadResponse, OperationResult, SampleResponse, SortResponse,
};
use crate::transform::{FilterSpec, Transformer};

/// Configuration for a [`Tabula`] engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabulaConfig {
    /// Column type inference settings.
    pub inference: InferenceConfig,
    /// Example values reported per column by `analyze`.
    pub example_values: usize,
    /// Rows returned by `sample` when the caller gives no count.
    pub default_sample_rows: usize,
}

impl Default for TabulaConfig {
    fn default() -> Self {
        Self {
            inference: InferenceConfig::default(),
            example_values: 3,
            default_sample_rows: 10,
        }
    }
}

impl TabulaConfig {
    pub fn with_inference(mut self, inference: InferenceConfig) -> Self {
        self.inference = inference;
        self
    }

    pub fn with_example_values(mut self, example_values: usize) -> Self {
        self.example_values = example_values;
        self
    }

    pub fn with_default_sample_rows(mut self, rows: usize) -> Self {
        self.default_sample_rows = rows;
        self
    }
}

/// The tabular data engine.
///
/// Every operation loads its input afresh, so one instance can serve any
/// number of independent calls from any thread.
#[derive(Debug, Clone)]
pub struct Tabula {
    config: TabulaConfig,
    registry: Arc<FormatRegistry>,
    loader: Loader,
    inspector: Inspector,
    transformer: Transformer,
}

impl Tabula {
    /// Create a new Tabula instance with default configuration.
    pub fn new() -> Self {
        Self::with_config(TabulaConfig::default())
    }

    /// Create a Tabula instance with custom configuration.
    pub fn with_config(config: TabulaConfig) -> Self {
        let registry = Arc::new(FormatRegistry::new());
        let loader = Loader::with_config(registry.clone(), config.inference.clone());
        let inspector = Inspector::new(config.example_values);
        let transformer = Transformer::new(registry.clone(), loader.clone());

        Self {
            config,
            registry,
            loader,
            inspector,
            transformer,
        }
    }

    pub fn config(&self) -> &TabulaConfig {
        &self.config
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    pub fn loader(&self) -> &Loader {
        &self.loader
    }

    pub fn inspector(&self) -> &Inspector {
        &self.inspector
    }

    pub fn transformer(&self) -> &Transformer {
        &self.transformer
    }

    /// Load a file and describe its columns.
    pub fn load(
        &self,
        path: impl AsRef<Path>,
        format_hint: Option<&str>,
    ) -> OperationResult<LoadResponse> {
        self.try_load(path.as_ref(), format_hint).into()
    }

    /// First `n` rows, or the configured default when `n` is `None`.
    pub fn sample(&self, path: impl AsRef<Path>, n: Option<usize>) -> OperationResult<SampleResponse> {
        self.try_sample(path.as_ref(), n).into()
    }

    /// Column names, types and example values.
    pub fn analyze(&self, path: impl AsRef<Path>) -> OperationResult<AnalyzeResponse> {
        self.try_analyze(path.as_ref()).into()
    }

    pub fn column_stats(
        &self,
        path: impl AsRef<Path>,
        column: &str,
    ) -> OperationResult<ColumnStatsResponse> {
        self.try_column_stats(path.as_ref(), column).into()
    }

    /// Filter rows. Writes the result to `output` when given, otherwise
    /// returns the matching rows inline.
    pub fn filter(
        &self,
        path: impl AsRef<Path>,
        spec: &FilterSpec,
        output: Option<&Path>,
    ) -> OperationResult<FilterResponse> {
        self.try_filter(path.as_ref(), spec, output).into()
    }

    /// Sort rows. Writes the result to `output` when given, otherwise
    /// returns the sorted rows inline.
    pub fn sort(
        &self,
        path: impl AsRef<Path>,
        column: &str,
        descending: bool,
        output: Option<&Path>,
    ) -> OperationResult<SortResponse> {
        self.try_sort(path.as_ref(), column, descending, output).into()
    }

    /// Re-encode `source` into the format of `destination`.
    pub fn convert(
        &self,
        source: impl AsRef<Path>,
        destination: impl AsRef<Path>,
        format_hint: Option<&str>,
    ) -> OperationResult<ConvertResponse> {
        self.transformer
            .convert(source, destination, format_hint)
            .map(ConvertResponse::from)
            .into()
    }

    pub fn list_formats(&self) -> OperationResult<FormatsResponse> {
        OperationResult::Success(FormatsResponse::from(self.registry.as_ref()))
    }

    pub(crate) fn try_load(&self, path: &Path, format_hint: Option<&str>) -> Result<LoadResponse> {
        let table = self.loader.load(path, format_hint)?;
        Ok(LoadResponse::from(&table))
    }

    pub(crate) fn try_sample(&self, path: &Path, n: Option<usize>) -> Result<SampleResponse> {
        let n = n.unwrap_or(self.config.default_sample_rows);
        if n == 0 {
            // Reject before loading so a bad count is reported as such.
            return Err(TabulaError::InvalidArgument(
                "sample size must be at least 1".to_string(),
            ));
        }

        let table = self.loader.load(path, None)?;
        let sample = self.inspector.sample(&table, n)?;
        Ok(SampleResponse::new(&table, sample))
    }

    pub(crate) fn try_analyze(&self, path: &Path) -> Result<AnalyzeResponse> {
        let table = self.loader.load(path, None)?;
        let analysis = self.inspector.analyze(&table);
        Ok(AnalyzeResponse::new(&table, analysis))
    }

    pub(crate) fn try_column_stats(&self, path: &Path, column: &str) -> Result<ColumnStatsResponse> {
        let table = self.loader.load(path, None)?;
        let stats = self.inspector.column_stats(&table, column)?;
        Ok(stats.into())
    }

    pub(crate) fn try_filter(
        &self,
        path: &Path,
        spec: &FilterSpec,
        output: Option<&Path>,
    ) -> Result<FilterResponse> {
        let table = self.loader.load(path, None)?;
        let filtered = self.transformer.filter(&table, spec)?;

        if let Some(output) = output {
            self.transformer.write(&filtered, output, None)?;
        }

        debug!(
            path = %path.display(),
            filter = %spec,
            kept = filtered.row_count(),
            "filter complete"
        );
        Ok(FilterResponse::new(&table, &filtered, spec, output))
    }

    pub(crate) fn try_sort(
        &self,
        path: &Path,
        column: &str,
        descending: bool,
        output: Option<&Path>,
    ) -> Result<SortResponse> {
        let table = self.loader.load(path, None)?;
        let sorted = self.transformer.sort(&table, column, descending)?;

        if let Some(output) = output {
            self.transformer.write(&sorted, output, None)?;
        }

        Ok(SortResponse::new(&sorted, column, descending, output))
    }
}

impl Default for Tabula {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::transform::FilterOperator;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile, TempDir};

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const SCORES: &str = "name,score\nAnn,9\nBen,4\nCy,7\n";

    #[test]
    fn test_config_deserializes_partial_json() {
        let config: TabulaConfig = serde_json::from_str(r#"{"example_values": 5}"#).unwrap();
        assert_eq!(config.example_values, 5);
        assert_eq!(config.default_sample_rows, 10);
        assert_eq!(config.inference, InferenceConfig::default());
    }

    #[test]
    fn test_sample_uses_default_row_count() {
        let file = csv_file(SCORES);
        let tabula = Tabula::with_config(TabulaConfig::default().with_default_sample_rows(2));

        let sample = tabula.sample(file.path(), None).success().unwrap();
        assert_eq!(sample.total_rows, 3);
        assert_eq!(sample.data.len(), 2);
    }

    #[test]
    fn test_sample_zero_is_invalid() {
        let result = Tabula::new().sample("does-not-matter.csv", Some(0));
        assert_eq!(result.error_kind(), Some(ErrorKind::InvalidArgument));
    }

    #[test]
    fn test_filter_writes_output() {
        let file = csv_file(SCORES);
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("high.jsonl");
        let spec = FilterSpec::new("score", FilterOperator::GreaterOrEqual, "7");

        let response = Tabula::new()
            .filter(file.path(), &spec, Some(&output))
            .success()
            .unwrap();
        assert_eq!(response.original_rows, 3);
        assert_eq!(response.filtered_rows, 2);
        assert!(response.data.is_none());

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written.lines().count(), 2);
    }

    #[test]
    fn test_sort_inline() {
        let file = csv_file(SCORES);
        let response = Tabula::new()
            .sort(file.path(), "score", false, None)
            .success()
            .unwrap();

        let names: Vec<String> = response
            .data
            .unwrap()
            .iter()
            .map(|row| row["name"].to_text())
            .collect();
        assert_eq!(names, ["Ben", "Cy", "Ann"]);
    }

    #[test]
    fn test_missing_file_is_reported() {
        let result = Tabula::new().analyze("/no/such/file.csv");
        assert_eq!(result.error_kind(), Some(ErrorKind::FileNotFound));
    }
}
