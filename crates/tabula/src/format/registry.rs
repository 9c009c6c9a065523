//! Registry of known file formats and their codecs.

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::{Result, TabulaError};
use crate::input::RawTable;
use crate::table::Table;

use super::{delimited, json, sniff, spreadsheet};

/// Which workbook reader a spreadsheet format uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetKind {
    Xlsx,
    Xls,
    Ods,
}

/// Decoder/encoder pair behind a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    /// Delimited text with a fixed separator.
    Delimited(u8),
    /// Delimited text whose separator is detected from content.
    SniffedText,
    Json,
    JsonLines,
    #[cfg(feature = "parquet")]
    Parquet,
    Spreadsheet(SheetKind),
}

impl Codec {
    /// Decode the file at `path` into raw records.
    pub fn decode(&self, path: &Path) -> Result<RawTable> {
        match self {
            Codec::Delimited(delimiter) => delimited::decode(path, Some(*delimiter)),
            Codec::SniffedText => delimited::decode(path, None),
            Codec::Json => json::decode(path),
            Codec::JsonLines => json::decode_lines(path),
            #[cfg(feature = "parquet")]
            Codec::Parquet => super::columnar::decode(path),
            Codec::Spreadsheet(kind) => spreadsheet::decode(path, *kind),
        }
    }

    /// Encode `table` to `path`.
    pub fn encode(&self, table: &Table, path: &Path) -> Result<()> {
        match self {
            Codec::Delimited(delimiter) => delimited::encode(table, path, *delimiter),
            Codec::Json => json::encode(table, path),
            Codec::JsonLines => json::encode_lines(table, path),
            #[cfg(feature = "parquet")]
            Codec::Parquet => super::columnar::encode(table, path),
            Codec::SniffedText | Codec::Spreadsheet(_) => Err(TabulaError::UnsupportedFormat(
                format!("no encoder for {:?}", self),
            )),
        }
    }
}

/// Registry entry for one file format.
#[derive(Debug, Clone, Serialize)]
pub struct FormatDescriptor {
    /// Canonical format name.
    pub identifier: &'static str,
    /// Recognized file suffixes, without the dot.
    pub extensions: Vec<&'static str>,
    pub description: &'static str,
    pub supports_read: bool,
    pub supports_write: bool,
    #[serde(skip)]
    pub codec: Codec,
}

impl FormatDescriptor {
    fn new(
        identifier: &'static str,
        extensions: &[&'static str],
        description: &'static str,
        codec: Codec,
    ) -> Self {
        Self {
            identifier,
            extensions: extensions.to_vec(),
            description,
            supports_read: true,
            supports_write: true,
            codec,
        }
    }

    fn read_only(mut self) -> Self {
        self.supports_write = false;
        self
    }

    /// Whether `name` is this format's identifier or one of its extensions.
    pub fn matches(&self, name: &str) -> bool {
        let name = name.trim().trim_start_matches('.');
        self.identifier.eq_ignore_ascii_case(name)
            || self.extensions.iter().any(|e| e.eq_ignore_ascii_case(name))
    }
}

/// The set of formats this build can read and write.
///
/// Built once and shared read-only; nothing mutates it after construction.
#[derive(Debug, Clone)]
pub struct FormatRegistry {
    formats: Vec<FormatDescriptor>,
}

impl FormatRegistry {
    /// Create a registry holding every built-in format.
    pub fn new() -> Self {
        let mut formats = vec![
            FormatDescriptor::new(
                "csv",
                &["csv"],
                "Comma-separated values",
                Codec::Delimited(b','),
            ),
            FormatDescriptor::new(
                "tsv",
                &["tsv", "tab"],
                "Tab-separated values",
                Codec::Delimited(b'\t'),
            ),
            FormatDescriptor::new(
                "psv",
                &["psv"],
                "Pipe-separated values",
                Codec::Delimited(b'|'),
            ),
            FormatDescriptor::new(
                "txt",
                &["txt", "dat"],
                "Delimited text with the separator detected from content",
                Codec::SniffedText,
            )
            .read_only(),
            FormatDescriptor::new(
                "json",
                &["json"],
                "JSON array of objects",
                Codec::Json,
            ),
            FormatDescriptor::new(
                "jsonl",
                &["jsonl", "ndjson"],
                "JSON Lines, one object per line",
                Codec::JsonLines,
            ),
        ];

        #[cfg(feature = "parquet")]
        formats.push(FormatDescriptor::new(
            "parquet",
            &["parquet", "pq"],
            "Apache Parquet columnar storage",
            Codec::Parquet,
        ));

        formats.extend([
            FormatDescriptor::new(
                "xlsx",
                &["xlsx", "xlsm"],
                "Microsoft Excel workbook (first worksheet)",
                Codec::Spreadsheet(SheetKind::Xlsx),
            )
            .read_only(),
            FormatDescriptor::new(
                "xls",
                &["xls"],
                "Excel 97-2003 workbook (first worksheet)",
                Codec::Spreadsheet(SheetKind::Xls),
            )
            .read_only(),
            FormatDescriptor::new(
                "ods",
                &["ods"],
                "OpenDocument spreadsheet (first worksheet)",
                Codec::Spreadsheet(SheetKind::Ods),
            )
            .read_only(),
        ]);

        Self { formats }
    }

    /// All formats in registration order.
    pub fn describe_formats(&self) -> &[FormatDescriptor] {
        &self.formats
    }

    /// Find a format by identifier or extension.
    pub fn lookup(&self, name: &str) -> Option<&FormatDescriptor> {
        self.formats
            .iter()
            .find(|f| f.identifier.eq_ignore_ascii_case(name.trim().trim_start_matches('.')))
            .or_else(|| self.formats.iter().find(|f| f.matches(name)))
    }

    /// Resolve the format of an existing file to read.
    ///
    /// An explicit hint wins, then the extension, then content sniffing.
    pub fn resolve(&self, path: &Path, hint: Option<&str>) -> Result<&FormatDescriptor> {
        if let Some(hint) = hint {
            return self.resolve_hint(hint);
        }

        let extension = extension_of(path);
        if let Some(ext) = &extension {
            if let Some(descriptor) = self.lookup(ext) {
                debug!(path = %path.display(), format = descriptor.identifier, "resolved by extension");
                return Ok(descriptor);
            }
        }

        let sniffed = sniff::sniff_file(path)
            .ok()
            .flatten()
            .and_then(|identifier| self.lookup(identifier));
        match sniffed {
            Some(descriptor) => {
                debug!(path = %path.display(), format = descriptor.identifier, "resolved by content");
                Ok(descriptor)
            }
            None => Err(unsupported_extension(extension)),
        }
    }

    /// Resolve the format to write `path` as. Never sniffs.
    pub fn resolve_for_write(&self, path: &Path, hint: Option<&str>) -> Result<&FormatDescriptor> {
        let descriptor = match hint {
            Some(hint) => self.resolve_hint(hint)?,
            None => {
                let extension = extension_of(path);
                extension
                    .as_deref()
                    .and_then(|ext| self.lookup(ext))
                    .ok_or_else(|| unsupported_extension(extension.clone()))?
            }
        };

        if !descriptor.supports_write {
            return Err(TabulaError::UnsupportedFormat(format!(
                "format '{}' is read-only",
                descriptor.identifier
            )));
        }
        Ok(descriptor)
    }

    fn resolve_hint(&self, hint: &str) -> Result<&FormatDescriptor> {
        self.lookup(hint).ok_or_else(|| {
            TabulaError::UnsupportedFormat(format!("unknown format hint '{}'", hint))
        })
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
}

fn unsupported_extension(extension: Option<String>) -> TabulaError {
    match extension {
        Some(ext) => TabulaError::UnsupportedFormat(format!(
            "no format registered for extension '.{}'",
            ext
        )),
        None => TabulaError::UnsupportedFormat(
            "file has no extension and its content was not recognized".to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_registry_has_csv_and_json() {
        let registry = FormatRegistry::new();
        let ids: Vec<_> = registry.describe_formats().iter().map(|f| f.identifier).collect();
        assert!(ids.contains(&"csv"));
        assert!(ids.contains(&"json"));
        assert!(registry.describe_formats().iter().all(|f| !f.description.is_empty()));
    }

    #[test]
    fn test_lookup_by_identifier_and_extension() {
        let registry = FormatRegistry::new();
        assert_eq!(registry.lookup("TSV").unwrap().identifier, "tsv");
        assert_eq!(registry.lookup(".tab").unwrap().identifier, "tsv");
        assert_eq!(registry.lookup("ndjson").unwrap().identifier, "jsonl");
        assert!(registry.lookup("docx").is_none());
    }

    #[test]
    fn test_resolve_prefers_hint() {
        let registry = FormatRegistry::new();
        let descriptor = registry.resolve(Path::new("data.csv"), Some("tsv")).unwrap();
        assert_eq!(descriptor.identifier, "tsv");

        let err = registry.resolve(Path::new("data.csv"), Some("yaml")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    }

    #[test]
    fn test_resolve_sniffs_unknown_extension() {
        let mut file = Builder::new().suffix(".export").tempfile().unwrap();
        file.write_all(b"a\tb\tc\n1\t2\t3\n").unwrap();

        let registry = FormatRegistry::new();
        let descriptor = registry.resolve(file.path(), None).unwrap();
        assert_eq!(descriptor.identifier, "tsv");
    }

    #[test]
    fn test_resolve_unknown_names_extension() {
        let mut file = Builder::new().suffix(".bin").tempfile().unwrap();
        file.write_all(&[0u8, 159, 146, 150]).unwrap();

        let registry = FormatRegistry::new();
        let err = registry.resolve(file.path(), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
        assert!(err.to_string().contains(".bin"));
    }

    #[test]
    fn test_write_rejects_read_only_formats() {
        let registry = FormatRegistry::new();
        let err = registry
            .resolve_for_write(Path::new("out.xlsx"), None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
        assert!(registry.resolve_for_write(Path::new("out.json"), None).is_ok());
        assert!(registry.resolve_for_write(Path::new("out"), None).is_err());
    }
}
