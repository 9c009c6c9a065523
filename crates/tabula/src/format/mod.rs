//! File formats: registry, content sniffing and per-format codecs.

#[cfg(feature = "parquet")]
mod columnar;
mod delimited;
mod json;
mod registry;
pub mod sniff;
mod spreadsheet;

pub use registry::{Codec, FormatDescriptor, FormatRegistry, SheetKind};

use std::fs::File;
use std::io::{BufWriter, Read};
use std::path::Path;

use crate::error::{Result, TabulaError};

/// Read a whole file into memory.
///
/// The buffer is reserved up front so an oversized input fails with
/// `OutOfMemory` instead of aborting the process.
pub(crate) fn read_source(path: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(path).map_err(|e| open_error(path, e))?;
    let size_bytes = file
        .metadata()
        .map_err(|e| TabulaError::decode(path, e))?
        .len();

    let mut contents = Vec::new();
    let capacity = usize::try_from(size_bytes).unwrap_or(usize::MAX);
    contents
        .try_reserve_exact(capacity)
        .map_err(|_| TabulaError::OutOfMemory {
            path: path.to_path_buf(),
            size_bytes,
        })?;

    file.read_to_end(&mut contents)
        .map_err(|e| TabulaError::decode(path, e))?;
    Ok(contents)
}

pub(crate) fn open_error(path: &Path, err: std::io::Error) -> TabulaError {
    if err.kind() == std::io::ErrorKind::NotFound {
        TabulaError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        TabulaError::decode(path, err)
    }
}

/// Create (or truncate) an output file behind a buffered writer.
pub(crate) fn create_output(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| TabulaError::encode(path, e))
}
