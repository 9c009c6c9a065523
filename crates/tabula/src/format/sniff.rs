//! Content-based format detection.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Bytes read from the start of a file for sniffing.
const SNIFF_BYTES: u64 = 8 * 1024;

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

const PARQUET_MAGIC: &[u8] = b"PAR1";
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const ODS_MIMETYPE: &[u8] = b"application/vnd.oasis.opendocument.spreadsheet";

/// Guess a format identifier from the start of the file at `path`.
pub fn sniff_file(path: &Path) -> std::io::Result<Option<&'static str>> {
    let mut prefix = Vec::new();
    File::open(path)?.take(SNIFF_BYTES).read_to_end(&mut prefix)?;
    Ok(sniff(&prefix))
}

/// Guess a format identifier from leading bytes.
pub fn sniff(prefix: &[u8]) -> Option<&'static str> {
    if prefix.starts_with(PARQUET_MAGIC) {
        return Some("parquet");
    }
    if prefix.starts_with(ZIP_MAGIC) {
        let is_ods = prefix.windows(ODS_MIMETYPE.len()).any(|w| w == ODS_MIMETYPE);
        return Some(if is_ods { "ods" } else { "xlsx" });
    }
    if prefix.starts_with(OLE_MAGIC) {
        return Some("xls");
    }

    let text = std::str::from_utf8(prefix).ok().or_else(|| {
        // a multibyte character may straddle the cut
        let valid = std::str::from_utf8(prefix).err()?.valid_up_to();
        std::str::from_utf8(&prefix[..valid]).ok()
    })?;
    let text = text.trim_start_matches('\u{feff}').trim_start();

    if text.starts_with('[') {
        return Some("json");
    }
    if text.starts_with('{') {
        let object_lines = text
            .lines()
            .filter(|l| l.trim_start().starts_with('{'))
            .take(2)
            .count();
        return Some(if object_lines > 1 { "jsonl" } else { "json" });
    }

    match detect_delimiter(text.as_bytes())? {
        b',' => Some("csv"),
        b'\t' => Some("tsv"),
        b'|' => Some("psv"),
        _ => Some("txt"),
    }
}

/// Detect the delimiter by analyzing the first few lines.
///
/// Returns `None` when no candidate appears on the first line.
pub fn detect_delimiter(bytes: &[u8]) -> Option<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return None;
    }

    let mut best: Option<u8> = None;
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64
        } else {
            0.0
        };

        // Higher count with lower variance wins; tab breaks ties since it
        // rarely appears inside values.
        let score = if consistent {
            first_count * 1000 + (if delim == b'\t' { 100 } else { 0 })
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best = Some(delim);
        }
    }

    best
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}
