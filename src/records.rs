//! Reading raw measurement rows out of delimited report files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ReportError, Result};

/// One observed operation from a report file. Ephemeral: built per file,
/// discarded after aggregation.
#[derive(Debug, Clone)]
pub struct MeasurementRow {
    pub method: String,
    pub mean: String,
    pub allocated: String,
}

const METHOD_COLUMN: &str = "Method";
const MEAN_COLUMN: &str = "Mean";
const ALLOCATED_COLUMN: &str = "Allocated";
const REPORT_SUFFIX: &str = "-report.csv";

/// Reads all rows of one report file.
///
/// The delimiter is sniffed from the header line (tooling emits either commas
/// or semicolons depending on locale); a byte-order mark is tolerated; a
/// header-only file yields an empty vector. Columns beyond `Method`, `Mean`
/// and `Allocated` are ignored, and missing cells become empty strings.
pub fn read_measurement_rows(path: &Path) -> Result<Vec<MeasurementRow>> {
    let raw = fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
    let text = raw.strip_prefix('\u{feff}').unwrap_or(&raw);
    let delimiter = sniff_delimiter(text).unwrap_or(b',');

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| ReportError::csv(path, e))?
        .clone();
    let position = |name: &str| headers.iter().position(|h| h == name);
    let method_idx = position(METHOD_COLUMN);
    let mean_idx = position(MEAN_COLUMN);
    let allocated_idx = position(ALLOCATED_COLUMN);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ReportError::csv(path, e))?;
        let field = |idx: Option<usize>| -> String {
            idx.and_then(|i| record.get(i)).unwrap_or("").to_string()
        };
        rows.push(MeasurementRow {
            method: strip_label_quotes(&field(method_idx)).to_string(),
            mean: field(mean_idx),
            allocated: field(allocated_idx),
        });
    }
    Ok(rows)
}

/// Picks the field delimiter from the header line. `None` means the sample
/// was inconclusive and the caller should use the default dialect.
fn sniff_delimiter(text: &str) -> Option<u8> {
    let header = text.lines().find(|line| !line.trim().is_empty())?;
    if header.contains(';') {
        Some(b';')
    } else if header.contains(',') {
        Some(b',')
    } else {
        None
    }
}

/// Strips the single-quote pair some measurement tooling wraps labels in.
fn strip_label_quotes(value: &str) -> &str {
    let v = value.trim();
    if v.len() >= 2 && v.starts_with('\'') && v.ends_with('\'') {
        &v[1..v.len() - 1]
    } else {
        v
    }
}

/// Lists `*-report.csv` files under the results folder, sorted by name, and
/// splits them into (baseline, compare) by the `Compare` naming convention.
pub fn list_report_files(results_dir: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let entries = fs::read_dir(results_dir).map_err(|e| ReportError::io(results_dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ReportError::io(results_dir, e))?;
        let path = entry.path();
        match path.file_name().and_then(|n| n.to_str()) {
            Some(name) if name.ends_with(REPORT_SUFFIX) => files.push(path),
            _ => {}
        }
    }
    files.sort();
    let (compare, baseline): (Vec<PathBuf>, Vec<PathBuf>) = files.into_iter().partition(|p| {
        p.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.contains("Compare"))
    });
    Ok((baseline, compare))
}

/// File stem of a report path, used as the raw suite identifier.
pub fn report_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}
