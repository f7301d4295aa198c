//! CSV ingest of rate samples.
//!
//! Expected schema (header required, case-insensitive, extra columns ignored):
//!
//! ```text
//! t9,rate[,error]
//! ```
//!
//! `t9` may also be spelled `T9`/`temperature`, `error` may be `err`/`sigma`.
//! Rows that cannot be used (unparseable, non-positive temperature or rate,
//! negative error) are skipped and reported as row errors; only a file with no
//! usable rows at all is an error.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{DatasetStats, RateSample};
use crate::error::AppError;

const T9_COLUMNS: [&str; 2] = ["t9", "temperature"];
const RATE_COLUMNS: [&str; 1] = ["rate"];
const ERROR_COLUMNS: [&str; 3] = ["error", "err", "sigma"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: usable samples + stats + row errors.
#[derive(Debug, Clone)]
pub struct IngestedSamples {
    pub samples: Vec<RateSample>,
    pub stats: DatasetStats,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load samples from a CSV file.
pub fn load_samples(path: &Path) -> Result<IngestedSamples, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let ingested = read_samples(file)?;
    log::info!(
        "read {} of {} rows from '{}'",
        ingested.rows_used,
        ingested.rows_read,
        path.display()
    );
    Ok(ingested)
}

/// Read samples from any CSV source.
pub fn read_samples<R: Read>(source: R) -> Result<IngestedSamples, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let t9_idx = find_column(&header_map, &T9_COLUMNS)
        .ok_or_else(|| AppError::new(2, "Missing required column: `t9`"))?;
    let rate_idx = find_column(&header_map, &RATE_COLUMNS)
        .ok_or_else(|| AppError::new(2, "Missing required column: `rate`"))?;
    let error_idx = find_column(&header_map, &ERROR_COLUMNS);

    let mut samples = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: header is line 1 and CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, t9_idx, rate_idx, error_idx) {
            Ok(sample) => samples.push(sample),
            Err(message) => {
                log::warn!("line {line}: {message}");
                row_errors.push(RowError { line, message });
            }
        }
    }

    let rows_used = samples.len();
    if rows_used == 0 {
        return Err(AppError::new(3, "No usable rate samples in input."));
    }
    let stats = DatasetStats::from_samples(&samples);

    Ok(IngestedSamples {
        samples,
        stats,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports may prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn find_column(header_map: &HashMap<String, usize>, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|n| header_map.get(*n).copied())
}

fn parse_row(
    record: &StringRecord,
    t9_idx: usize,
    rate_idx: usize,
    error_idx: Option<usize>,
) -> Result<RateSample, String> {
    let t9 = parse_required(record, t9_idx, "t9")?;
    let rate = parse_required(record, rate_idx, "rate")?;
    if t9 <= 0.0 {
        return Err(format!("`t9` must be > 0 (got {t9})."));
    }
    if rate <= 0.0 {
        return Err(format!("`rate` must be > 0 (got {rate})."));
    }

    let error = match error_idx.and_then(|i| get_field(record, i)) {
        None => None,
        Some(s) => {
            let v = parse_f64(s).ok_or_else(|| format!("Invalid `error` value `{s}`."))?;
            if v < 0.0 {
                return Err(format!("`error` must be >= 0 (got {v})."));
            }
            Some(v)
        }
    };

    Ok(RateSample { t9, rate, error })
}

fn get_field(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_required(record: &StringRecord, idx: usize, name: &str) -> Result<f64, String> {
    let s = get_field(record, idx).ok_or_else(|| format!("Missing required value: `{name}`"))?;
    parse_f64(s).ok_or_else(|| format!("Invalid `{name}` value `{s}`."))
}

fn parse_f64(s: &str) -> Option<f64> {
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_samples_with_optional_error() {
        let csv = "T9,Rate,Error\n0.1,1.5e-5,1e-6\n0.5,3.2,\n1.0,2.4e2,12\n";
        let ingested = read_samples(csv.as_bytes()).unwrap();
        assert_eq!(ingested.rows_read, 3);
        assert_eq!(ingested.rows_used, 3);
        assert!(ingested.row_errors.is_empty());
        assert_eq!(ingested.samples[0], RateSample::with_error(0.1, 1.5e-5, 1e-6));
        assert_eq!(ingested.samples[1], RateSample::new(0.5, 3.2));
        assert_eq!(ingested.stats.t9_max, 1.0);
    }

    #[test]
    fn bad_rows_are_skipped_and_reported() {
        let csv = "\u{feff}temperature,rate,sigma\n0.1,1.0\n-0.2,1.0\n0.3,abc\n0.4,0\n0.5,2.0,-1\n0.6,3.0,0.1\n";
        let ingested = read_samples(csv.as_bytes()).unwrap();
        assert_eq!(ingested.rows_read, 6);
        assert_eq!(ingested.rows_used, 2);
        let lines: Vec<usize> = ingested.row_errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 4, 5, 6]);
    }

    #[test]
    fn missing_columns_and_empty_data_are_errors() {
        let err = read_samples("t9,value\n1.0,2.0\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        let err = read_samples("t9,rate\n-1.0,2.0\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn load_samples_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("samples.csv");
        std::fs::write(&path, "t9,rate\n# measured\n0.2,1.0\n0.4,4.0\n").unwrap();
        let ingested = load_samples(&path).unwrap();
        assert_eq!(ingested.rows_used, 2);
        assert!(load_samples(&dir.path().join("missing.csv")).is_err());
    }
}
