//! Workload trace loading for the command-line harness
//!
//! Reads job records from a JSON file: either a single array of objects or
//! one object per line (JSON lines). Only `ts_submit` is read; other fields
//! are ignored. Fractional submit times are truncated to whole seconds.

use crate::arrival::ArrivalRecord;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// The part of a workflow/job record the arrival graph needs
#[derive(Debug, Deserialize)]
struct JobRow {
    ts_submit: serde_json::Number,
}

impl JobRow {
    fn into_arrival(self, position: &str) -> Result<ArrivalRecord> {
        let seconds = if let Some(value) = self.ts_submit.as_u64() {
            value
        } else if let Some(value) = self.ts_submit.as_f64() {
            if !(value >= 0.0) || !value.is_finite() {
                bail!("Invalid ts_submit {} at {}", self.ts_submit, position);
            }
            value.trunc() as u64
        } else {
            bail!("Invalid ts_submit {} at {}", self.ts_submit, position);
        };
        Ok(ArrivalRecord::new(seconds))
    }
}

/// Load arrival records from a trace file
///
/// # Example
///
/// ```no_run
/// use wta_stats::trace_loader::load_arrivals;
///
/// # fn main() -> anyhow::Result<()> {
/// let records = load_arrivals("workflows.jsonl")?;
/// println!("Loaded {} jobs", records.len());
/// # Ok(())
/// # }
/// ```
pub fn load_arrivals<P: AsRef<Path>>(path: P) -> Result<Vec<ArrivalRecord>> {
    let path = path.as_ref();
    if !path.exists() {
        bail!("Trace file not found: {}", path.display());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let records = parse_arrivals(&contents)
        .with_context(|| format!("Invalid trace file {}", path.display()))?;

    tracing::debug!(path = %path.display(), jobs = records.len(), "Loaded trace");
    Ok(records)
}

/// Parse a JSON array or JSON-lines document into arrival records
pub fn parse_arrivals(contents: &str) -> Result<Vec<ArrivalRecord>> {
    let trimmed = contents.trim_start();

    if trimmed.starts_with('[') {
        let rows: Vec<JobRow> =
            serde_json::from_str(trimmed).context("Invalid JSON array of job records")?;
        return rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| row.into_arrival(&format!("index {}", i)))
            .collect();
    }

    let mut records = Vec::new();
    for (i, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let row: JobRow = serde_json::from_str(line)
            .with_context(|| format!("Invalid job record on line {}", i + 1))?;
        records.push(row.into_arrival(&format!("line {}", i + 1))?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_json_array() {
        let input = r#"[{"ts_submit": 10, "id": 1}, {"ts_submit": 70}]"#;
        let records = parse_arrivals(input).unwrap();
        assert_eq!(records, vec![ArrivalRecord::new(10), ArrivalRecord::new(70)]);
    }

    #[test]
    fn test_parse_json_lines_skips_blank() {
        let input = "{\"ts_submit\": 1}\n\n{\"ts_submit\": 2, \"critical_path_length\": 5}\n";
        let records = parse_arrivals(input).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].submit_time, 2);
    }

    #[test]
    fn test_float_submit_time_truncated() {
        let records = parse_arrivals(r#"[{"ts_submit": 59.9}]"#).unwrap();
        assert_eq!(records[0].submit_time, 59);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_arrivals("").unwrap().is_empty());
        assert!(parse_arrivals("[]").unwrap().is_empty());
    }

    #[test]
    fn test_negative_submit_time_rejected() {
        let err = parse_arrivals("{\"ts_submit\": 1}\n{\"ts_submit\": -5}").unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }

    #[test]
    fn test_missing_field_rejected() {
        assert!(parse_arrivals(r#"[{"submit": 3}]"#).is_err());
        assert!(parse_arrivals(r#"{"ts_submit": "soon"}"#).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{\"ts_submit\": 3600}}").unwrap();
        writeln!(file, "{{\"ts_submit\": 7200}}").unwrap();

        let records = load_arrivals(file.path()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_arrivals("/nonexistent/trace.json").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
