//! Flat-file export of normalized records and variable labels.
//!
//! Files are rendered into memory first, hashed, then written in one call,
//! so the returned digest is exactly what landed on disk.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use ist_model::{
    Category, ExploratoryRecord, MISSING_CODE, NormalizedPatientRecord, OutputField, SourceField,
    VariableLabel, variable_labels,
};
use ist_transform::NormalizeReport;

use crate::checksum::sha256_hex;
use crate::error::{ReportError, Result};

/// Serialization format for normalized records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// One row per record, `NA` for missing values.
    #[default]
    Csv,
    /// Labels, run report, and records in one JSON document.
    Json,
}

/// Everything a downstream consumer needs to reload a normalized set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordCache {
    pub fields: Vec<VariableLabel>,
    pub report: NormalizeReport,
    pub records: Vec<NormalizedPatientRecord>,
}

impl RecordCache {
    pub fn new(records: Vec<NormalizedPatientRecord>, report: NormalizeReport) -> Self {
        Self {
            fields: variable_labels(),
            report,
            records,
        }
    }
}

/// A file written by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub bytes: usize,
    /// Lowercase hex SHA-256 of the file contents.
    pub sha256: String,
}

fn csv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer)
}

/// Write records as CSV with a header of output field names.
pub fn write_records_csv<W: Write>(writer: W, records: &[NormalizedPatientRecord]) -> Result<()> {
    let mut csv = csv_writer(writer);
    csv.write_record(OutputField::ALL.iter().map(|field| field.as_str()))?;
    for record in records {
        csv.write_record(record.values().iter().map(ToString::to_string))?;
    }
    csv.flush()?;
    Ok(())
}

/// Write exploratory rows: every projected source column, then `treatment`.
///
/// Source cells are written as read, after the heparin collapse.
pub fn write_exploratory_csv<W: Write>(writer: W, records: &[ExploratoryRecord]) -> Result<()> {
    let mut csv = csv_writer(writer);
    let mut header: Vec<&str> = SourceField::ALL.iter().map(|field| field.as_str()).collect();
    header.push(OutputField::Treatment.as_str());
    csv.write_record(&header)?;
    for record in records {
        let mut row: Vec<&str> = SourceField::ALL
            .iter()
            .map(|field| record.raw.get(*field).unwrap_or(MISSING_CODE))
            .collect();
        row.push(record.treatment.map_or(MISSING_CODE, Category::code));
        csv.write_record(&row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the JSON cache document.
pub fn write_records_json<W: Write>(writer: W, cache: &RecordCache) -> Result<()> {
    serde_json::to_writer_pretty(writer, cache)?;
    Ok(())
}

/// Read a JSON cache document back.
pub fn read_records_json<R: std::io::Read>(reader: R) -> Result<RecordCache> {
    Ok(serde_json::from_reader(reader)?)
}

/// Write the variable-label side table as `variable,label` CSV.
pub fn write_labels_csv<W: Write>(writer: W) -> Result<()> {
    let mut csv = csv_writer(writer);
    csv.write_record(["variable", "label"])?;
    for label in variable_labels() {
        csv.write_record([label.variable.as_str(), label.label.as_str()])?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the variable-label side table as a JSON array.
pub fn write_labels_json<W: Write>(writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, &variable_labels())?;
    Ok(())
}

/// Render records in `format` to bytes.
pub fn render_records(cache: &RecordCache, format: OutputFormat) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    match format {
        OutputFormat::Csv => write_records_csv(&mut buffer, &cache.records)?,
        OutputFormat::Json => {
            write_records_json(&mut buffer, cache)?;
            buffer.push(b'\n');
        }
    }
    Ok(buffer)
}

/// Write records to `path` and return its digest.
pub fn write_records_file(
    path: &Path,
    cache: &RecordCache,
    format: OutputFormat,
) -> Result<WrittenFile> {
    let bytes = render_records(cache, format)?;
    debug!(path = %path.display(), records = cache.records.len(), ?format, "writing records");
    write_file(path, &bytes)
}

/// Write the label table to `path`, choosing CSV or JSON from the extension.
pub fn write_labels_file(path: &Path) -> Result<WrittenFile> {
    let mut bytes = Vec::new();
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        write_labels_json(&mut bytes)?;
        bytes.push(b'\n');
    } else {
        write_labels_csv(&mut bytes)?;
    }
    write_file(path, &bytes)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<WrittenFile> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ReportError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, bytes).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    let written = WrittenFile {
        path: path.to_path_buf(),
        bytes: bytes.len(),
        sha256: sha256_hex(bytes),
    };
    info!(path = %path.display(), bytes = written.bytes, sha256 = %written.sha256, "wrote file");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_csv_has_header_and_one_row_per_field() {
        let mut buffer = Vec::new();
        write_labels_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "variable,label");
        assert_eq!(lines.len(), OutputField::ALL.len() + 1);
        assert_eq!(lines[1], "RDELAY,Delay between stroke and randomisation (hours)");
        assert_eq!(lines.last().copied(), Some("dead_or_dep,Dead or dependent at six months"));
    }

    #[test]
    fn exploratory_rows_keep_raw_cells() {
        let raw = ist_model::RawPatientRecord::new()
            .with(SourceField::Rxasp, "Y")
            .with(SourceField::Rxhep, "M")
            .with(SourceField::Occode, "9");
        let records = vec![ExploratoryRecord {
            raw,
            treatment: Some(ist_model::Treatment::YesAspMedHep),
        }];

        let mut buffer = Vec::new();
        write_exploratory_csv(&mut buffer, &records).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].ends_with("STYPE,RXASP,RXHEP,OCCODE,treatment"));
        assert!(lines[1].ends_with("NA,Y,M,9,yes_asp_med_hep"));
    }

    #[test]
    fn empty_record_set_writes_header_only() {
        let mut buffer = Vec::new();
        write_records_csv(&mut buffer, &[]).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("RDELAY,RCONSC,SEX,AGE,"));
        assert!(text.ends_with("STYPE,treatment,dead_or_dep\n"));
    }
}
