//! Trial CSV reading.
//!
//! Every column is read as text. Typing happens in the normalizer, where
//! unknown codes can be reported instead of failing the parse.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use polars::prelude::*;
use tracing::{debug, info, warn};

use ist_model::SourceTable;

use crate::error::{IngestError, Result};

use super::missing::clean_cell;

/// Maximum file size for CSV loading (500 MB default).
pub const MAX_CSV_FILE_SIZE: u64 = 500 * 1024 * 1024;

fn open_error(path: &Path, err: std::io::Error) -> IngestError {
    if err.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: err,
        }
    }
}

/// Check file size before loading.
pub fn check_file_size(path: &Path) -> Result<()> {
    check_file_size_with_limit(path, MAX_CSV_FILE_SIZE)
}

/// Check file size against a custom limit.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| open_error(path, e))?;

    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }

    Ok(())
}

/// Reject UTF-16 input. A UTF-8 BOM is accepted.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| open_error(path, e))?;

    let mut buffer = [0u8; 4];
    let bytes_read = file.read(&mut buffer).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    if bytes_read >= 2 {
        if buffer[0..2] == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        if buffer[0..2] == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }

    Ok(())
}

/// Reads a trial CSV file into a [`SourceTable`].
///
/// The first line is the header. Missing-value tokens become `None`.
pub fn read_source_table(path: &Path) -> Result<SourceTable> {
    check_file_size(path)?;
    validate_encoding(path)?;

    let is_empty = std::fs::metadata(path)
        .map_err(|e| open_error(path, e))?
        .len()
        == 0;
    if is_empty {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if df.width() == 0 {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    if df.height() == 0 {
        warn!(path = %path.display(), "trial file has a header but no rows");
    }

    let table = dataframe_to_source_table(&df)?;
    if table.headers.iter().any(|name| name.trim().is_empty()) {
        return Err(IngestError::EmptyColumnName {
            path: path.to_path_buf(),
        });
    }

    info!(
        path = %path.display(),
        rows = table.len(),
        columns = table.headers.len(),
        "loaded trial file"
    );
    Ok(table)
}

/// Converts a DataFrame into a row-major [`SourceTable`].
///
/// Non-text columns are cast to text first, so typed frames are accepted too.
pub fn dataframe_to_source_table(df: &DataFrame) -> Result<SourceTable> {
    let headers: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.trim().trim_matches('\u{feff}').to_string())
        .collect();

    let mut columns: Vec<Vec<Option<String>>> = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        let as_text = column.cast(&DataType::String)?;
        let values = as_text.str()?;
        columns.push(
            values
                .into_iter()
                .map(|value| value.and_then(clean_cell))
                .collect(),
        );
    }
    debug!(columns = columns.len(), rows = df.height(), "transposing frame");

    let mut table = SourceTable::new(headers);
    for row_index in 0..df.height() {
        let row = columns
            .iter()
            .map(|column| column.get(row_index).cloned().flatten())
            .collect();
        table.push_row(row);
    }
    Ok(table)
}
