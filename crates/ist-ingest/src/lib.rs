//! Trial data ingestion.
//!
//! Loads the International Stroke Trial source file into an in-memory
//! [`ist_model::SourceTable`]. The file is read with Polars, every column as
//! text, and the explicit missing-value tokens (`""`, `NA`) become `None`.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use ist_ingest::read_source_table;
//!
//! let table = read_source_table(Path::new("data/IST_corrected.csv"))?;
//! println!("{} rows", table.len());
//! ```

mod csv;
mod error;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv::{
    MAX_CSV_FILE_SIZE, MISSING_TOKENS, check_file_size, check_file_size_with_limit, clean_cell,
    dataframe_to_source_table, is_missing_token, read_source_table, validate_encoding,
};
