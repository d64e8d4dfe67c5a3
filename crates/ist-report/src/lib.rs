//! Export and reporting for normalized trial records.
//!
//! - **writer**: flat CSV, JSON cache, and variable-label files
//! - **checksum**: SHA-256 digests of written files
//! - **describe**: per-treatment summaries and frequency tables

pub mod checksum;
pub mod describe;
pub mod error;
pub mod writer;

pub use checksum::{compute_file_sha256, sha256_hex};
pub use describe::{
    FrequencyRow, GroupSummary, OVERALL_GROUP, frequency_table, summarize_by_treatment,
};
pub use error::{ReportError, Result};
pub use writer::{
    OutputFormat, RecordCache, WrittenFile, read_records_json, render_records,
    write_exploratory_csv, write_labels_csv, write_labels_file, write_labels_json,
    write_records_csv, write_records_file, write_records_json,
};
