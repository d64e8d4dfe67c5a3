//! Integration tests for loading trial files.

use std::io::Write;

use ist_ingest::{IngestError, read_source_table};
use tempfile::NamedTempFile;

fn write_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(content.as_bytes()).expect("write csv");
    file
}

#[test]
fn reads_extra_columns_alongside_trial_fields() {
    let file = write_csv(
        "HOSPNUM,RDELAY,RCONSC,SEX,AGE,RXASP,RXHEP,OCCODE,RATRIAL\n\
         1,17,F,M,69,Y,H,3,N\n\
         2,10,D,F,76,N,N,,\n",
    );

    let table = read_source_table(file.path()).expect("read table");

    assert_eq!(table.headers.len(), 9);
    assert_eq!(table.len(), 2);
    let ratrial = table.column_index("RATRIAL").expect("RATRIAL column");
    let occode = table.column_index("OCCODE").expect("OCCODE column");
    assert_eq!(table.cell(0, ratrial), Some("N"));
    assert_eq!(table.cell(1, ratrial), None);
    assert_eq!(table.cell(1, occode), None);
}

#[test]
fn strips_utf8_bom_from_first_header() {
    let file = write_csv("\u{feff}RXASP,RXHEP\nY,L\n");

    let table = read_source_table(file.path()).expect("read table");

    assert_eq!(table.column_index("RXASP"), Some(0));
}

#[test]
fn header_only_file_yields_empty_table() {
    let file = write_csv("RXASP,RXHEP\n");

    let table = read_source_table(file.path()).expect("read table");

    assert!(table.is_empty());
    assert_eq!(table.headers, vec!["RXASP", "RXHEP"]);
}

#[test]
fn empty_file_is_rejected() {
    let file = write_csv("");

    let err = read_source_table(file.path()).expect_err("empty file must fail");

    assert!(matches!(err, IngestError::EmptyCsv { .. }));
}
