//! Tests for the trial record normalizer.

use ist_model::{DeadOrDep, SourceField, SourceTable, Treatment, YesNo};
use ist_transform::{MissingTreatmentMode, NormalizeOptions, SchemaError, explore, normalize};

/// Minimal trial row: allocation, outcome, atrial fibrillation, and age.
struct Row<'a> {
    asp: Option<&'a str>,
    hep: Option<&'a str>,
    occode: Option<&'a str>,
    ratrial: Option<&'a str>,
    age: &'a str,
}

fn table(rows: &[Row<'_>]) -> SourceTable {
    let mut headers = vec!["HOSPNUM".to_string()];
    headers.extend(SourceField::ALL.iter().map(|field| field.as_str().to_string()));
    headers.push("DDEAD".to_string());
    let mut table = SourceTable::new(headers);
    for (i, row) in rows.iter().enumerate() {
        let mut cells = vec![Some(format!("{}", i + 1))];
        for field in SourceField::ALL {
            let value = match field {
                SourceField::Rxasp => row.asp,
                SourceField::Rxhep => row.hep,
                SourceField::Occode => row.occode,
                SourceField::Ratrial => row.ratrial,
                SourceField::Age => Some(row.age),
                SourceField::Sex => Some("M"),
                SourceField::Rconsc => Some("F"),
                SourceField::Stype => Some("PACI"),
                _ => None,
            };
            cells.push(value.map(str::to_string));
        }
        cells.push(Some("N".to_string()));
        table.push_row(cells);
    }
    table
}

fn row<'a>(
    asp: &'a str,
    hep: &'a str,
    occode: Option<&'a str>,
    ratrial: Option<&'a str>,
    age: &'a str,
) -> Row<'a> {
    Row {
        asp: Some(asp),
        hep: Some(hep),
        occode,
        ratrial,
        age,
    }
}

#[test]
fn documented_examples() {
    let input = table(&[
        row("N", "H", Some("3"), Some("Y"), "70"),
        row("Y", "L", Some("1"), None, "71"),
        row("Y", "N", None, Some("N"), "72"),
    ]);

    let outcome = normalize(&input, &NormalizeOptions::default()).expect("normalize");

    assert_eq!(outcome.records.len(), 1);
    let record = &outcome.records[0];
    assert_eq!(record.treatment, Some(Treatment::NoAspMedHep));
    assert_eq!(record.dead_or_dep, DeadOrDep::No);
    assert_eq!(record.ratrial, YesNo::Yes);
    assert_eq!(record.age, Some(70.0));
    assert_eq!(outcome.report.dropped_pilot_phase, 1);
    assert_eq!(outcome.report.dropped_missing_outcome, 1);
}

#[test]
fn all_six_treatment_arms() {
    let input = table(&[
        row("N", "N", Some("1"), Some("N"), "60"),
        row("N", "L", Some("2"), Some("N"), "61"),
        row("N", "M", Some("3"), Some("N"), "62"),
        row("Y", "N", Some("4"), Some("N"), "63"),
        row("Y", "L", Some("1"), Some("N"), "64"),
        row("Y", "H", Some("2"), Some("N"), "65"),
    ]);

    let outcome = normalize(&input, &NormalizeOptions::default()).expect("normalize");

    let arms: Vec<Treatment> = outcome
        .records
        .iter()
        .filter_map(|record| record.treatment)
        .collect();
    assert_eq!(
        arms,
        vec![
            Treatment::NoAspNoHep,
            Treatment::NoAspLowHep,
            Treatment::NoAspMedHep,
            Treatment::YesAspNoHep,
            Treatment::YesAspLowHep,
            Treatment::YesAspMedHep,
        ]
    );
    let outcomes: Vec<DeadOrDep> = outcome.records.iter().map(|r| r.dead_or_dep).collect();
    assert_eq!(
        outcomes,
        vec![
            DeadOrDep::Yes,
            DeadOrDep::Yes,
            DeadOrDep::No,
            DeadOrDep::No,
            DeadOrDep::Yes,
            DeadOrDep::Yes,
        ]
    );
}

#[test]
fn output_preserves_input_order() {
    let input = table(&[
        row("N", "N", Some("1"), Some("N"), "50"),
        row("N", "N", Some("1"), None, "51"),
        row("Y", "L", Some("4"), Some("Y"), "52"),
        row("Y", "L", Some("9"), Some("Y"), "53"),
        row("N", "M", Some("2"), Some("Y"), "54"),
    ]);

    let outcome = normalize(&input, &NormalizeOptions::default()).expect("normalize");

    let ages: Vec<f64> = outcome.records.iter().filter_map(|r| r.age).collect();
    assert_eq!(ages, vec![50.0, 52.0, 54.0]);
}

#[test]
fn missing_column_is_schema_error() {
    let mut input = table(&[row("N", "N", Some("1"), Some("N"), "50")]);
    let occode = input.column_index("OCCODE").expect("OCCODE");
    input.headers[occode] = "OUTCOME".to_string();

    let err = normalize(&input, &NormalizeOptions::default()).expect_err("schema error");

    assert_eq!(
        err,
        SchemaError {
            missing: vec![SourceField::Occode]
        }
    );
}

#[test]
fn report_counts_unmapped_values() {
    let input = table(&[
        row("N", "N", Some("9"), Some("N"), "50"),
        row("N", "N", Some("9"), Some("N"), "51"),
        row("Q", "N", Some("1"), Some("N"), "52"),
        row("N", "N", Some("2"), Some("N"), "n/a"),
    ]);

    let outcome = normalize(&input, &NormalizeOptions::default()).expect("normalize");
    let report = &outcome.report;

    assert_eq!(report.input_rows, 4);
    assert_eq!(report.output_rows, 1);
    assert_eq!(report.dropped_missing_outcome, 2);
    assert_eq!(report.dropped_missing_treatment, 1);
    assert_eq!(report.dropped(), 3);
    assert_eq!(report.unmapped.len(), 3);
    let occode = report
        .unmapped
        .iter()
        .find(|w| w.field == SourceField::Occode)
        .expect("OCCODE warning");
    assert_eq!(occode.value, "9");
    assert_eq!(occode.count, 2);
    assert_eq!(report.unmapped_total(), 4);
    assert_eq!(outcome.records[0].age, None);
}

#[test]
fn missing_allocation_kept_when_requested() {
    let input = table(&[Row {
        asp: None,
        hep: Some("L"),
        occode: Some("2"),
        ratrial: Some("Y"),
        age: "80",
    }]);

    let dropped = normalize(&input, &NormalizeOptions::default()).expect("normalize");
    assert!(dropped.records.is_empty());
    assert_eq!(dropped.report.dropped_missing_treatment, 1);

    let options = NormalizeOptions::new().with_missing_treatment(MissingTreatmentMode::Keep);
    let kept = normalize(&input, &options).expect("normalize");
    assert_eq!(kept.records.len(), 1);
    assert_eq!(kept.records[0].treatment, None);
    assert_eq!(kept.report.kept_missing_treatment, 1);
    assert!(kept.report.unmapped.is_empty());
}

#[test]
fn explore_keeps_every_row() {
    let input = table(&[
        row("N", "H", Some("3"), Some("Y"), "70"),
        row("Y", "L", None, None, "71"),
    ]);

    let records = explore(&input).expect("explore");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].treatment, Some(Treatment::NoAspMedHep));
    assert_eq!(records[0].raw.get(SourceField::Rxhep), Some("M"));
    assert_eq!(records[1].treatment, Some(Treatment::YesAspLowHep));
    assert_eq!(records[1].raw.get(SourceField::Occode), None);
}

#[test]
fn drop_reason_precedence() {
    let input = table(&[row("Q", "N", None, None, "70")]);

    let outcome = normalize(&input, &NormalizeOptions::default()).expect("normalize");

    assert_eq!(outcome.report.dropped_pilot_phase, 1);
    assert_eq!(outcome.report.dropped(), 1);
    assert!(outcome.report.unmapped.iter().any(|w| w.field == SourceField::Rxasp));
}
