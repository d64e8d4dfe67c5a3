//! Column resolution and row projection.

use ist_model::{RawPatientRecord, SourceField, SourceTable};

use crate::error::SchemaError;

/// Positions of the projected fields in a source table.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    indices: [usize; SourceField::COUNT],
}

impl ColumnMap {
    /// Resolve every projected field, or report all that are absent.
    pub fn resolve(table: &SourceTable) -> Result<Self, SchemaError> {
        let mut indices = [0usize; SourceField::COUNT];
        let mut missing = Vec::new();
        for field in SourceField::ALL {
            match table.column_index(field.as_str()) {
                Some(index) => indices[field.index()] = index,
                None => missing.push(field),
            }
        }
        if missing.is_empty() {
            Ok(Self { indices })
        } else {
            Err(SchemaError { missing })
        }
    }

    pub fn index(&self, field: SourceField) -> usize {
        self.indices[field.index()]
    }

    /// Project one row onto the source fields, dropping all other columns.
    pub fn project(&self, table: &SourceTable, row: usize) -> RawPatientRecord {
        let mut record = RawPatientRecord::new();
        for field in SourceField::ALL {
            let value = table.cell(row, self.index(field)).map(str::to_string);
            record.set(field, value);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with(headers: &[&str]) -> SourceTable {
        SourceTable::new(headers.iter().map(|h| (*h).to_string()).collect())
    }

    #[test]
    fn resolve_reports_every_missing_field() {
        let table = table_with(&["HOSPNUM", "RXASP"]);
        let err = ColumnMap::resolve(&table).expect_err("schema must fail");
        assert_eq!(err.missing.len(), SourceField::COUNT - 1);
        assert!(!err.missing.contains(&SourceField::Rxasp));
        assert!(err.missing.contains(&SourceField::Occode));
    }

    #[test]
    fn project_picks_columns_by_name() {
        let mut headers: Vec<&str> = vec!["HOSPNUM"];
        headers.extend(SourceField::ALL.iter().rev().map(|field| field.as_str()));
        let mut table = table_with(&headers);
        let mut row = vec![Some("42".to_string())];
        row.extend(
            SourceField::ALL
                .iter()
                .rev()
                .map(|field| Some(format!("v-{}", field.as_str()))),
        );
        table.push_row(row);

        let map = ColumnMap::resolve(&table).expect("resolve");
        let record = map.project(&table, 0);

        assert_eq!(record.get(SourceField::Rdelay), Some("v-RDELAY"));
        assert_eq!(record.get(SourceField::Occode), Some("v-OCCODE"));
    }
}
