//! Data model for the International Stroke Trial normalizer.
//!
//! - **categories**: closed categorical domains and the treatment/outcome derivations
//! - **fields**: source and output field catalogs, variable labels
//! - **record**: raw, exploratory, and normalized patient records
//! - **table**: in-memory source table handed over by ingestion

pub mod categories;
pub mod error;
pub mod fields;
pub mod record;
pub mod table;

pub use categories::{
    Category, Consciousness, DeadOrDep, DeficitStatus, HeparinDose, LEGACY_HEPARIN_MEDIUM,
    Outcome, Sex, StrokeType, Treatment, YesNo, collapse_heparin_code,
};
pub use error::{ModelError, Result};
pub use fields::{FieldKind, OutputField, SourceField, VariableLabel, variable_labels};
pub use record::{
    ExploratoryRecord, FieldValue, MISSING_CODE, NormalizedPatientRecord, RawPatientRecord,
    format_numeric,
};
pub use table::SourceTable;
