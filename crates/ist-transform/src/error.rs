use thiserror::Error;

use ist_model::SourceField;

/// The source table lacks one or more projected columns.
///
/// Fatal for the whole batch: no records are produced.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("missing required source field(s): {}", join_fields(.missing))]
pub struct SchemaError {
    pub missing: Vec<SourceField>,
}

fn join_fields(fields: &[SourceField]) -> String {
    fields
        .iter()
        .map(|field| field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SplitError {
    #[error("train fraction must be strictly between 0 and 1, got {0}")]
    InvalidFraction(f64),
}
