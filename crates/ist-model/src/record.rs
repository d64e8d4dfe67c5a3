//! Raw, exploratory, and normalized patient records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::categories::{
    Category, Consciousness, DeadOrDep, DeficitStatus, Sex, StrokeType, Treatment, YesNo,
};
use crate::fields::{OutputField, SourceField};

/// Text written for an absent value in flat output.
pub const MISSING_CODE: &str = "NA";

/// One projected trial row, as captured. Absent cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPatientRecord {
    values: [Option<String>; SourceField::COUNT],
}

impl RawPatientRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: SourceField) -> Option<&str> {
        self.values[field.index()].as_deref()
    }

    pub fn set(&mut self, field: SourceField, value: Option<String>) {
        self.values[field.index()] = value;
    }

    #[must_use]
    pub fn with(mut self, field: SourceField, value: &str) -> Self {
        self.set(field, Some(value.to_string()));
        self
    }
}

/// Projected row with the heparin collapse and treatment applied, nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExploratoryRecord {
    pub raw: RawPatientRecord,
    pub treatment: Option<Treatment>,
}

/// A modeling-ready trial row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPatientRecord {
    #[serde(rename = "RDELAY")]
    pub rdelay: Option<f64>,
    #[serde(rename = "RCONSC")]
    pub rconsc: Option<Consciousness>,
    #[serde(rename = "SEX")]
    pub sex: Option<Sex>,
    #[serde(rename = "AGE")]
    pub age: Option<f64>,
    #[serde(rename = "RSLEEP")]
    pub rsleep: Option<YesNo>,
    #[serde(rename = "RATRIAL")]
    pub ratrial: YesNo,
    #[serde(rename = "RCT")]
    pub rct: Option<YesNo>,
    #[serde(rename = "RVISINF")]
    pub rvisinf: Option<YesNo>,
    #[serde(rename = "RHEP24")]
    pub rhep24: Option<YesNo>,
    #[serde(rename = "RASP3")]
    pub rasp3: Option<YesNo>,
    #[serde(rename = "RSBP")]
    pub rsbp: Option<f64>,
    #[serde(rename = "RDEF1")]
    pub rdef1: Option<DeficitStatus>,
    #[serde(rename = "RDEF2")]
    pub rdef2: Option<DeficitStatus>,
    #[serde(rename = "RDEF3")]
    pub rdef3: Option<DeficitStatus>,
    #[serde(rename = "RDEF4")]
    pub rdef4: Option<DeficitStatus>,
    #[serde(rename = "RDEF5")]
    pub rdef5: Option<DeficitStatus>,
    #[serde(rename = "RDEF6")]
    pub rdef6: Option<DeficitStatus>,
    #[serde(rename = "RDEF7")]
    pub rdef7: Option<DeficitStatus>,
    #[serde(rename = "RDEF8")]
    pub rdef8: Option<DeficitStatus>,
    #[serde(rename = "STYPE")]
    pub stype: Option<StrokeType>,
    /// Absent only when rows with missing allocation codes are kept.
    pub treatment: Option<Treatment>,
    pub dead_or_dep: DeadOrDep,
}

/// A single cell of a normalized record, ready for flat output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Missing,
    Number(f64),
    Code(&'static str),
}

impl FieldValue {
    fn code<C: Category>(value: Option<C>) -> Self {
        value.map_or(FieldValue::Missing, |level| FieldValue::Code(level.code()))
    }

    fn number(value: Option<f64>) -> Self {
        value.map_or(FieldValue::Missing, FieldValue::Number)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Missing => f.write_str(MISSING_CODE),
            FieldValue::Number(value) => f.write_str(&format_numeric(*value)),
            FieldValue::Code(code) => f.write_str(code),
        }
    }
}

/// Formats a floating-point number without trailing zeros.
pub fn format_numeric(value: f64) -> String {
    let s = format!("{value}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

impl NormalizedPatientRecord {
    /// Value of one output column.
    pub fn value(&self, field: OutputField) -> FieldValue {
        match field {
            OutputField::Treatment => FieldValue::code(self.treatment),
            OutputField::DeadOrDep => FieldValue::Code(self.dead_or_dep.code()),
            OutputField::Covariate(source) => match source {
                SourceField::Rdelay => FieldValue::number(self.rdelay),
                SourceField::Rconsc => FieldValue::code(self.rconsc),
                SourceField::Sex => FieldValue::code(self.sex),
                SourceField::Age => FieldValue::number(self.age),
                SourceField::Rsleep => FieldValue::code(self.rsleep),
                SourceField::Ratrial => FieldValue::Code(self.ratrial.code()),
                SourceField::Rct => FieldValue::code(self.rct),
                SourceField::Rvisinf => FieldValue::code(self.rvisinf),
                SourceField::Rhep24 => FieldValue::code(self.rhep24),
                SourceField::Rasp3 => FieldValue::code(self.rasp3),
                SourceField::Rsbp => FieldValue::number(self.rsbp),
                SourceField::Rdef1 => FieldValue::code(self.rdef1),
                SourceField::Rdef2 => FieldValue::code(self.rdef2),
                SourceField::Rdef3 => FieldValue::code(self.rdef3),
                SourceField::Rdef4 => FieldValue::code(self.rdef4),
                SourceField::Rdef5 => FieldValue::code(self.rdef5),
                SourceField::Rdef6 => FieldValue::code(self.rdef6),
                SourceField::Rdef7 => FieldValue::code(self.rdef7),
                SourceField::Rdef8 => FieldValue::code(self.rdef8),
                SourceField::Stype => FieldValue::code(self.stype),
                SourceField::Rxasp | SourceField::Rxhep | SourceField::Occode => {
                    FieldValue::Missing
                }
            },
        }
    }

    /// All output cells in emission order.
    pub fn values(&self) -> Vec<FieldValue> {
        OutputField::ALL
            .iter()
            .map(|field| self.value(*field))
            .collect()
    }
}
