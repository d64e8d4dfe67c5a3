//! Field catalog for source and normalized trial records.
//!
//! `SourceField` lists the raw columns the normalizer projects from the
//! trial file. `OutputField` lists the columns of a normalized record in
//! emission order. Writers and the label table both iterate
//! [`OutputField::ALL`], which keeps labels in sync with emitted columns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::categories::{
    Category, Consciousness, DeadOrDep, DeficitStatus, HeparinDose, Sex, StrokeType, Treatment,
    YesNo,
};
use crate::error::ModelError;

/// Whether a field holds a number or a category code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Numeric,
    Categorical,
}

/// Raw trial columns retained by projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SourceField {
    Rdelay,
    Rconsc,
    Sex,
    Age,
    Rsleep,
    Ratrial,
    Rct,
    Rvisinf,
    Rhep24,
    Rasp3,
    Rsbp,
    Rdef1,
    Rdef2,
    Rdef3,
    Rdef4,
    Rdef5,
    Rdef6,
    Rdef7,
    Rdef8,
    Stype,
    Rxasp,
    Rxhep,
    Occode,
}

impl SourceField {
    pub const COUNT: usize = 23;

    /// All projected fields, in source-file order.
    pub const ALL: [SourceField; Self::COUNT] = [
        SourceField::Rdelay,
        SourceField::Rconsc,
        SourceField::Sex,
        SourceField::Age,
        SourceField::Rsleep,
        SourceField::Ratrial,
        SourceField::Rct,
        SourceField::Rvisinf,
        SourceField::Rhep24,
        SourceField::Rasp3,
        SourceField::Rsbp,
        SourceField::Rdef1,
        SourceField::Rdef2,
        SourceField::Rdef3,
        SourceField::Rdef4,
        SourceField::Rdef5,
        SourceField::Rdef6,
        SourceField::Rdef7,
        SourceField::Rdef8,
        SourceField::Stype,
        SourceField::Rxasp,
        SourceField::Rxhep,
        SourceField::Occode,
    ];

    /// Deficit indicators RDEF1..RDEF8 in order.
    pub const DEFICITS: [SourceField; 8] = [
        SourceField::Rdef1,
        SourceField::Rdef2,
        SourceField::Rdef3,
        SourceField::Rdef4,
        SourceField::Rdef5,
        SourceField::Rdef6,
        SourceField::Rdef7,
        SourceField::Rdef8,
    ];

    /// Column name as it appears in the trial file.
    pub fn as_str(self) -> &'static str {
        match self {
            SourceField::Rdelay => "RDELAY",
            SourceField::Rconsc => "RCONSC",
            SourceField::Sex => "SEX",
            SourceField::Age => "AGE",
            SourceField::Rsleep => "RSLEEP",
            SourceField::Ratrial => "RATRIAL",
            SourceField::Rct => "RCT",
            SourceField::Rvisinf => "RVISINF",
            SourceField::Rhep24 => "RHEP24",
            SourceField::Rasp3 => "RASP3",
            SourceField::Rsbp => "RSBP",
            SourceField::Rdef1 => "RDEF1",
            SourceField::Rdef2 => "RDEF2",
            SourceField::Rdef3 => "RDEF3",
            SourceField::Rdef4 => "RDEF4",
            SourceField::Rdef5 => "RDEF5",
            SourceField::Rdef6 => "RDEF6",
            SourceField::Rdef7 => "RDEF7",
            SourceField::Rdef8 => "RDEF8",
            SourceField::Stype => "STYPE",
            SourceField::Rxasp => "RXASP",
            SourceField::Rxhep => "RXHEP",
            SourceField::Occode => "OCCODE",
        }
    }

    /// Position of this field in [`SourceField::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn kind(self) -> FieldKind {
        match self {
            SourceField::Rdelay | SourceField::Age | SourceField::Rsbp | SourceField::Occode => {
                FieldKind::Numeric
            }
            _ => FieldKind::Categorical,
        }
    }

    /// Human-readable label used by report renderers.
    pub fn label(self) -> &'static str {
        match self {
            SourceField::Rdelay => "Delay between stroke and randomisation (hours)",
            SourceField::Rconsc => "Conscious state at randomisation",
            SourceField::Sex => "Sex",
            SourceField::Age => "Age (years)",
            SourceField::Rsleep => "Symptoms noted on waking",
            SourceField::Ratrial => "Atrial fibrillation",
            SourceField::Rct => "CT before randomisation",
            SourceField::Rvisinf => "Infarct visible on CT",
            SourceField::Rhep24 => "Heparin within 24 hours prior to randomisation",
            SourceField::Rasp3 => "Aspirin within 3 days prior to randomisation",
            SourceField::Rsbp => "Systolic blood pressure at randomisation (mmHg)",
            SourceField::Rdef1 => "Face deficit",
            SourceField::Rdef2 => "Arm/hand deficit",
            SourceField::Rdef3 => "Leg/foot deficit",
            SourceField::Rdef4 => "Dysphasia",
            SourceField::Rdef5 => "Hemianopia",
            SourceField::Rdef6 => "Visuospatial disorder",
            SourceField::Rdef7 => "Brainstem/cerebellar signs",
            SourceField::Rdef8 => "Other deficit",
            SourceField::Stype => "Stroke subtype",
            SourceField::Rxasp => "Trial aspirin allocated",
            SourceField::Rxhep => "Trial heparin allocated",
            SourceField::Occode => "Six-month outcome code",
        }
    }

    /// Category codes in canonical order, or `None` for numeric fields.
    pub fn levels(self) -> Option<Vec<&'static str>> {
        match self {
            SourceField::Rconsc => Some(Consciousness::codes()),
            SourceField::Sex => Some(Sex::codes()),
            SourceField::Rsleep
            | SourceField::Ratrial
            | SourceField::Rct
            | SourceField::Rvisinf
            | SourceField::Rhep24
            | SourceField::Rasp3
            | SourceField::Rxasp => Some(YesNo::codes()),
            SourceField::Rdef1
            | SourceField::Rdef2
            | SourceField::Rdef3
            | SourceField::Rdef4
            | SourceField::Rdef5
            | SourceField::Rdef6
            | SourceField::Rdef7
            | SourceField::Rdef8 => Some(DeficitStatus::codes()),
            SourceField::Stype => Some(StrokeType::codes()),
            SourceField::Rxhep => Some(HeparinDose::codes()),
            SourceField::Rdelay | SourceField::Age | SourceField::Rsbp | SourceField::Occode => None,
        }
    }

    /// True for fields superseded by derived outputs.
    pub fn is_superseded(self) -> bool {
        matches!(
            self,
            SourceField::Rxasp | SourceField::Rxhep | SourceField::Occode
        )
    }
}

impl fmt::Display for SourceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceField {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        SourceField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ModelError::UnknownSourceField(s.to_string()))
    }
}

/// Columns of a normalized record, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputField {
    /// A covariate carried over from the source file.
    Covariate(SourceField),
    Treatment,
    DeadOrDep,
}

impl OutputField {
    pub const ALL: [OutputField; 22] = [
        OutputField::Covariate(SourceField::Rdelay),
        OutputField::Covariate(SourceField::Rconsc),
        OutputField::Covariate(SourceField::Sex),
        OutputField::Covariate(SourceField::Age),
        OutputField::Covariate(SourceField::Rsleep),
        OutputField::Covariate(SourceField::Ratrial),
        OutputField::Covariate(SourceField::Rct),
        OutputField::Covariate(SourceField::Rvisinf),
        OutputField::Covariate(SourceField::Rhep24),
        OutputField::Covariate(SourceField::Rasp3),
        OutputField::Covariate(SourceField::Rsbp),
        OutputField::Covariate(SourceField::Rdef1),
        OutputField::Covariate(SourceField::Rdef2),
        OutputField::Covariate(SourceField::Rdef3),
        OutputField::Covariate(SourceField::Rdef4),
        OutputField::Covariate(SourceField::Rdef5),
        OutputField::Covariate(SourceField::Rdef6),
        OutputField::Covariate(SourceField::Rdef7),
        OutputField::Covariate(SourceField::Rdef8),
        OutputField::Covariate(SourceField::Stype),
        OutputField::Treatment,
        OutputField::DeadOrDep,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OutputField::Covariate(field) => field.as_str(),
            OutputField::Treatment => "treatment",
            OutputField::DeadOrDep => "dead_or_dep",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OutputField::Covariate(field) => field.label(),
            OutputField::Treatment => "Treatment (aspirin x heparin dose)",
            OutputField::DeadOrDep => "Dead or dependent at six months",
        }
    }

    /// Category codes in canonical order, or `None` for numeric fields.
    pub fn levels(self) -> Option<Vec<&'static str>> {
        match self {
            OutputField::Covariate(field) => field.levels(),
            OutputField::Treatment => Some(Treatment::codes()),
            OutputField::DeadOrDep => Some(DeadOrDep::codes()),
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            OutputField::Covariate(field) => field.kind(),
            OutputField::Treatment | OutputField::DeadOrDep => FieldKind::Categorical,
        }
    }
}

impl fmt::Display for OutputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputField {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        OutputField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ModelError::UnknownOutputField(s.to_string()))
    }
}

/// One row of the variable-label side table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableLabel {
    pub variable: String,
    pub label: String,
}

/// Labels for every emitted field, in emission order.
pub fn variable_labels() -> Vec<VariableLabel> {
    OutputField::ALL
        .iter()
        .map(|field| VariableLabel {
            variable: field.as_str().to_string(),
            label: field.label().to_string(),
        })
        .collect()
}
