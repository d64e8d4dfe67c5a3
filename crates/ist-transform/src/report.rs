//! Run report: row accounting and unmapped-value warnings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use ist_model::SourceField;

/// Why a row was excluded from the normalized set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropReason {
    /// `RATRIAL` is missing (pilot-phase record).
    PilotPhase,
    /// `OCCODE` did not map to an outcome.
    MissingOutcome,
    /// Aspirin or heparin allocation did not map to a treatment.
    MissingTreatment,
}

/// A value outside the documented domain of a field. Non-fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmappedValueWarning {
    pub field: SourceField,
    pub value: String,
    pub count: usize,
}

/// Row accounting for one normalization run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeReport {
    pub input_rows: usize,
    pub output_rows: usize,
    pub dropped_pilot_phase: usize,
    pub dropped_missing_outcome: usize,
    pub dropped_missing_treatment: usize,
    /// Rows kept with an absent treatment (only in `Keep` mode).
    pub kept_missing_treatment: usize,
    /// Sorted by field, then value.
    pub unmapped: Vec<UnmappedValueWarning>,
}

impl NormalizeReport {
    pub fn dropped(&self) -> usize {
        self.dropped_pilot_phase + self.dropped_missing_outcome + self.dropped_missing_treatment
    }

    pub fn record_drop(&mut self, reason: DropReason) {
        match reason {
            DropReason::PilotPhase => self.dropped_pilot_phase += 1,
            DropReason::MissingOutcome => self.dropped_missing_outcome += 1,
            DropReason::MissingTreatment => self.dropped_missing_treatment += 1,
        }
    }

    pub fn unmapped_total(&self) -> usize {
        self.unmapped.iter().map(|warning| warning.count).sum()
    }
}

/// Collects unmapped values during a run.
#[derive(Debug, Default)]
pub(crate) struct UnmappedValues {
    counts: BTreeMap<(SourceField, String), usize>,
}

impl UnmappedValues {
    pub(crate) fn record(&mut self, field: SourceField, value: &str) {
        *self
            .counts
            .entry((field, value.to_string()))
            .or_insert(0) += 1;
    }

    pub(crate) fn into_warnings(self) -> Vec<UnmappedValueWarning> {
        self.counts
            .into_iter()
            .map(|((field, value), count)| UnmappedValueWarning {
                field,
                value,
                count,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmapped_values_are_grouped_and_sorted() {
        let mut unmapped = UnmappedValues::default();
        unmapped.record(SourceField::Occode, "9");
        unmapped.record(SourceField::Rxhep, "X");
        unmapped.record(SourceField::Occode, "0");
        unmapped.record(SourceField::Occode, "9");

        let warnings = unmapped.into_warnings();

        assert_eq!(warnings.len(), 3);
        assert_eq!(warnings[0].field, SourceField::Rxhep);
        assert_eq!(warnings[1].value, "0");
        assert_eq!(warnings[2].value, "9");
        assert_eq!(warnings[2].count, 2);
    }

    #[test]
    fn drop_counts() {
        let mut report = NormalizeReport::default();
        report.record_drop(DropReason::PilotPhase);
        report.record_drop(DropReason::MissingOutcome);
        report.record_drop(DropReason::MissingOutcome);
        assert_eq!(report.dropped(), 3);
        assert_eq!(report.dropped_missing_outcome, 2);
    }
}
