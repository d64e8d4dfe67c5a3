//! Descriptive statistics over normalized records.

use serde::{Deserialize, Serialize};

use ist_model::{
    Category, DeadOrDep, FieldKind, FieldValue, MISSING_CODE, NormalizedPatientRecord,
    OutputField, Sex, Treatment,
};

use crate::error::{ReportError, Result};

/// Group label for the all-records column.
pub const OVERALL_GROUP: &str = "overall";

/// Baseline and outcome summary for one treatment group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub group: String,
    pub n: usize,
    pub age_mean: Option<f64>,
    /// Sample standard deviation (n - 1 denominator).
    pub age_sd: Option<f64>,
    /// Percent female among rows with a recorded sex.
    pub female_pct: Option<f64>,
    /// Percent with `dead_or_dep == yes`.
    pub poor_outcome_pct: Option<f64>,
}

impl GroupSummary {
    fn from_records<'a>(
        group: impl Into<String>,
        records: impl Iterator<Item = &'a NormalizedPatientRecord> + Clone,
    ) -> Self {
        let ages: Vec<f64> = records.clone().filter_map(|record| record.age).collect();
        let sexes: Vec<Sex> = records.clone().filter_map(|record| record.sex).collect();
        let outcomes: Vec<DeadOrDep> = records.map(|record| record.dead_or_dep).collect();

        let females = sexes.iter().filter(|sex| **sex == Sex::Female).count();
        let poor = outcomes.iter().filter(|o| **o == DeadOrDep::Yes).count();

        Self {
            group: group.into(),
            n: outcomes.len(),
            age_mean: mean(&ages),
            age_sd: sample_sd(&ages),
            female_pct: percent(females, sexes.len()),
            poor_outcome_pct: percent(poor, outcomes.len()),
        }
    }
}

/// One level of a frequency table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyRow {
    pub level: String,
    pub count: usize,
    pub percent: f64,
}

/// Summaries for every treatment arm in canonical order, then `NA` when
/// some records carry no treatment, then the overall column.
///
/// Arms with no records are still listed with `n == 0`.
pub fn summarize_by_treatment(records: &[NormalizedPatientRecord]) -> Vec<GroupSummary> {
    let mut groups: Vec<GroupSummary> = Treatment::LEVELS
        .iter()
        .map(|arm| {
            GroupSummary::from_records(
                arm.code(),
                records.iter().filter(move |r| r.treatment == Some(*arm)),
            )
        })
        .collect();

    if records.iter().any(|record| record.treatment.is_none()) {
        groups.push(GroupSummary::from_records(
            MISSING_CODE,
            records.iter().filter(|r| r.treatment.is_none()),
        ));
    }

    groups.push(GroupSummary::from_records(OVERALL_GROUP, records.iter()));
    groups
}

/// Level counts for a categorical output field.
///
/// Every level is listed, including those with zero count. An `NA` row is
/// appended only when some records are missing the field.
pub fn frequency_table(
    records: &[NormalizedPatientRecord],
    field: OutputField,
) -> Result<Vec<FrequencyRow>> {
    let levels = match (field.kind(), field.levels()) {
        (FieldKind::Categorical, Some(levels)) => levels,
        _ => return Err(ReportError::NotCategorical(field)),
    };

    let mut counts = vec![0usize; levels.len()];
    let mut missing = 0usize;
    for record in records {
        match record.value(field) {
            FieldValue::Code(code) => {
                if let Some(slot) = levels.iter().position(|level| *level == code) {
                    counts[slot] += 1;
                }
            }
            FieldValue::Missing | FieldValue::Number(_) => missing += 1,
        }
    }

    let total = records.len();
    let mut rows: Vec<FrequencyRow> = levels
        .iter()
        .zip(counts)
        .map(|(level, count)| FrequencyRow {
            level: (*level).to_string(),
            count,
            percent: percent(count, total).unwrap_or(0.0),
        })
        .collect();
    if missing > 0 {
        rows.push(FrequencyRow {
            level: MISSING_CODE.to_string(),
            count: missing,
            percent: percent(missing, total).unwrap_or(0.0),
        });
    }
    Ok(rows)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn sample_sd(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((squares / (values.len() - 1) as f64).sqrt())
}

fn percent(part: usize, whole: usize) -> Option<f64> {
    if whole == 0 {
        None
    } else {
        Some(100.0 * part as f64 / whole as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_sd_uses_n_minus_one() {
        let sd = sample_sd(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((sd - 2.138_089_935).abs() < 1e-6);
        assert_eq!(sample_sd(&[1.0]), None);
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn percent_of_empty_is_none() {
        assert_eq!(percent(0, 0), None);
        assert_eq!(percent(1, 4), Some(25.0));
    }
}
