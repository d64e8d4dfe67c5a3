//! Reproducible sampling and stratified train/test partitioning.
//!
//! Both operations are seeded and keep the input order of the rows they
//! select, so the same input and seed always yield the same rows.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;
use tracing::debug;

use ist_model::{DeadOrDep, NormalizedPatientRecord};

use crate::error::SplitError;

/// Default seed used by the CLI for sampling and splitting.
pub const DEFAULT_SEED: u64 = 2020;

/// Training and held-out rows.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestSplit<T> {
    pub train: Vec<T>,
    pub test: Vec<T>,
}

/// Draw `n` rows without replacement, in input order.
///
/// Returns every row when `n` is at least the input length.
pub fn sample<T: Clone>(records: &[T], n: usize, seed: u64) -> Vec<T> {
    if n >= records.len() {
        return records.to_vec();
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut picked = index::sample(&mut rng, records.len(), n).into_vec();
    picked.sort_unstable();
    picked.into_iter().map(|i| records[i].clone()).collect()
}

/// Split normalized records, stratified by `dead_or_dep`.
pub fn split_train_test(
    records: &[NormalizedPatientRecord],
    train_fraction: f64,
    seed: u64,
) -> Result<TrainTestSplit<NormalizedPatientRecord>, SplitError> {
    split_train_test_by(records, train_fraction, seed, |record| record.dead_or_dep)
}

/// Split rows so each stratum contributes `round(len * train_fraction)` rows to training.
///
/// Strata are visited in key order, each with its own draw from one seeded generator.
pub fn split_train_test_by<T, K, F>(
    records: &[T],
    train_fraction: f64,
    seed: u64,
    stratum: F,
) -> Result<TrainTestSplit<T>, SplitError>
where
    T: Clone,
    K: Ord,
    F: Fn(&T) -> K,
{
    if !(train_fraction > 0.0 && train_fraction < 1.0) {
        return Err(SplitError::InvalidFraction(train_fraction));
    }

    let mut strata: BTreeMap<K, Vec<usize>> = BTreeMap::new();
    for (position, record) in records.iter().enumerate() {
        strata.entry(stratum(record)).or_default().push(position);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut in_train = vec![false; records.len()];
    for members in strata.values() {
        let wanted = ((members.len() as f64) * train_fraction).round() as usize;
        let wanted = wanted.min(members.len());
        for picked in index::sample(&mut rng, members.len(), wanted) {
            in_train[members[picked]] = true;
        }
    }

    let mut split = TrainTestSplit {
        train: Vec::new(),
        test: Vec::new(),
    };
    for (record, train) in records.iter().zip(in_train) {
        if train {
            split.train.push(record.clone());
        } else {
            split.test.push(record.clone());
        }
    }
    debug!(
        strata = strata.len(),
        train = split.train.len(),
        test = split.test.len(),
        "partitioned records"
    );
    Ok(split)
}

/// Share of poor outcomes, used to check stratification.
pub fn poor_outcome_rate(records: &[NormalizedPatientRecord]) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    let poor = records
        .iter()
        .filter(|record| record.dead_or_dep == DeadOrDep::Yes)
        .count();
    Some(poor as f64 / records.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_is_reproducible_and_ordered() {
        let rows: Vec<u32> = (0..100).collect();

        let first = sample(&rows, 10, 7);
        let second = sample(&rows, 10, 7);

        assert_eq!(first, second);
        assert_eq!(first.len(), 10);
        assert!(first.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn sample_larger_than_input_returns_all() {
        let rows = vec!["a", "b", "c"];
        assert_eq!(sample(&rows, 10, 1), rows);
    }

    #[test]
    fn split_is_stratified() {
        let rows: Vec<(u32, bool)> = (0..100).map(|i| (i, i % 4 == 0)).collect();

        let split = split_train_test_by(&rows, 0.8, 11, |row| row.1).expect("split");

        assert_eq!(split.train.len() + split.test.len(), 100);
        let train_flagged = split.train.iter().filter(|row| row.1).count();
        assert_eq!(train_flagged, 20);
        assert_eq!(split.train.len(), 80);
        assert!(split.test.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }

    #[test]
    fn split_rejects_bad_fraction() {
        let rows = vec![1, 2, 3];
        for fraction in [0.0, 1.0, -0.5, f64::NAN] {
            assert!(matches!(
                split_train_test_by(&rows, fraction, 1, |_| 0),
                Err(SplitError::InvalidFraction(_))
            ));
        }
    }
}
