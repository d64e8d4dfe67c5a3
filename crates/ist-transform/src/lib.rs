//! Trial record transformation.
//!
//! - **normalize**: the record normalizer and its exploratory variant
//! - **projection**: source column resolution (schema check) and row projection
//! - **options**: normalization options
//! - **report**: row accounting and unmapped-value warnings
//! - **partition**: seeded sampling and stratified train/test split

pub mod error;
pub mod normalize;
pub mod options;
pub mod partition;
pub mod projection;
pub mod report;

pub use error::{SchemaError, SplitError};
pub use normalize::{NormalizeOutcome, collapse_heparin, explore, normalize, normalize_record};
pub use options::{MissingTreatmentMode, NormalizeOptions};
pub use partition::{
    DEFAULT_SEED, TrainTestSplit, poor_outcome_rate, sample, split_train_test, split_train_test_by,
};
pub use projection::ColumnMap;
pub use report::{DropReason, NormalizeReport, UnmappedValueWarning};
