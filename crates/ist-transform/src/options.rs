//! Configuration options for record normalization.

use serde::{Deserialize, Serialize};

/// What to do with rows whose aspirin or heparin allocation is missing or unmapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MissingTreatmentMode {
    /// Exclude the row and count it in the report.
    #[default]
    Drop,
    /// Keep the row with an absent treatment.
    Keep,
}

/// Options controlling normalization behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeOptions {
    /// Handling of rows without a derivable treatment.
    pub missing_treatment: MissingTreatmentMode,

    /// Log a warning for each distinct unmapped value.
    ///
    /// Unmapped values are always counted in the report.
    pub warn_on_unmapped: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            missing_treatment: MissingTreatmentMode::Drop,
            warn_on_unmapped: true,
        }
    }
}

impl NormalizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_missing_treatment(mut self, mode: MissingTreatmentMode) -> Self {
        self.missing_treatment = mode;
        self
    }

    #[must_use]
    pub fn with_warn_on_unmapped(mut self, enable: bool) -> Self {
        self.warn_on_unmapped = enable;
        self
    }
}
