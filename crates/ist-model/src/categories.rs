//! Closed categorical domains for trial variables.
//!
//! Every text-valued trial field is coerced into one of these enums so that
//! repeated values tabulate as the same category. Each domain has a fixed
//! level order; the first level is the reference level for downstream
//! models.
//!
//! Raw codes are matched after trimming and case-insensitively. Anything
//! else is an unmapped value and becomes missing at the call site.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A closed, ordered set of category levels with stable codes.
pub trait Category: Copy + Eq + Ord + fmt::Debug + 'static {
    /// All levels in canonical order. The first entry is the reference level.
    const LEVELS: &'static [Self];

    /// The code written to output files.
    fn code(self) -> &'static str;

    /// Parse a raw code into a level.
    fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        Self::LEVELS
            .iter()
            .copied()
            .find(|level| level.code().eq_ignore_ascii_case(trimmed))
    }

    /// The reference level (first in canonical order).
    fn reference() -> Self {
        Self::LEVELS[0]
    }

    /// Codes of all levels in canonical order.
    fn codes() -> Vec<&'static str> {
        Self::LEVELS.iter().map(|level| level.code()).collect()
    }
}

macro_rules! category {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $code:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $code)] $variant ),+
        }

        impl Category for $name {
            const LEVELS: &'static [Self] = &[$($name::$variant),+];

            fn code(self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }
    };
}

category! {
    /// Binary Y/N indicator (RSLEEP, RATRIAL, RCT, RVISINF, RHEP24, RASP3, RXASP).
    pub enum YesNo {
        No => "N",
        Yes => "Y",
    }
}

category! {
    /// Conscious state at randomisation (RCONSC).
    pub enum Consciousness {
        Drowsy => "D",
        FullyAlert => "F",
        Unconscious => "U",
    }
}

category! {
    /// Sex (SEX).
    pub enum Sex {
        Female => "F",
        Male => "M",
    }
}

category! {
    /// Neurological deficit indicator (RDEF1..RDEF8).
    pub enum DeficitStatus {
        /// Cannot assess.
        CannotAssess => "C",
        No => "N",
        Yes => "Y",
    }
}

category! {
    /// Stroke subtype (STYPE).
    pub enum StrokeType {
        /// Lacunar infarct.
        Laci => "LACI",
        Other => "OTH",
        /// Partial anterior circulation infarct.
        Paci => "PACI",
        /// Posterior circulation infarct.
        Poci => "POCI",
        /// Total anterior circulation infarct.
        Taci => "TACI",
    }
}

category! {
    /// Allocated heparin dose after the legacy code collapse.
    pub enum HeparinDose {
        None => "N",
        Low => "L",
        Medium => "M",
    }
}

/// Legacy heparin code meaning the medium dose.
pub const LEGACY_HEPARIN_MEDIUM: &str = "H";

/// Collapse the legacy heparin code into the medium dose code.
///
/// `H` and `M` name the same dose level; all other values pass through.
pub fn collapse_heparin_code(raw: &str) -> &str {
    if raw.trim().eq_ignore_ascii_case(LEGACY_HEPARIN_MEDIUM) {
        HeparinDose::Medium.code()
    } else {
        raw
    }
}

category! {
    /// Aspirin x heparin-dose allocation.
    ///
    /// Level order is a reporting contract: the three no-aspirin arms first,
    /// then the aspirin arms, with `no_asp_no_hep` as reference.
    pub enum Treatment {
        NoAspNoHep => "no_asp_no_hep",
        NoAspLowHep => "no_asp_low_hep",
        NoAspMedHep => "no_asp_med_hep",
        YesAspNoHep => "yes_asp_no_hep",
        YesAspLowHep => "yes_asp_low_hep",
        YesAspMedHep => "yes_asp_med_hep",
    }
}

impl Treatment {
    /// Cross an aspirin allocation with a heparin dose.
    pub fn from_allocation(aspirin: YesNo, heparin: HeparinDose) -> Self {
        match (aspirin, heparin) {
            (YesNo::No, HeparinDose::None) => Treatment::NoAspNoHep,
            (YesNo::No, HeparinDose::Low) => Treatment::NoAspLowHep,
            (YesNo::No, HeparinDose::Medium) => Treatment::NoAspMedHep,
            (YesNo::Yes, HeparinDose::None) => Treatment::YesAspNoHep,
            (YesNo::Yes, HeparinDose::Low) => Treatment::YesAspLowHep,
            (YesNo::Yes, HeparinDose::Medium) => Treatment::YesAspMedHep,
        }
    }

    pub fn aspirin(self) -> YesNo {
        match self {
            Treatment::NoAspNoHep | Treatment::NoAspLowHep | Treatment::NoAspMedHep => YesNo::No,
            Treatment::YesAspNoHep | Treatment::YesAspLowHep | Treatment::YesAspMedHep => {
                YesNo::Yes
            }
        }
    }

    pub fn heparin(self) -> HeparinDose {
        match self {
            Treatment::NoAspNoHep | Treatment::YesAspNoHep => HeparinDose::None,
            Treatment::NoAspLowHep | Treatment::YesAspLowHep => HeparinDose::Low,
            Treatment::NoAspMedHep | Treatment::YesAspMedHep => HeparinDose::Medium,
        }
    }
}

category! {
    /// Six-month outcome recoded from OCCODE.
    pub enum Outcome {
        Dead => "dead",
        Dependent => "dependent",
        NotRecovered => "not_recovered",
        Recovered => "recovered",
    }
}

impl Outcome {
    /// Map a numeric OCCODE. Codes outside 1..=4 have no outcome.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Outcome::Dead),
            2 => Some(Outcome::Dependent),
            3 => Some(Outcome::NotRecovered),
            4 => Some(Outcome::Recovered),
            _ => None,
        }
    }

    /// Parse a raw OCCODE cell. Accepts integral numerics such as `3` or `3.0`.
    pub fn from_raw(raw: &str) -> Option<Self> {
        let value: f64 = raw.trim().parse().ok()?;
        if value.fract() != 0.0 {
            return None;
        }
        Self::from_code(value as i64)
    }

    pub fn dead_or_dep(self) -> DeadOrDep {
        match self {
            Outcome::Dead | Outcome::Dependent => DeadOrDep::Yes,
            Outcome::NotRecovered | Outcome::Recovered => DeadOrDep::No,
        }
    }
}

category! {
    /// Poor outcome (dead or dependent) at six months. `no` is the reference.
    pub enum DeadOrDep {
        No => "no",
        Yes => "yes",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_trimmed_and_case_insensitive() {
        assert_eq!(YesNo::parse(" y "), Some(YesNo::Yes));
        assert_eq!(StrokeType::parse("taci"), Some(StrokeType::Taci));
        assert_eq!(Consciousness::parse("X"), None);
        assert_eq!(Sex::parse(""), None);
    }

    #[test]
    fn legacy_heparin_code_collapses_to_medium() {
        assert_eq!(collapse_heparin_code("H"), "M");
        assert_eq!(collapse_heparin_code("h"), "M");
        assert_eq!(collapse_heparin_code("L"), "L");
        assert_eq!(HeparinDose::parse(collapse_heparin_code("H")), Some(HeparinDose::Medium));
        assert_eq!(HeparinDose::parse("H"), None);
    }

    #[test]
    fn treatment_levels_follow_reporting_order() {
        assert_eq!(
            Treatment::codes(),
            vec![
                "no_asp_no_hep",
                "no_asp_low_hep",
                "no_asp_med_hep",
                "yes_asp_no_hep",
                "yes_asp_low_hep",
                "yes_asp_med_hep",
            ]
        );
        assert_eq!(Treatment::reference(), Treatment::NoAspNoHep);
    }

    #[test]
    fn treatment_cross_is_invertible() {
        for &treatment in Treatment::LEVELS {
            assert_eq!(
                Treatment::from_allocation(treatment.aspirin(), treatment.heparin()),
                treatment
            );
        }
    }

    #[test]
    fn outcome_codes() {
        assert_eq!(Outcome::from_raw("1"), Some(Outcome::Dead));
        assert_eq!(Outcome::from_raw("2.0"), Some(Outcome::Dependent));
        assert_eq!(Outcome::from_raw("4"), Some(Outcome::Recovered));
        assert_eq!(Outcome::from_raw("0"), None);
        assert_eq!(Outcome::from_raw("9"), None);
        assert_eq!(Outcome::from_raw("3.5"), None);
        assert_eq!(Outcome::from_raw("dead"), None);
    }

    #[test]
    fn dead_or_dep_collapse() {
        assert_eq!(Outcome::Dead.dead_or_dep(), DeadOrDep::Yes);
        assert_eq!(Outcome::Dependent.dead_or_dep(), DeadOrDep::Yes);
        assert_eq!(Outcome::NotRecovered.dead_or_dep(), DeadOrDep::No);
        assert_eq!(Outcome::Recovered.dead_or_dep(), DeadOrDep::No);
        assert_eq!(DeadOrDep::reference(), DeadOrDep::No);
    }
}
