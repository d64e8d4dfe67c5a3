//! The trial record normalizer.
//!
//! Turns a loaded source table into modeling-ready records:
//!
//! 1. project the source fields (schema check)
//! 2. collapse the legacy heparin code `H` into `M`
//! 3. derive `treatment` from aspirin x heparin dose
//! 4. recode `OCCODE` into an outcome
//! 5. collapse the outcome into `dead_or_dep`
//! 6. coerce every text field into its categorical domain
//! 7. drop pilot-phase rows and rows without an outcome
//!
//! [`explore`] runs steps 1-3 only and keeps every row.
//!
//! Each row is handled independently; output order is input order minus
//! dropped rows.

use tracing::{debug, info, info_span, warn};

use ist_model::{
    Category, Consciousness, DeadOrDep, DeficitStatus, ExploratoryRecord, HeparinDose,
    NormalizedPatientRecord, Outcome, RawPatientRecord, Sex, SourceField, SourceTable, StrokeType,
    Treatment, YesNo, collapse_heparin_code,
};

use crate::error::SchemaError;
use crate::options::{MissingTreatmentMode, NormalizeOptions};
use crate::projection::ColumnMap;
use crate::report::{DropReason, NormalizeReport, UnmappedValues};

/// Normalized records plus the accounting for the run.
#[derive(Debug, Clone)]
pub struct NormalizeOutcome {
    pub records: Vec<NormalizedPatientRecord>,
    pub report: NormalizeReport,
}

/// Normalize a whole source table.
///
/// # Errors
///
/// Returns [`SchemaError`] if any projected column is absent. No records are
/// produced in that case.
pub fn normalize(
    table: &SourceTable,
    options: &NormalizeOptions,
) -> Result<NormalizeOutcome, SchemaError> {
    let span = info_span!("normalize", rows = table.len());
    let _guard = span.enter();

    let columns = ColumnMap::resolve(table)?;
    debug!("resolved {} source columns", SourceField::COUNT);

    let mut unmapped = UnmappedValues::default();
    let mut report = NormalizeReport {
        input_rows: table.len(),
        ..NormalizeReport::default()
    };
    let mut records = Vec::with_capacity(table.len());

    for row in 0..table.len() {
        let raw = columns.project(table, row);
        match normalize_row(raw, options, &mut unmapped) {
            Ok(record) => {
                if record.treatment.is_none() {
                    report.kept_missing_treatment += 1;
                }
                records.push(record);
            }
            Err(reason) => report.record_drop(reason),
        }
    }

    report.output_rows = records.len();
    report.unmapped = unmapped.into_warnings();

    if options.warn_on_unmapped {
        for warning in &report.unmapped {
            warn!(
                field = %warning.field,
                value = %warning.value,
                count = warning.count,
                "unmapped value coerced to missing"
            );
        }
    }
    info!(
        input = report.input_rows,
        output = report.output_rows,
        pilot_phase = report.dropped_pilot_phase,
        missing_outcome = report.dropped_missing_outcome,
        missing_treatment = report.dropped_missing_treatment,
        "normalized trial records"
    );

    Ok(NormalizeOutcome { records, report })
}

/// Exploratory variant: projection, heparin collapse and treatment only.
///
/// No outcome recoding, type coercion, or filtering; every input row is kept.
pub fn explore(table: &SourceTable) -> Result<Vec<ExploratoryRecord>, SchemaError> {
    let span = info_span!("explore", rows = table.len());
    let _guard = span.enter();

    let columns = ColumnMap::resolve(table)?;
    let mut unmapped = UnmappedValues::default();
    let records: Vec<ExploratoryRecord> = (0..table.len())
        .map(|row| {
            let mut raw = columns.project(table, row);
            collapse_heparin(&mut raw);
            let treatment = derive_treatment(&raw, &mut unmapped);
            ExploratoryRecord { raw, treatment }
        })
        .collect();

    let warnings = unmapped.into_warnings();
    if !warnings.is_empty() {
        debug!(distinct = warnings.len(), "unmapped allocation codes in exploratory set");
    }
    Ok(records)
}

/// Normalize a single projected record.
///
/// Returns the reason when the record is filtered out.
pub fn normalize_record(
    raw: &RawPatientRecord,
    options: &NormalizeOptions,
) -> Result<NormalizedPatientRecord, DropReason> {
    let mut unmapped = UnmappedValues::default();
    normalize_row(raw.clone(), options, &mut unmapped)
}

fn normalize_row(
    mut raw: RawPatientRecord,
    options: &NormalizeOptions,
    unmapped: &mut UnmappedValues,
) -> Result<NormalizedPatientRecord, DropReason> {
    collapse_heparin(&mut raw);
    let treatment = derive_treatment(&raw, unmapped);
    let dead_or_dep = recode_outcome(&raw, unmapped).map(Outcome::dead_or_dep);

    let mut coerce = Coercer {
        raw: &raw,
        unmapped,
    };
    let ratrial = coerce.category::<YesNo>(SourceField::Ratrial);
    let record = PartialRecord {
        rdelay: coerce.number(SourceField::Rdelay),
        rconsc: coerce.category(SourceField::Rconsc),
        sex: coerce.category(SourceField::Sex),
        age: coerce.number(SourceField::Age),
        rsleep: coerce.category(SourceField::Rsleep),
        rct: coerce.category(SourceField::Rct),
        rvisinf: coerce.category(SourceField::Rvisinf),
        rhep24: coerce.category(SourceField::Rhep24),
        rasp3: coerce.category(SourceField::Rasp3),
        rsbp: coerce.number(SourceField::Rsbp),
        rdef: SourceField::DEFICITS.map(|field| coerce.category(field)),
        stype: coerce.category(SourceField::Stype),
    };

    let Some(ratrial) = ratrial else {
        return Err(DropReason::PilotPhase);
    };
    let Some(dead_or_dep) = dead_or_dep else {
        return Err(DropReason::MissingOutcome);
    };
    if treatment.is_none() && options.missing_treatment == MissingTreatmentMode::Drop {
        return Err(DropReason::MissingTreatment);
    }

    Ok(record.finish(ratrial, treatment, dead_or_dep))
}

/// Replace the legacy heparin code with the medium dose code.
pub fn collapse_heparin(raw: &mut RawPatientRecord) {
    let collapsed = raw
        .get(SourceField::Rxhep)
        .map(|code| collapse_heparin_code(code).to_string());
    raw.set(SourceField::Rxhep, collapsed);
}

fn derive_treatment(raw: &RawPatientRecord, unmapped: &mut UnmappedValues) -> Option<Treatment> {
    let mut coerce = Coercer { raw, unmapped };
    let aspirin = coerce.category::<YesNo>(SourceField::Rxasp);
    let heparin = coerce.category::<HeparinDose>(SourceField::Rxhep);
    Some(Treatment::from_allocation(aspirin?, heparin?))
}

fn recode_outcome(raw: &RawPatientRecord, unmapped: &mut UnmappedValues) -> Option<Outcome> {
    let code = raw.get(SourceField::Occode)?;
    let outcome = Outcome::from_raw(code);
    if outcome.is_none() {
        unmapped.record(SourceField::Occode, code);
    }
    outcome
}

struct Coercer<'a> {
    raw: &'a RawPatientRecord,
    unmapped: &'a mut UnmappedValues,
}

impl Coercer<'_> {
    fn category<C: Category>(&mut self, field: SourceField) -> Option<C> {
        let value = self.raw.get(field)?;
        let parsed = C::parse(value);
        if parsed.is_none() {
            self.unmapped.record(field, value);
        }
        parsed
    }

    fn number(&mut self, field: SourceField) -> Option<f64> {
        let value = self.raw.get(field)?;
        match value.trim().parse::<f64>() {
            Ok(number) if number.is_finite() => Some(number),
            _ => {
                self.unmapped.record(field, value);
                None
            }
        }
    }
}

/// Coerced covariates awaiting the filter decision.
struct PartialRecord {
    rdelay: Option<f64>,
    rconsc: Option<Consciousness>,
    sex: Option<Sex>,
    age: Option<f64>,
    rsleep: Option<YesNo>,
    rct: Option<YesNo>,
    rvisinf: Option<YesNo>,
    rhep24: Option<YesNo>,
    rasp3: Option<YesNo>,
    rsbp: Option<f64>,
    rdef: [Option<DeficitStatus>; 8],
    stype: Option<StrokeType>,
}

impl PartialRecord {
    fn finish(
        self,
        ratrial: YesNo,
        treatment: Option<Treatment>,
        dead_or_dep: DeadOrDep,
    ) -> NormalizedPatientRecord {
        let [rdef1, rdef2, rdef3, rdef4, rdef5, rdef6, rdef7, rdef8] = self.rdef;
        NormalizedPatientRecord {
            rdelay: self.rdelay,
            rconsc: self.rconsc,
            sex: self.sex,
            age: self.age,
            rsleep: self.rsleep,
            ratrial,
            rct: self.rct,
            rvisinf: self.rvisinf,
            rhep24: self.rhep24,
            rasp3: self.rasp3,
            rsbp: self.rsbp,
            rdef1,
            rdef2,
            rdef3,
            rdef4,
            rdef5,
            rdef6,
            rdef7,
            rdef8,
            stype: self.stype,
            treatment,
            dead_or_dep,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(asp: &str, hep: &str, occode: Option<&str>, ratrial: Option<&str>) -> RawPatientRecord {
        let mut record = RawPatientRecord::new()
            .with(SourceField::Rxasp, asp)
            .with(SourceField::Rxhep, hep);
        record.set(SourceField::Occode, occode.map(str::to_string));
        record.set(SourceField::Ratrial, ratrial.map(str::to_string));
        record
    }

    #[test]
    fn legacy_heparin_maps_to_medium_dose_arm() {
        let record = normalize_record(
            &raw("N", "H", Some("3"), Some("Y")),
            &NormalizeOptions::default(),
        )
        .expect("kept");
        assert_eq!(record.treatment, Some(Treatment::NoAspMedHep));
        assert_eq!(record.dead_or_dep, DeadOrDep::No);
    }

    #[test]
    fn missing_ratrial_is_pilot_phase() {
        let result = normalize_record(&raw("Y", "L", Some("1"), None), &NormalizeOptions::default());
        assert_eq!(result, Err(DropReason::PilotPhase));
    }

    #[test]
    fn missing_occode_is_dropped() {
        let result = normalize_record(&raw("Y", "N", None, Some("N")), &NormalizeOptions::default());
        assert_eq!(result, Err(DropReason::MissingOutcome));
    }

    #[test]
    fn out_of_range_occode_is_dropped() {
        for code in ["0", "5", "9", "x"] {
            let result =
                normalize_record(&raw("Y", "N", Some(code), Some("N")), &NormalizeOptions::default());
            assert_eq!(result, Err(DropReason::MissingOutcome), "OCCODE {code}");
        }
    }

    #[test]
    fn unknown_allocation_follows_treatment_mode() {
        let input = raw("Y", "X", Some("2"), Some("Y"));

        let dropped = normalize_record(&input, &NormalizeOptions::default());
        assert_eq!(dropped, Err(DropReason::MissingTreatment));

        let keep = NormalizeOptions::new().with_missing_treatment(MissingTreatmentMode::Keep);
        let kept = normalize_record(&input, &keep).expect("kept");
        assert_eq!(kept.treatment, None);
        assert_eq!(kept.dead_or_dep, DeadOrDep::Yes);
    }

    #[test]
    fn covariates_are_coerced() {
        let input = raw("Y", "M", Some("4"), Some("N"))
            .with(SourceField::Age, "74")
            .with(SourceField::Rsbp, "not recorded")
            .with(SourceField::Sex, "f")
            .with(SourceField::Rdef3, "C")
            .with(SourceField::Stype, "LACI");

        let record = normalize_record(&input, &NormalizeOptions::default()).expect("kept");

        assert_eq!(record.age, Some(74.0));
        assert_eq!(record.rsbp, None);
        assert_eq!(record.sex, Some(Sex::Female));
        assert_eq!(record.rdef3, Some(DeficitStatus::CannotAssess));
        assert_eq!(record.stype, Some(StrokeType::Laci));
        assert_eq!(record.treatment, Some(Treatment::YesAspMedHep));
    }

    #[test]
    fn collapse_leaves_other_codes() {
        let mut record = raw("N", "L", None, None);
        collapse_heparin(&mut record);
        assert_eq!(record.get(SourceField::Rxhep), Some("L"));

        let mut record = raw("N", "H", None, None);
        collapse_heparin(&mut record);
        assert_eq!(record.get(SourceField::Rxhep), Some("M"));
    }
}
