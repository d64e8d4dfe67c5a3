//! Command implementations. Each returns its result so `main` decides what to print.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span, trace};

use ist_ingest::read_source_table;
use ist_model::{
    ExploratoryRecord, MISSING_CODE, NormalizedPatientRecord, OutputField, SourceField,
    SourceTable,
};
use ist_report::{
    FrequencyRow, GroupSummary, OutputFormat, RecordCache, WrittenFile, frequency_table,
    render_records, summarize_by_treatment, write_exploratory_csv, write_labels_file,
    write_records_file,
};
use ist_transform::{
    NormalizeOptions, NormalizeOutcome, NormalizeReport, explore, normalize, poor_outcome_rate,
    sample, split_train_test,
};

use crate::cli::{DescribeArgs, ExploreArgs, NormalizeArgs, SplitArgs};
use crate::logging::redact_value;

/// Result of `ist normalize`.
#[derive(Debug)]
pub struct NormalizeRun {
    pub report: NormalizeReport,
    /// Output file, or `None` when records went to stdout.
    pub output: Option<WrittenFile>,
    pub labels: Option<WrittenFile>,
}

/// Result of `ist explore`.
#[derive(Debug)]
pub struct ExploreRun {
    pub total_rows: usize,
    pub records: Vec<ExploratoryRecord>,
}

/// Result of `ist describe`.
#[derive(Debug)]
pub struct DescribeRun {
    pub report: NormalizeReport,
    pub groups: Vec<GroupSummary>,
    pub frequencies: Vec<(OutputField, Vec<FrequencyRow>)>,
}

/// Result of `ist split`.
#[derive(Debug)]
pub struct SplitRun {
    pub report: NormalizeReport,
    pub train: WrittenFile,
    pub test: WrittenFile,
    pub train_rows: usize,
    pub test_rows: usize,
    pub train_poor_outcome_rate: Option<f64>,
    pub test_poor_outcome_rate: Option<f64>,
}

fn load_table(path: &Path) -> Result<SourceTable> {
    read_source_table(path).with_context(|| format!("read trial file {}", path.display()))
}

fn load_and_normalize(path: &Path, options: &NormalizeOptions) -> Result<NormalizeOutcome> {
    let table = load_table(path)?;
    let outcome = normalize(&table, options)
        .with_context(|| format!("normalize {}", path.display()))?;
    Ok(outcome)
}

/// Normalize the input and write records to a file or `stdout`.
pub fn run_normalize<W: Write>(args: &NormalizeArgs, mut stdout: W) -> Result<NormalizeRun> {
    let span = info_span!("normalize_command", input = %args.input.display());
    let _guard = span.enter();

    let outcome = load_and_normalize(&args.input, &args.flags.options())?;
    let report = outcome.report.clone();
    let cache = RecordCache::new(outcome.records, outcome.report);
    let format = args.format.into();

    let output = match &args.output {
        Some(path) => Some(
            write_records_file(path, &cache, format)
                .with_context(|| format!("write records to {}", path.display()))?,
        ),
        None => {
            let bytes = render_records(&cache, format).context("render records")?;
            stdout.write_all(&bytes).context("write records to stdout")?;
            stdout.flush().context("flush stdout")?;
            None
        }
    };

    let labels = args
        .labels
        .as_deref()
        .map(|path| {
            write_labels_file(path).with_context(|| format!("write labels to {}", path.display()))
        })
        .transpose()?;

    Ok(NormalizeRun {
        report,
        output,
        labels,
    })
}

/// Project the input with only the heparin collapse and treatment derivation,
/// then write a seeded sample of rows as CSV.
pub fn run_explore<W: Write>(args: &ExploreArgs, stdout: W) -> Result<ExploreRun> {
    let table = load_table(&args.input)?;
    let rows = explore(&table).with_context(|| format!("explore {}", args.input.display()))?;
    let total_rows = rows.len();
    let records = match args.sample {
        Some(n) => sample(&rows, n, args.seed),
        None => rows,
    };
    debug!(total = total_rows, sampled = records.len(), seed = args.seed, "sampled rows");
    for (index, record) in records.iter().enumerate() {
        trace!(
            index,
            age = redact_value(record.raw.get(SourceField::Age).unwrap_or(MISSING_CODE)),
            treatment = ?record.treatment,
            "sampled row"
        );
    }

    write_exploratory_csv(stdout, &records).context("write sample to stdout")?;
    Ok(ExploreRun {
        total_rows,
        records,
    })
}

/// Normalize the input and compute descriptive tables.
pub fn run_describe(args: &DescribeArgs) -> Result<DescribeRun> {
    let fields = parse_fields(&args.by)?;
    let outcome = load_and_normalize(&args.input, &args.flags.options())?;

    let groups = summarize_by_treatment(&outcome.records);
    let mut frequencies = Vec::with_capacity(fields.len());
    for field in fields {
        let rows = frequency_table(&outcome.records, field)
            .with_context(|| format!("tabulate {field}"))?;
        frequencies.push((field, rows));
    }

    Ok(DescribeRun {
        report: outcome.report,
        groups,
        frequencies,
    })
}

fn parse_fields(names: &[String]) -> Result<Vec<OutputField>> {
    names
        .iter()
        .map(|name| {
            name.parse::<OutputField>()
                .with_context(|| format!("--by {name}"))
        })
        .collect()
}

/// Normalize the input and write a stratified train/test partition.
pub fn run_split(args: &SplitArgs) -> Result<SplitRun> {
    let outcome = load_and_normalize(&args.input, &NormalizeOptions::default())?;
    let split = split_train_test(&outcome.records, args.fraction, args.seed)
        .context("partition records")?;
    info!(
        train = split.train.len(),
        test = split.test.len(),
        seed = args.seed,
        "split records"
    );

    let train_rows = split.train.len();
    let test_rows = split.test.len();
    let train_poor_outcome_rate = poor_outcome_rate(&split.train);
    let test_poor_outcome_rate = poor_outcome_rate(&split.test);

    let format = args.format.into();
    let train = write_partition(&args.train, split.train, &outcome.report, format)?;
    let test = write_partition(&args.test, split.test, &outcome.report, format)?;

    Ok(SplitRun {
        report: outcome.report,
        train,
        test,
        train_rows,
        test_rows,
        train_poor_outcome_rate,
        test_poor_outcome_rate,
    })
}

fn write_partition(
    path: &Path,
    records: Vec<NormalizedPatientRecord>,
    report: &NormalizeReport,
    format: OutputFormat,
) -> Result<WrittenFile> {
    let cache = RecordCache::new(records, report.clone());
    write_records_file(path, &cache, format)
        .with_context(|| format!("write partition to {}", path.display()))
}
