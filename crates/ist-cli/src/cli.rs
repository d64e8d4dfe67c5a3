//! CLI argument definitions for the IST normalizer.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use ist_report::OutputFormat;
use ist_transform::{DEFAULT_SEED, MissingTreatmentMode, NormalizeOptions};

#[derive(Parser)]
#[command(
    name = "ist",
    version,
    about = "International Stroke Trial normalizer - turn the raw trial file into modeling-ready records",
    long_about = "Normalize the International Stroke Trial data file.\n\n\
                  Derives the aspirin x heparin treatment arm and the dead-or-dependent\n\
                  outcome, coerces categorical fields, and drops pilot-phase rows."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow patient-level cell values in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Normalize the trial file into modeling-ready records.
    Normalize(NormalizeArgs),

    /// Print a sample of projected rows with the derived treatment, keeping every row.
    Explore(ExploreArgs),

    /// Print per-treatment summaries and optional frequency tables.
    Describe(DescribeArgs),

    /// Write a stratified train/test partition of the normalized records.
    Split(SplitArgs),

    /// List the emitted variables and their labels.
    Labels,
}

/// Flags shared by every command that runs the normalizer.
#[derive(Args)]
pub struct NormalizeFlags {
    /// Keep rows whose aspirin or heparin allocation is missing (treatment written as NA).
    #[arg(long = "keep-missing-treatment")]
    pub keep_missing_treatment: bool,

    /// Do not log a warning per unmapped value (counts are still reported).
    #[arg(long = "quiet-unmapped")]
    pub quiet_unmapped: bool,
}

impl NormalizeFlags {
    pub fn options(&self) -> NormalizeOptions {
        let mode = if self.keep_missing_treatment {
            MissingTreatmentMode::Keep
        } else {
            MissingTreatmentMode::Drop
        };
        NormalizeOptions::new()
            .with_missing_treatment(mode)
            .with_warn_on_unmapped(!self.quiet_unmapped)
    }
}

#[derive(Parser)]
pub struct NormalizeArgs {
    /// Path to the trial CSV file.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Output file (default: write records to stdout).
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Record serialization format.
    #[arg(long = "format", value_enum, default_value = "csv")]
    pub format: FormatArg,

    /// Also write the variable-label table (CSV, or JSON for a .json path).
    #[arg(long = "labels", value_name = "PATH")]
    pub labels: Option<PathBuf>,

    #[command(flatten)]
    pub flags: NormalizeFlags,
}

#[derive(Parser)]
pub struct ExploreArgs {
    /// Path to the trial CSV file.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Number of rows to sample (default: all rows).
    #[arg(long = "sample", value_name = "N")]
    pub sample: Option<usize>,

    /// Seed for the row sample.
    #[arg(long = "seed", default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

#[derive(Parser)]
pub struct DescribeArgs {
    /// Path to the trial CSV file.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Categorical output field to tabulate (repeatable).
    #[arg(long = "by", value_name = "FIELD")]
    pub by: Vec<String>,

    #[command(flatten)]
    pub flags: NormalizeFlags,
}

#[derive(Parser)]
pub struct SplitArgs {
    /// Path to the trial CSV file.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Training partition output path.
    #[arg(long = "train", value_name = "PATH")]
    pub train: PathBuf,

    /// Held-out partition output path.
    #[arg(long = "test", value_name = "PATH")]
    pub test: PathBuf,

    /// Share of each outcome stratum assigned to training.
    #[arg(long = "fraction", default_value_t = 0.75)]
    pub fraction: f64,

    /// Seed for the partition.
    #[arg(long = "seed", default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Record serialization format for both partitions.
    #[arg(long = "format", value_enum, default_value = "csv")]
    pub format: FormatArg,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
