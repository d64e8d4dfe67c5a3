//! International Stroke Trial normalizer CLI.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use ist_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use ist_cli::commands::{run_describe, run_explore, run_normalize, run_split};
use ist_cli::logging::{LogConfig, LogFormat, init_logging};
use ist_cli::summary::{
    files_table, frequency_view, group_table, labels_table, report_table, unmapped_table,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli.command) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(command: &Command) -> Result<()> {
    match command {
        Command::Normalize(args) => {
            let result = run_normalize(args, io::stdout().lock())?;
            let mut text = report_table(&result.report).to_string();
            if let Some(table) = unmapped_table(&result.report.unmapped) {
                text.push_str(&format!(
                    "\nUnmapped values ({} cells coerced to missing):\n{table}",
                    result.report.unmapped_total()
                ));
            }
            let files: Vec<_> = result.output.iter().chain(result.labels.iter()).collect();
            if !files.is_empty() {
                text.push_str(&format!("\n{}", files_table(&files)));
            }
            // Records may be on stdout, so the summary goes to stderr in that case.
            if result.output.is_some() {
                println!("{text}");
            } else {
                eprintln!("{text}");
            }
        }
        Command::Explore(args) => {
            let result = run_explore(args, io::stdout().lock())?;
            eprintln!(
                "Sampled {} of {} rows (seed {})",
                result.records.len(),
                result.total_rows,
                args.seed
            );
        }
        Command::Describe(args) => {
            let result = run_describe(args)?;
            println!("{}", report_table(&result.report));
            println!();
            println!("{}", group_table(&result.groups));
            for (field, rows) in &result.frequencies {
                println!();
                println!("{}", frequency_view(*field, rows));
            }
        }
        Command::Split(args) => {
            let result = run_split(args)?;
            println!(
                "Train: {} rows, poor outcome {}",
                result.train_rows,
                rate_text(result.train_poor_outcome_rate)
            );
            println!(
                "Test: {} rows, poor outcome {}",
                result.test_rows,
                rate_text(result.test_poor_outcome_rate)
            );
            println!("{}", files_table(&[&result.train, &result.test]));
        }
        Command::Labels => println!("{}", labels_table()),
    }
    Ok(())
}

fn rate_text(rate: Option<f64>) -> String {
    rate.map_or_else(|| "-".to_string(), |rate| format!("{:.1}%", rate * 100.0))
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig::default()
        .with_level_filter(cli.verbosity.tracing_level_filter())
        .with_log_file(cli.log_file.clone())
        .with_log_data(cli.log_data)
        .with_format(match cli.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        });
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
