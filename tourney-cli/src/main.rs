//! tourney-cli: command-line interface for the round-robin tournament
//! scheduling engine.
//!
//! # Commands
//!
//! - `schedule`: generate a full schedule from a request document
//! - `structure`: print the pure positional structure for N participants
//! - `validate`: run only the configuration-tier checks on a request document

mod document;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use document::ScheduleRequestDocument;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use tourney_core::counts::expected_event_count;
use tourney_core::validation::{check_static_infeasibility, validate_configuration, validate_participant_order};
use tourney_core::{RoundRobinScheduler, Scheduler, SchedulerError};

#[derive(Parser)]
#[command(name = "tourney-cli")]
#[command(author = "tourney")]
#[command(version = "0.1.0")]
#[command(about = "Round-robin tournament scheduling engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a full schedule from a request document
    Schedule {
        /// Input document path (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Read the request document from stdin instead of a file
        #[arg(long)]
        stdin: bool,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the pure positional structure for a participant count
    Structure {
        /// Number of participants
        #[arg(short, long)]
        participants: usize,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Validate a request document without generating a schedule
    Validate {
        /// Input document path (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Read the request document from stdin instead of a file
        #[arg(long)]
        stdin: bool,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Schedule {
            input,
            stdin,
            output,
            format,
            pretty,
        } => cmd_schedule(input, stdin, output, format, pretty),
        Commands::Structure { participants, pretty } => cmd_structure(participants, pretty),
        Commands::Validate { input, stdin } => cmd_validate(input, stdin),
    };

    match result {
        Ok(()) => ExitCode::from(0),
        Err(CliError::SchedulerFailure(report)) => {
            eprintln!("{report}");
            ExitCode::from(1)
        }
        Err(CliError::Other(err)) => {
            eprintln!("error: {err:?}");
            ExitCode::from(2)
        }
    }
}

/// Distinguishes a `SchedulerError` (exit code 1) from request
/// parsing/IO failure (exit code 2), per §12.
enum CliError {
    SchedulerFailure(String),
    Other(anyhow::Error),
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::Other(err)
    }
}

fn read_input(file: Option<PathBuf>, use_stdin: bool) -> Result<String> {
    if use_stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).context("failed to read from stdin")?;
        Ok(buffer)
    } else if let Some(path) = file {
        fs::read_to_string(&path).with_context(|| format!("failed to read file: {path:?}"))
    } else {
        anyhow::bail!("either provide an input file or use --stdin")
    }
}

fn parse_document(text: &str) -> Result<ScheduleRequestDocument> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('{') {
        serde_json::from_str(text).context("failed to parse request document as JSON")
    } else {
        serde_yaml::from_str(text).context("failed to parse request document as YAML")
    }
}

fn cmd_schedule(
    input: Option<PathBuf>,
    stdin: bool,
    output: Option<PathBuf>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    let text = read_input(input, stdin)?;
    let document = parse_document(&text)?;
    let request = document.into_schedule_request()?;

    let total_events = expected_event_count(request.participants().len(), request.legs_count());
    let bar = indicatif::ProgressBar::new(total_events as u64);
    bar.set_style(
        indicatif::ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} events committed")
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar()),
    );
    let bar_handle = bar.clone();
    let request = request.progress(move |progress| {
        bar_handle.set_position(progress.committed_count as u64);
        true
    });

    let scheduler = RoundRobinScheduler;
    let schedule = scheduler
        .generate_schedule(request)
        .map_err(|e: SchedulerError| CliError::SchedulerFailure(e.diagnostic_report()))?;
    bar.finish_and_clear();

    let rendered = match format {
        OutputFormat::Json if pretty => serde_json::to_string_pretty(&schedule).context("failed to serialize schedule")?,
        OutputFormat::Json => serde_json::to_string(&schedule).context("failed to serialize schedule")?,
        OutputFormat::Yaml => serde_yaml::to_string(&schedule).context("failed to serialize schedule")?,
    };

    if let Some(path) = output {
        fs::write(&path, &rendered).with_context(|| format!("failed to write output to {path:?}"))?;
        eprintln!("schedule written to {path:?}");
    } else {
        println!("{rendered}");
    }
    Ok(())
}

fn cmd_structure(participants: usize, pretty: bool) -> Result<(), CliError> {
    let scheduler = RoundRobinScheduler;
    let structure = scheduler
        .generate_structure(participants)
        .map_err(|e: SchedulerError| CliError::SchedulerFailure(e.diagnostic_report()))?;

    let rendered = if pretty {
        serde_json::to_string_pretty(&structure).context("failed to serialize structure")?
    } else {
        serde_json::to_string(&structure).context("failed to serialize structure")?
    };
    println!("{rendered}");
    Ok(())
}

fn cmd_validate(input: Option<PathBuf>, stdin: bool) -> Result<(), CliError> {
    let text = read_input(input, stdin)?;
    let document = parse_document(&text)?;
    let request = document.into_schedule_request()?;

    let outcome: Result<(), SchedulerError> = (|| {
        validate_configuration(request.participants(), request.legs_count())?;
        if let Some(order) = request.explicit_participant_order() {
            validate_participant_order(request.participants(), order)?;
        }
        check_static_infeasibility(request.participants().len(), request.legs_count(), request.constraint_set())?;
        Ok(())
    })();

    match outcome {
        Ok(()) => {
            println!("{{\"valid\": true}}");
            Ok(())
        }
        Err(e) => Err(CliError::SchedulerFailure(e.diagnostic_report())),
    }
}
