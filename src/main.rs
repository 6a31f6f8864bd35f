//! editguard command-line interface.
//!
//! Loads a stored resource and an edited copy of it, then reports any field in
//! the edit that the resource's schema would discard.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use editguard::{
    decode_strict, format_report, CanonicalPolicy, DetectConfig, Detector, Format, OutputFormat,
    OutputOptions, ReportOptions, ResourceKind,
};
use std::fs;
use std::path::PathBuf;
use std::process;

/// editguard - find fields an edit would silently discard
///
/// Compares an edited resource document against the typed resource it is
/// meant to describe, ignoring key order, indentation and quoting.
#[derive(Parser)]
#[command(name = "editguard")]
#[command(version)]
#[command(about = "Detect fields an edited resource would silently discard", long_about = None)]
struct Cli {
    /// Kind of resource being edited
    #[arg(value_enum, value_name = "KIND")]
    kind: KindArg,

    /// Stored resource the edit started from
    #[arg(value_name = "OBJECT")]
    object: PathBuf,

    /// Edited document to check
    #[arg(value_name = "EDITED")]
    edited: PathBuf,

    /// Document syntax of both files
    #[arg(long, value_enum, default_value = "yaml")]
    format: FormatArg,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "terminal")]
    output: OutputFormatArg,

    /// Unchanged lines shown around each change
    #[arg(long, default_value = "2")]
    context: usize,

    /// Maximum length for values in JSON output
    #[arg(long, default_value = "80")]
    max_value_length: usize,

    /// Verbose output (debug logging to stderr)
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (only show the diff, suppress summary)
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum KindArg {
    Cluster,
    Group,
}

impl From<KindArg> for ResourceKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Cluster => ResourceKind::Cluster,
            KindArg::Group => ResourceKind::Group,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum FormatArg {
    Yaml,
    Json,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Yaml => Format::Yaml,
            FormatArg::Json => Format::Json,
        }
    }
}

/// Output format argument for clap
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormatArg {
    /// Colored terminal output
    Terminal,
    /// JSON representation
    Json,
    /// Plain text (no colors)
    Plain,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Terminal => OutputFormat::Terminal,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Plain => OutputFormat::Plain,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(exit_code) => process::exit(exit_code),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            process::exit(2);
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<i32> {
    let format: Format = cli.format.into();
    let kind: ResourceKind = cli.kind.into();

    log::debug!("loading {} from {}", kind, cli.object.display());
    let object_text = fs::read_to_string(&cli.object)
        .with_context(|| format!("Failed to read {}", cli.object.display()))?;
    let object = decode_strict(&object_text, kind, format)
        .with_context(|| format!("Failed to load {} from {}", kind, cli.object.display()))?;

    log::debug!("reading edit from {}", cli.edited.display());
    let edited = fs::read_to_string(&cli.edited)
        .with_context(|| format!("Failed to read {}", cli.edited.display()))?;

    let detector = Detector::new(DetectConfig {
        policy: CanonicalPolicy::new(format),
        report: ReportOptions {
            context_lines: cli.context,
        },
    });
    let report = detector
        .detect(&edited, &object)
        .with_context(|| format!("Failed to check {}", cli.edited.display()))?;

    let output_options = OutputOptions {
        show_summary: !cli.quiet,
        max_value_length: cli.max_value_length,
    };
    let output_format: OutputFormat = cli.output.into();
    let output = format_report(&report, &output_format, &output_options)
        .context("Failed to format report")?;
    println!("{}", output);

    if report.is_empty() {
        Ok(0)
    } else {
        Ok(1)
    }
}
