//! Output formatting for detection reports.
//!
//! This module renders a [`DiffReport`] for display: colored for a terminal,
//! plain for piping, or as JSON for tooling.
//!
//! # Examples
//!
//! ```
//! use editguard::{detect_extra_fields, format_report, EditableResource, GroupConfig};
//! use editguard::{OutputFormat, OutputOptions};
//!
//! let object = EditableResource::from(GroupConfig::new("a", 3));
//! let report = detect_extra_fields("name: a\nsise: 3\n", &object).unwrap();
//!
//! let output = format_report(&report, &OutputFormat::Plain, &OutputOptions::default()).unwrap();
//! assert!(output.contains("Discarded: sise"));
//! ```

use crate::diff::{Change, ChangeStats};
use crate::error::OutputError;
use crate::report::{DiffReport, LineTag};
use colored::*;
use serde_json::json;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Colored terminal output with ANSI escape codes
    Terminal,
    /// JSON representation of the report
    Json,
    /// Plain text, no colors (suitable for piping)
    Plain,
}

/// Options for controlling output formatting.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    /// Append the summary and discarded-key lines after the diff
    pub show_summary: bool,
    /// Maximum length for values shown in the JSON change list
    pub max_value_length: usize,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            show_summary: true,
            max_value_length: 80,
        }
    }
}

/// Formats a report according to the specified format and options.
///
/// # Errors
///
/// Returns `OutputError::JsonSerializationError` if the JSON document cannot
/// be written.
pub fn format_report(
    report: &DiffReport,
    format: &OutputFormat,
    options: &OutputOptions,
) -> Result<String, OutputError> {
    match format {
        OutputFormat::Terminal => Ok(format_terminal(report, options)),
        OutputFormat::Json => format_json(report, options),
        OutputFormat::Plain => Ok(format_plain(report, options)),
    }
}

/// Color scheme: removed lines red, added lines green, context and hunk
/// separators dimmed.
fn format_terminal(report: &DiffReport, options: &OutputOptions) -> String {
    if report.is_empty() {
        return "No discarded fields.".dimmed().to_string();
    }

    let mut output = String::new();
    for (i, hunk) in report.hunks.iter().enumerate() {
        if i > 0 {
            output.push_str(&"...".dimmed().to_string());
            output.push('\n');
        }
        for line in &hunk.lines {
            let text = format!("{}{}", line.tag.prefix(), line.text);
            let styled = match line.tag {
                LineTag::Context => text.dimmed(),
                LineTag::Removed => text.red(),
                LineTag::Added => text.green(),
            };
            output.push_str(&styled.to_string());
            output.push('\n');
        }
    }

    if options.show_summary {
        output.push('\n');
        output.push_str(&format_summary(&report.stats()));
        let discarded = report.discarded_keys();
        if !discarded.is_empty() {
            output.push('\n');
            output.push_str(&format!(
                "{} {}",
                "Discarded:".bright_yellow(),
                discarded.join(", ").yellow()
            ));
        }
    }

    output
}

fn format_plain(report: &DiffReport, options: &OutputOptions) -> String {
    if report.is_empty() {
        return "No discarded fields.".to_string();
    }

    let mut output = report.to_string();

    if options.show_summary {
        output.push('\n');
        output.push_str(&format_summary(&report.stats()));
        let discarded = report.discarded_keys();
        if !discarded.is_empty() {
            output.push('\n');
            output.push_str(&format!("Discarded: {}", discarded.join(", ")));
        }
    }

    output
}

/// The JSON structure includes the hunks, the path-level changes and counts.
fn format_json(report: &DiffReport, options: &OutputOptions) -> Result<String, OutputError> {
    let hunks: Vec<serde_json::Value> = report
        .hunks
        .iter()
        .map(|hunk| {
            let lines: Vec<String> = hunk
                .lines
                .iter()
                .map(|line| format!("{}{}", line.tag.prefix(), line.text))
                .collect();
            json!({
                "known_start": hunk.known_start,
                "edited_start": hunk.edited_start,
                "lines": lines,
            })
        })
        .collect();

    let changes: Vec<serde_json::Value> = report
        .changes
        .iter()
        .map(|c| change_to_json(c, options.max_value_length))
        .collect();

    let stats = report.stats();
    let output = json!({
        "discarded": report.discarded_keys(),
        "hunks": hunks,
        "changes": changes,
        "stats": {
            "discarded": stats.discarded,
            "missing": stats.missing,
            "modified": stats.modified,
        }
    });

    serde_json::to_string_pretty(&output)
        .map_err(|e| OutputError::JsonSerializationError { source: e })
}

fn change_to_json(change: &Change, max_value_length: usize) -> serde_json::Value {
    json!({
        "path": change.path_string(),
        "type": change.kind.as_str(),
        "known": change.known.as_ref().map(|n| n.preview(max_value_length)),
        "edited": change.edited.as_ref().map(|n| n.preview(max_value_length)),
    })
}

fn format_summary(stats: &ChangeStats) -> String {
    if stats.is_empty() {
        return "Summary: formatting differences only".to_string();
    }

    let mut parts = Vec::new();
    if stats.discarded > 0 {
        parts.push(format!("{} discarded", stats.discarded));
    }
    if stats.missing > 0 {
        parts.push(format!("{} missing", stats.missing));
    }
    if stats.modified > 0 {
        parts.push(format!("{} modified", stats.modified));
    }

    format!("Summary: {}", parts.join(", "))
}
