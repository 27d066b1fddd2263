//! Output formatting and writing utilities
//!
//! This module renders validation reports, error lists and the type listing
//! as JSON, YAML or human-readable text.
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::logging::redaction;
use colored::Colorize;
use glyco_data::Policy;
use glyco_structure::Error as RecordError;
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};
use tracing::{debug, trace};

/// Outcome of validating one input
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// File path, or `-` for stdin
    pub source: String,
    /// Number of elements in the input
    pub submitted: usize,
    /// Records that passed every check
    pub accepted: usize,
    /// Records emitted during normalization
    pub derived: usize,
    /// Whether the whole input was discarded
    pub rejected: bool,
    pub errors: Vec<RecordError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<Value>>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// One row of `glyco types`
#[derive(Debug, Clone, Serialize)]
pub struct TypeSummary {
    pub name: String,
    pub policy: Policy,
}

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a validation report
    fn format_report(&self, report: &ValidationReport) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty | OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        }
    }

    fn format_report(&self, report: &ValidationReport) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_report_human(report)),
            _ => self.format(report),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    verbose: u8,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer on stdout
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            format,
            use_color,
            show_progress: !quiet && format == OutputFormat::Human && io::stderr().is_terminal(),
            quiet,
            verbose,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        verbose: u8,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            show_progress: false,
            quiet,
            verbose,
            writer,
        }
    }

    /// Turn progress bars off when configuration disables them
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = self.show_progress && enabled;
        self
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        if self.verbose > 2 {
            let mut value_json = serde_json::to_value(value)?;
            redaction::redact_json_value(&mut value_json);
            trace!(data = %value_json, "Outputting data");
        }

        let formatted = self.format.format(value)?;
        self.writeln(formatted.trim_end())
    }

    /// Write a validation report
    ///
    /// Machine formats write the report as one document. Human output colors
    /// the summary line by outcome.
    pub fn report(&mut self, report: &ValidationReport) -> Result<()> {
        if self.format != OutputFormat::Human {
            return self.data(report);
        }

        for line in format_report_human(report).lines() {
            if !self.use_color {
                self.writeln(line)?;
            } else if line.starts_with('✓') {
                self.writeln(&line.green().to_string())?;
            } else if line.starts_with('✗') {
                self.writeln(&line.red().bold().to_string())?;
            } else if line.starts_with("===") {
                self.writeln(&line.bright_blue().to_string())?;
            } else {
                self.writeln(line)?;
            }
        }
        Ok(())
    }

    /// Create a progress bar for multi-input runs
    pub fn progress_bar(&self, length: u64, message: &str) -> Option<ProgressBar> {
        if !self.show_progress || length < 2 {
            return None;
        }

        let pb = ProgressBar::new(length);
        pb.set_style(default_progress_style());
        pb.set_message(message.to_string());
        Some(pb)
    }

    /// Write a table (for human format)
    pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }

        let header_row = headers
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
            .collect::<Vec<_>>()
            .join(" │ ");

        if self.use_color {
            self.writeln(header_row.trim_end().bold().to_string().as_str())?;
        } else {
            self.writeln(header_row.trim_end())?;
        }

        let separator = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        self.writeln(&separator)?;

        for row in rows {
            let row_str = row
                .iter()
                .enumerate()
                .map(|(i, cell)| match widths.get(i) {
                    Some(width) => format!("{:width$}", cell, width = width),
                    None => cell.clone(),
                })
                .collect::<Vec<_>>()
                .join(" │ ");
            self.writeln(row_str.trim_end())?;
        }

        Ok(())
    }
}

/// Progress bar style for multi-input runs
pub fn default_progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
}

/// Render a report as plain text
fn format_report_human(report: &ValidationReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("=== {} ===\n", report.source));

    if report.is_clean() {
        output.push_str(&format!(
            "✓ {} of {} record(s) accepted",
            report.accepted, report.submitted
        ));
    } else if report.rejected {
        output.push_str(&format!(
            "✗ input rejected: {} error(s) across {} record(s)",
            report.errors.len(),
            report.submitted
        ));
    } else {
        output.push_str(&format!(
            "✗ {} of {} record(s) accepted, {} error(s)",
            report.accepted,
            report.submitted,
            report.errors.len()
        ));
    }
    if report.derived > 0 {
        output.push_str(&format!(", {} derived", report.derived));
    }
    output.push('\n');

    let width = report
        .errors
        .iter()
        .map(|error| error.pointer().chars().count())
        .max()
        .unwrap_or(0)
        .max(1);
    for error in &report.errors {
        output.push_str(&format_error_line(error, width));
        output.push('\n');
    }

    if let Some(records) = &report.records {
        for record in records {
            output.push_str(&serde_json::to_string_pretty(record).unwrap_or_default());
            output.push('\n');
        }
    }

    output
}

/// `  <pointer>  <code>  <detail>`, with the root shown as `/`
fn format_error_line(error: &RecordError, width: usize) -> String {
    let pointer = error.pointer();
    let pointer = if pointer.is_empty() { "/".to_string() } else { pointer };
    format!(
        "  {:width$}  {}  {}",
        pointer,
        error.code,
        error.detail,
        width = width
    )
}
