//! Validation command handler and related utilities

use crate::cli::{InputFormat, OutputFormat, ValidateArgs};
use crate::config::{Config, IngestionConfig};
use crate::error::{Error, Result};
use crate::logging::{redaction, timing::Timer};
use crate::output::{OutputWriter, ValidationReport};
use glyco_data::{BatchOutcome, Context, Processor};
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::{debug, info, instrument, warn};

/// Handle the validate command
#[instrument(skip_all, fields(inputs = args.inputs.len(), atomic = args.atomic))]
pub async fn handle_validate(
    args: ValidateArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let timer = Timer::with_details(
        "validate_command",
        &format!("{} input(s)", args.inputs.len()),
    );

    if args.inputs.iter().filter(|input| is_stdin(input)).count() > 1 {
        return Err(Error::invalid_args("stdin ('-') may be given only once"));
    }

    let ingestion = effective_ingestion(&args, &config.ingestion);
    if let Ok(mut logged) = serde_json::to_value(&ingestion) {
        redaction::redact_json_value(&mut logged);
        debug!(ingestion = %logged, "Resolved ingestion settings");
    }

    let processor = Processor::standard(context_for(&ingestion));
    if args.inputs.len() > 1 {
        output.info(&format!("Validating {} inputs", args.inputs.len()))?;
    }
    let progress = output.progress_bar(args.inputs.len() as u64, "validating");

    let mut reports = Vec::with_capacity(args.inputs.len());
    for input in &args.inputs {
        let source = display_name(input);
        if let Some(pb) = &progress {
            pb.set_message(source.clone());
        }

        let value = read_input(input, args.input_format).await?;
        let outcome = processor.process_value(&value);
        let report = build_report(source, &value, outcome, ingestion.atomic, args.records);

        info!(
            source = %report.source,
            accepted = report.accepted,
            errors = report.errors.len(),
            "Validated input"
        );
        reports.push(report);

        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    match (output.format(), reports.as_slice()) {
        (OutputFormat::Human, _) | (_, [_]) => {
            for report in &reports {
                output.report(report)?;
            }
        }
        _ => output.data(&reports)?,
    }

    let errors: usize = reports.iter().map(|report| report.errors.len()).sum();
    let accepted: usize = reports.iter().map(|report| report.accepted).sum();
    debug!(
        errors,
        accepted,
        elapsed_ms = timer.elapsed().as_millis() as u64,
        "Validation finished"
    );
    if errors > 0 {
        warn!(errors, accepted, "Validation reported errors");
        return Err(Error::Rejected { errors, accepted });
    }

    Ok(())
}

/// Command-line values over configured defaults
fn effective_ingestion(args: &ValidateArgs, configured: &IngestionConfig) -> IngestionConfig {
    IngestionConfig {
        origin: args.origin.map(Into::into).unwrap_or(configured.origin),
        user_id: args.user_id.clone().or_else(|| configured.user_id.clone()),
        upload_id: args.upload_id.clone().or_else(|| configured.upload_id.clone()),
        group_id: args.group_id.clone().or_else(|| configured.group_id.clone()),
        atomic: args.atomic || configured.atomic,
    }
}

fn context_for(ingestion: &IngestionConfig) -> Context {
    Context {
        user_id: ingestion.user_id.clone(),
        upload_id: ingestion.upload_id.clone(),
        group_id: ingestion.group_id.clone(),
        origin: ingestion.origin,
    }
}

fn is_stdin(path: &Path) -> bool {
    path == Path::new("-")
}

fn display_name(path: &Path) -> String {
    path.display().to_string()
}

/// Read and decode one input
async fn read_input(path: &Path, format: InputFormat) -> Result<Value> {
    let content = if is_stdin(path) {
        debug!("Reading records from stdin");
        let mut content = String::new();
        tokio::io::stdin().read_to_string(&mut content).await?;
        content
    } else {
        debug!(path = %path.display(), "Reading records file");
        tokio::fs::read_to_string(path).await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => Error::Io(e),
        })?
    };
    debug!("Read {} bytes", content.len());

    decode(path, &content, format)
}

fn decode(path: &Path, content: &str, format: InputFormat) -> Result<Value> {
    let invalid = |expected: &str, message: String| Error::InvalidFormat {
        path: PathBuf::from(path),
        expected: expected.to_string(),
        message,
    };

    match resolve_format(path, format) {
        InputFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|e| invalid("YAML", e.to_string()))
        }
        _ => serde_json::from_str(content).map_err(|e| invalid("JSON", e.to_string())),
    }
}

/// `Auto` picks YAML for `.yaml`/`.yml` paths and JSON otherwise
fn resolve_format(path: &Path, format: InputFormat) -> InputFormat {
    match format {
        InputFormat::Auto => match path.extension().and_then(|s| s.to_str()) {
            Some("yaml" | "yml") => InputFormat::Yaml,
            _ => InputFormat::Json,
        },
        explicit => explicit,
    }
}

/// Summarize one input's outcome
///
/// With `atomic`, any error discards every record the input produced.
fn build_report(
    source: String,
    value: &Value,
    outcome: BatchOutcome,
    atomic: bool,
    include_records: bool,
) -> ValidationReport {
    let submitted = match value {
        Value::Array(elements) => elements.len(),
        _ => 1,
    };
    let rejected = atomic && outcome.has_errors();

    let (accepted, derived, records) = if rejected {
        (0, 0, None)
    } else {
        let records = include_records.then(|| outcome.to_values());
        (outcome.records.len(), outcome.derived.len(), records)
    };

    ValidationReport {
        source,
        submitted,
        accepted,
        derived,
        rejected,
        errors: outcome.errors.map(|errors| errors.into_iter().collect()).unwrap_or_default(),
        records,
    }
}
