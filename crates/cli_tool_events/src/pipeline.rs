//! Wires the stages together: read, normalize, detect, extract, mask,
//! classify, append, notify.

use std::io::{Read, Write};

use time::OffsetDateTime;

use crate::config::HookConfig;
use crate::detect::detect_tool;
use crate::error::HookError;
use crate::extract::extract_fields;
use crate::log_writer::JsonlLogWriter;
use crate::normalized::{normalize, ResultShape};
use crate::notify::Notifier;
use crate::outcome::classify_outcome;
use crate::reader::{read_event, RawEvent};
use crate::record::LogRecord;
use crate::redact::SecretMasker;

/// The only dispatcher tool whose calls can run an external CLI.
pub const SHELL_TOOL_NAME: &str = "Bash";

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SkipReason {
    /// The event came from a tool other than the shell.
    NotShellTool,
    /// The command line invokes neither known CLI.
    NoKnownCli,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    Skipped(SkipReason),
    Logged(LogRecord),
}

/// Builds the record for `event` without touching the filesystem.
pub fn build_record(
    config: &HookConfig,
    event: &RawEvent,
    timestamp: OffsetDateTime,
) -> Result<LogRecord, SkipReason> {
    if event.tool_name() != Some(SHELL_TOOL_NAME) {
        return Err(SkipReason::NotShellTool);
    }

    let (shape, payload) = normalize(event);
    if shape == ResultShape::Missing {
        tracing::debug!("event carries no recognised result shape; streams left empty");
    }

    let invocation = detect_tool(event.command()).ok_or(SkipReason::NoKnownCli)?;
    let fields = extract_fields(&invocation, payload);
    let fields = SecretMasker::builtin()
        .mask_fields(fields)
        .truncated(config.max_field_chars);
    let outcome = classify_outcome(&fields.stdout, &fields.stderr, fields.exit_code);
    Ok(LogRecord::new(timestamp, fields, outcome))
}

/// Runs one hook invocation end to end.
///
/// Nothing is written to the log unless a full record was built, and the
/// notification goes out only after the append succeeded.
pub fn run_hook<R: Read, W: Write>(
    config: &HookConfig,
    input: R,
    notify_out: &mut W,
) -> Result<PipelineOutcome, HookError> {
    let event = read_event(input, config.limits)?;

    let record = match build_record(config, &event, OffsetDateTime::now_utc()) {
        Ok(record) => record,
        Err(reason) => {
            tracing::debug!(?reason, "skipping event");
            return Ok(PipelineOutcome::Skipped(reason));
        }
    };

    let writer = JsonlLogWriter::new(&config.log_path);
    writer.append(&record)?;
    Notifier::new(writer.path(), config.notify_on_success).notify(&record, notify_out);
    Ok(PipelineOutcome::Logged(record))
}
