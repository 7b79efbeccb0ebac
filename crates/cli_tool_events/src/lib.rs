#![forbid(unsafe_code)]
//! Structured logging for Codex/Gemini CLI calls observed by a PostToolUse
//! hook.
//!
//! One dispatcher event goes in; at most one JSONL record comes out:
//! - the payload is read and its result shape normalized once,
//! - the command line is classified by segment so prompt text never
//!   triggers a match,
//! - credential-shaped text is masked before anything touches disk,
//! - the finished line is appended with a single write.

mod command_line;
mod config;
mod detect;
mod error;
mod extract;
mod log_writer;
mod normalized;
mod notify;
mod outcome;
mod pipeline;
mod reader;
mod record;
mod redact;

pub use command_line::{split_segments, split_words, ShellWord};
pub use config::{
    HookConfig, ReaderLimits, DEFAULT_MAX_FIELD_CHARS, LOG_RELATIVE_PATH, NOTIFY_ENV,
    PROJECT_DIR_ENV,
};
pub use detect::{detect_tool, CliTool, ToolInvocation};
pub use error::{HookError, InputError, LogWriteError};
pub use extract::{extract_fields, truncate_text, ExtractedFields};
pub use log_writer::JsonlLogWriter;
pub use normalized::{normalize, ExitCode, NormalizedPayload, ResultShape};
pub use notify::Notifier;
pub use outcome::{classify_outcome, Outcome};
pub use pipeline::{build_record, run_hook, PipelineOutcome, SkipReason, SHELL_TOOL_NAME};
pub use reader::{read_event, read_event_from_str, RawEvent};
pub use record::LogRecord;
pub use redact::{SecretMasker, REDACTION_TOKEN};
