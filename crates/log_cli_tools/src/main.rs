use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use cli_tool_events::{run_hook, HookConfig, PipelineOutcome, DEFAULT_MAX_FIELD_CHARS};
use tracing_subscriber::EnvFilter;

const LOG_FILTER_ENV: &str = "LOG_CLI_TOOLS_LOG";

/// PostToolUse hook: reads one tool event on stdin and appends a record to
/// the CLI tools log when the command ran `codex` or `gemini`.
#[derive(Debug, Parser)]
#[command(name = "log-cli-tools", version)]
struct Args {
    /// Append to this file instead of `<project>/.claude/logs/cli-tools.jsonl`.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Also notify on successful calls (same as CLAUDE_ORCHESTRA_LOG_NOTIFY=1).
    #[arg(long)]
    notify: bool,

    /// Maximum characters kept per logged text field.
    #[arg(long, default_value_t = DEFAULT_MAX_FIELD_CHARS)]
    max_field_chars: usize,
}

impl Args {
    fn into_config(self, base: HookConfig) -> HookConfig {
        let notify = self.notify || base.notify_on_success;
        let config = match self.log_file {
            Some(path) => base.with_log_path(path),
            None => base,
        };
        config
            .with_notify_on_success(notify)
            .with_max_field_chars(self.max_field_chars)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    // clap's own error exit uses status 2, which the dispatcher would treat
    // as blocking feedback.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_tracing();

    let config = args.into_config(HookConfig::from_env());
    let mut stdout = io::stdout().lock();
    match run_hook(&config, io::stdin().lock(), &mut stdout) {
        Ok(PipelineOutcome::Logged(record)) => {
            tracing::debug!(tool = ?record.tool, success = record.success, "logged cli tool call");
            ExitCode::SUCCESS
        }
        Ok(PipelineOutcome::Skipped(_)) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::warn!(error = %err, "cli tool call was not logged");
            ExitCode::from(err.exit_code())
        }
    }
}
