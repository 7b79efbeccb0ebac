//! Notifier: optional one-line status message back to the dispatcher.

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::normalized::ExitCode;
use crate::record::LogRecord;

#[derive(Debug, Serialize)]
struct HookMessage<'a> {
    result: &'static str,
    message: &'a str,
}

#[derive(Debug, Clone, Copy)]
pub struct Notifier<'a> {
    log_path: &'a Path,
    notify_on_success: bool,
}

impl<'a> Notifier<'a> {
    pub fn new(log_path: &'a Path, notify_on_success: bool) -> Self {
        Self {
            log_path,
            notify_on_success,
        }
    }

    /// The message for `record`, or `None` when policy says stay silent.
    pub fn message(&self, record: &LogRecord) -> Option<String> {
        let tool = record.tool.display_name();
        let path = self.log_path.display();
        if record.success {
            return self
                .notify_on_success
                .then(|| format!("[LOG] {tool} call logged to {path}"));
        }
        let exit_code = match record.exit_code {
            ExitCode::Known(code) => code.to_string(),
            ExitCode::Unknown => "unknown".to_string(),
        };
        Some(format!(
            "[LOG] {tool} call failed (exit_code={exit_code}) - logged to {path}"
        ))
    }

    /// Writes the message, if any, as a `{"result":"continue",...}` line.
    /// Failures are logged and swallowed.
    pub fn notify<W: Write>(&self, record: &LogRecord, out: &mut W) {
        let Some(message) = self.message(record) else {
            return;
        };
        let payload = HookMessage {
            result: "continue",
            message: &message,
        };
        let written = serde_json::to_writer(&mut *out, &payload)
            .map_err(std::io::Error::from)
            .and_then(|()| out.write_all(b"\n"))
            .and_then(|()| out.flush());
        if let Err(err) = written {
            tracing::warn!(error = %err, "failed to emit hook notification");
        }
    }
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use super::*;
    use crate::CliTool;

    fn record(success: bool, exit_code: ExitCode) -> LogRecord {
        LogRecord {
            timestamp: OffsetDateTime::UNIX_EPOCH,
            tool: CliTool::Gemini,
            model: None,
            prompt: String::new(),
            stdout: String::new(),
            stderr: String::new(),
            response: String::new(),
            success,
            has_output: false,
            exit_code,
        }
    }

    fn emitted(notifier: Notifier<'_>, record: &LogRecord) -> String {
        let mut out = Vec::new();
        notifier.notify(record, &mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn silent_on_success_by_default() {
        let notifier = Notifier::new(Path::new(".claude/logs/cli-tools.jsonl"), false);
        assert_eq!(emitted(notifier, &record(true, ExitCode::Known(0))), "");
    }

    #[test]
    fn success_message_when_enabled() {
        let notifier = Notifier::new(Path::new(".claude/logs/cli-tools.jsonl"), true);
        let out = emitted(notifier, &record(true, ExitCode::Known(0)));
        let value: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
        assert_eq!(value["result"], "continue");
        assert_eq!(
            value["message"],
            "[LOG] Gemini call logged to .claude/logs/cli-tools.jsonl"
        );
    }

    #[test]
    fn failure_always_notifies() {
        let notifier = Notifier::new(Path::new("log.jsonl"), false);
        assert_eq!(
            notifier.message(&record(false, ExitCode::Known(2))).as_deref(),
            Some("[LOG] Gemini call failed (exit_code=2) - logged to log.jsonl")
        );
        assert_eq!(
            notifier.message(&record(false, ExitCode::Unknown)).as_deref(),
            Some("[LOG] Gemini call failed (exit_code=unknown) - logged to log.jsonl")
        );
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_is_swallowed() {
        let notifier = Notifier::new(Path::new("log.jsonl"), false);
        notifier.notify(&record(false, ExitCode::Known(1)), &mut BrokenPipe);
    }
}
