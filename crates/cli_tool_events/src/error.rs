use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading the hook payload from the invocation channel.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("hook input was empty")]
    Empty,
    #[error("failed to read hook input: {0}")]
    Io(#[source] std::io::Error),
    #[error("hook input exceeded {max_input_bytes} bytes")]
    TooLarge { max_input_bytes: usize },
    #[error("hook input is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),
    #[error("hook input must be a JSON object, got {found}")]
    NotAnObject { found: &'static str },
}

/// Failures while appending a record to the JSONL log.
#[derive(Debug, Error)]
pub enum LogWriteError {
    #[error("failed to create log directory `{path}`: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to open log file `{path}`: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize log record: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to append to log file `{path}`: {source}")]
    Append {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum HookError {
    #[error(transparent)]
    MalformedInput(#[from] InputError),
    #[error(transparent)]
    LogWrite(#[from] LogWriteError),
}

impl HookError {
    /// Process exit status reported to the dispatcher. Never `2`, which the
    /// dispatcher reads as blocking feedback for the observed tool call.
    pub fn exit_code(&self) -> u8 {
        match self {
            HookError::MalformedInput(_) | HookError::LogWrite(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_failure_maps_to_non_blocking_status() {
        let input: HookError = InputError::Empty.into();
        let write: HookError = LogWriteError::Append {
            path: PathBuf::from("/tmp/x.jsonl"),
            source: std::io::Error::other("disk full"),
        }
        .into();
        assert_eq!(input.exit_code(), 1);
        assert_eq!(write.exit_code(), 1);
    }

    #[test]
    fn write_error_message_names_path() {
        let err = LogWriteError::Open {
            path: PathBuf::from("/nope/cli-tools.jsonl"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().contains("/nope/cli-tools.jsonl"));
    }
}
