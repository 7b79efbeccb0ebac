//! Append-only JSONL writer shared by concurrent hook processes.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::LogWriteError;
use crate::record::LogRecord;

#[derive(Debug, Clone)]
pub struct JsonlLogWriter {
    path: PathBuf,
}

impl JsonlLogWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `record` as one line, creating parent directories and the
    /// file when missing.
    ///
    /// The whole line is serialized before the file is touched and then
    /// handed to a single `O_APPEND` write, so concurrent writers never
    /// interleave and an interrupted process leaves no partial record.
    pub fn append(&self, record: &LogRecord) -> Result<(), LogWriteError> {
        let line = record.to_jsonl().map_err(LogWriteError::Serialize)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| LogWriteError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| LogWriteError::Open {
                path: self.path.clone(),
                source,
            })?;

        file.write_all(&line)
            .and_then(|()| file.sync_data())
            .map_err(|source| LogWriteError::Append {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!(path = %self.path.display(), bytes = line.len(), "appended cli tool record");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use super::*;
    use crate::{CliTool, ExitCode};

    fn record(stdout: &str) -> LogRecord {
        LogRecord {
            timestamp: OffsetDateTime::UNIX_EPOCH,
            tool: CliTool::Codex,
            model: None,
            prompt: "q".to_string(),
            stdout: stdout.to_string(),
            stderr: String::new(),
            response: stdout.to_string(),
            success: true,
            has_output: !stdout.is_empty(),
            exit_code: ExitCode::Known(0),
        }
    }

    #[test]
    fn creates_missing_directories_and_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".claude/logs/cli-tools.jsonl");
        let writer = JsonlLogWriter::new(&path);
        assert_eq!(writer.path(), path.as_path());

        writer.append(&record("one")).unwrap();
        writer.append(&record("two")).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let stdouts: Vec<String> = text
            .lines()
            .map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).unwrap();
                value["stdout"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(stdouts, vec!["one", "two"]);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn existing_content_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cli-tools.jsonl");
        fs::write(&path, "{\"earlier\":true}\n").unwrap();

        JsonlLogWriter::new(&path).append(&record("new")).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\"earlier\":true}\n"));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn directory_in_place_of_file_is_a_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonlLogWriter::new(dir.path()).append(&record("x")).unwrap_err();
        assert!(matches!(err, LogWriteError::Open { .. }), "{err:?}");
    }

    #[test]
    fn file_in_place_of_parent_dir_is_a_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("logs");
        fs::write(&blocker, "not a dir").unwrap();
        let err = JsonlLogWriter::new(blocker.join("cli-tools.jsonl"))
            .append(&record("x"))
            .unwrap_err();
        assert!(matches!(err, LogWriteError::CreateDir { .. }), "{err:?}");
    }
}
