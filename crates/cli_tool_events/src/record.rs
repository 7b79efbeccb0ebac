use serde::{Serialize, Serializer};
use time::macros::format_description;
use time::OffsetDateTime;

use crate::detect::CliTool;
use crate::extract::ExtractedFields;
use crate::normalized::ExitCode;
use crate::outcome::Outcome;

/// One line of `cli-tools.jsonl`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: OffsetDateTime,
    pub tool: CliTool,
    pub model: Option<String>,
    pub prompt: String,
    pub stdout: String,
    pub stderr: String,
    pub response: String,
    pub success: bool,
    pub has_output: bool,
    pub exit_code: ExitCode,
}

impl LogRecord {
    pub fn new(timestamp: OffsetDateTime, fields: ExtractedFields, outcome: Outcome) -> Self {
        Self {
            timestamp,
            tool: fields.tool,
            model: fields.model,
            prompt: fields.prompt.unwrap_or_default(),
            stdout: fields.stdout,
            stderr: fields.stderr,
            response: outcome.response,
            success: outcome.success,
            has_output: outcome.has_output,
            exit_code: fields.exit_code,
        }
    }

    /// Compact JSON followed by a newline, ready for a single append.
    pub fn to_jsonl(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut line = serde_json::to_vec(self)?;
        line.push(b'\n');
        Ok(line)
    }
}

/// ISO 8601 with microseconds and a numeric offset (`+00:00`, never `Z`).
fn serialize_timestamp<S: Serializer>(
    timestamp: &OffsetDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let formatted = timestamp
        .format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6][offset_hour sign:mandatory]:[offset_minute]"
        ))
        .map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&formatted)
}
