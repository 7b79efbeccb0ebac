//! Schema Normalizer: reconciles the result shapes dispatchers have used over
//! time into one [`NormalizedPayload`].

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::reader::RawEvent;

/// Keys that mark a mapping as a structured process result.
const RESULT_KEYS: [&str; 4] = ["stdout", "stderr", "content", "exit_code"];

/// Process exit status, or the explicit sentinel used when none was reported.
///
/// Kept distinct from `0`: an unreported status must not read as success.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum ExitCode {
    Known(i64),
    #[default]
    Unknown,
}

impl ExitCode {
    pub fn code(self) -> Option<i64> {
        match self {
            ExitCode::Known(code) => Some(code),
            ExitCode::Unknown => None,
        }
    }

    fn from_value(value: Option<&Value>) -> Self {
        value
            .and_then(Value::as_i64)
            .map(ExitCode::Known)
            .unwrap_or(ExitCode::Unknown)
    }
}

impl Serialize for ExitCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.code().serialize(serializer)
    }
}

/// Which result field the payload was taken from, resolved once.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ResultShape {
    StructuredResponse,
    TextResponse,
    StructuredOutput,
    TextOutput,
    /// None of the known shapes was present.
    Missing,
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct NormalizedPayload {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: ExitCode,
}

/// Picks the first matching shape in priority order: structured
/// `tool_response`, string `tool_response`, structured `tool_output`, string
/// `tool_output`. Never fails; an event without any result normalizes to an
/// empty payload with [`ResultShape::Missing`].
pub fn normalize(event: &RawEvent) -> (ResultShape, NormalizedPayload) {
    let response = event.get("tool_response");
    let output = event.get("tool_output");

    if let Some(map) = response.and_then(structured_result) {
        return (ResultShape::StructuredResponse, from_structured(map));
    }
    if let Some(Value::String(text)) = response {
        return (ResultShape::TextResponse, from_text(text));
    }
    if let Some(map) = output.and_then(structured_result) {
        return (ResultShape::StructuredOutput, from_structured(map));
    }
    if let Some(Value::String(text)) = output {
        return (ResultShape::TextOutput, from_text(text));
    }
    (ResultShape::Missing, NormalizedPayload::default())
}

fn structured_result(value: &Value) -> Option<&Map<String, Value>> {
    let map = value.as_object()?;
    RESULT_KEYS
        .iter()
        .any(|key| map.contains_key(*key))
        .then_some(map)
}

fn from_structured(map: &Map<String, Value>) -> NormalizedPayload {
    let mut stdout = stream_text(map.get("stdout"));
    if stdout.is_empty() {
        stdout = stream_text(map.get("content"));
    }
    NormalizedPayload {
        stdout,
        stderr: stream_text(map.get("stderr")),
        exit_code: ExitCode::from_value(map.get("exit_code")),
    }
}

fn from_text(text: &str) -> NormalizedPayload {
    NormalizedPayload {
        stdout: text.to_string(),
        stderr: String::new(),
        exit_code: ExitCode::Unknown,
    }
}

fn stream_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}
