//! Event Reader: pulls exactly one JSON object off the invocation channel.

use std::io::{self, Read};

use serde_json::{Map, Value};

use crate::config::ReaderLimits;
use crate::error::InputError;

/// The payload exactly as the dispatcher sent it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    fields: Map<String, Value>,
}

impl RawEvent {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn tool_name(&self) -> Option<&str> {
        self.fields.get("tool_name").and_then(Value::as_str)
    }

    /// `tool_input.command`, or `""` when missing or not a string.
    pub fn command(&self) -> &str {
        self.fields
            .get("tool_input")
            .and_then(|input| input.get("command"))
            .and_then(Value::as_str)
            .unwrap_or("")
    }
}

impl TryFrom<Value> for RawEvent {
    type Error = InputError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self::new(fields)),
            other => Err(InputError::NotAnObject {
                found: json_type_name(&other),
            }),
        }
    }
}

/// Reads one top-level JSON document and returns it as a [`RawEvent`].
///
/// Parsing stops as soon as the first complete document is read, so a
/// dispatcher that keeps the channel open does not stall the hook. Anything
/// after that document is ignored.
pub fn read_event<R: Read>(reader: R, limits: ReaderLimits) -> Result<RawEvent, InputError> {
    let mut bounded = BoundedReader::new(reader, limits.max_input_bytes);
    let first = serde_json::Deserializer::from_reader(&mut bounded)
        .into_iter::<Value>()
        .next();

    match first {
        None => Err(InputError::Empty),
        Some(Ok(value)) => RawEvent::try_from(value),
        Some(Err(_)) if bounded.exceeded => Err(InputError::TooLarge {
            max_input_bytes: limits.max_input_bytes,
        }),
        Some(Err(err)) if err.is_io() => Err(InputError::Io(err.into())),
        Some(Err(err)) => Err(InputError::Json(err)),
    }
}

pub fn read_event_from_str(input: &str, limits: ReaderLimits) -> Result<RawEvent, InputError> {
    read_event(input.as_bytes(), limits)
}

struct BoundedReader<R> {
    inner: R,
    remaining: usize,
    exceeded: bool,
}

impl<R: Read> BoundedReader<R> {
    fn new(inner: R, max_bytes: usize) -> Self {
        Self {
            inner,
            remaining: max_bytes,
            exceeded: false,
        }
    }
}

impl<R: Read> Read for BoundedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.remaining == 0 {
            let mut probe = [0u8; 1];
            if self.inner.read(&mut probe)? == 0 {
                return Ok(0);
            }
            self.exceeded = true;
            return Err(io::Error::other("hook input limit exceeded"));
        }
        let cap = buf.len().min(self.remaining);
        let n = self.inner.read(&mut buf[..cap])?;
        self.remaining -= n;
        Ok(n)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
