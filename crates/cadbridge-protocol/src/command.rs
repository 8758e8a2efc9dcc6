//! Request envelope.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ProtocolError;

/// A request naming one operation and its arguments.
///
/// On the wire this is `{"operation": "...", "args": {...}}`. A missing
/// `args` member is read as an empty object; any other non-object value is
/// rejected while decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Operation name looked up in the dispatch table.
    pub operation: String,
    /// Operation-specific named arguments.
    #[serde(default)]
    pub args: Map<String, Value>,
}

impl Command {
    /// Creates a command with no arguments.
    #[must_use]
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            args: Map::new(),
        }
    }

    /// Creates a command whose arguments are the serialized form of `args`.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InvalidArguments` when `args` does not
    /// serialize to a JSON object.
    pub fn with_args<A: Serialize>(
        operation: impl Into<String>,
        args: &A,
    ) -> Result<Self, ProtocolError> {
        match serde_json::to_value(args).map_err(ProtocolError::from_json_error)? {
            Value::Object(map) => Ok(Self {
                operation: operation.into(),
                args: map,
            }),
            other => Err(ProtocolError::invalid_arguments(format!(
                "arguments must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Parses a single frame into a command.
    ///
    /// Trailing whitespace, including the newline delimiter, is ignored.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::Malformed` when the frame is empty, is not
    /// JSON, or does not match the command shape.
    pub fn parse(frame: &[u8]) -> Result<Self, ProtocolError> {
        let trimmed = trim_trailing_whitespace(frame);
        if trimmed.is_empty() {
            return Err(ProtocolError::malformed("empty request"));
        }
        serde_json::from_slice(trimmed).map_err(ProtocolError::from_json_error)
    }

    /// Checks that the operation name is present.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InvalidStructure` for a blank operation.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.operation.trim().is_empty() {
            return Err(ProtocolError::invalid_structure("operation field is empty"));
        }
        Ok(())
    }

    /// Returns the trimmed operation name.
    #[must_use]
    pub fn operation(&self) -> &str {
        self.operation.trim()
    }

    /// Decodes the arguments into an operation's typed record.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InvalidArguments` carrying the serde
    /// diagnostic when a key is missing, unknown, or of the wrong type.
    pub fn args_as<A: DeserializeOwned>(&self) -> Result<A, ProtocolError> {
        decode_args(&self.args)
    }
}

/// Decodes a raw argument map into a typed record.
///
/// # Errors
///
/// Returns `ProtocolError::InvalidArguments` when the map does not fit `A`.
pub fn decode_args<A: DeserializeOwned>(args: &Map<String, Value>) -> Result<A, ProtocolError> {
    serde_json::from_value(Value::Object(args.clone()))
        .map_err(|error| ProtocolError::invalid_arguments(error.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn trim_trailing_whitespace(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |pos| pos + 1);
    bytes.get(..end).unwrap_or_default()
}
