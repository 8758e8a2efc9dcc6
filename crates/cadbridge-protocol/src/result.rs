//! Response envelope.
//!
//! A result is either a success carrying optional identity and payload
//! fields or a failure carrying a message. The wire form keeps the flat
//! `{"status", "id", "name", "msg"}` shape older callers parse, so the enum
//! is converted through a private record on both serialization paths.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProtocolError;

/// Outcome of one command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "ResultRecord", try_from = "ResultRecord")]
pub enum CommandResult {
    /// The operation completed.
    Ok(Success),
    /// The operation failed; the message explains why.
    Error(Failure),
}

/// Fields of a successful result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Success {
    /// Identifier of the element the operation produced or inspected.
    pub id: Option<i64>,
    /// Human readable name returned by the operation.
    pub name: Option<String>,
    /// Operation-specific structured output.
    pub data: Option<Value>,
}

/// Fields of a failed result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Description of what went wrong.
    pub message: String,
}

/// Wire value of the `status` member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Success.
    Ok,
    /// Failure.
    Error,
}

impl Success {
    /// A success with no fields set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the element identifier.
    #[must_use]
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the structured payload.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

impl CommandResult {
    /// Wraps a success.
    #[must_use]
    pub fn ok(success: Success) -> Self {
        Self::Ok(success)
    }

    /// Builds a failure from a message.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(Failure {
            message: message.into(),
        })
    }

    /// Wire status of this result.
    #[must_use]
    pub fn status(&self) -> Status {
        match self {
            Self::Ok(_) => Status::Ok,
            Self::Error(_) => Status::Error,
        }
    }

    /// Whether this is a success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// Element identifier of a success.
    #[must_use]
    pub fn id(&self) -> Option<i64> {
        match self {
            Self::Ok(success) => success.id,
            Self::Error(_) => None,
        }
    }

    /// Name of a success.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Ok(success) => success.name.as_deref(),
            Self::Error(_) => None,
        }
    }

    /// Structured payload of a success.
    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Ok(success) => success.data.as_ref(),
            Self::Error(_) => None,
        }
    }

    /// Message of a failure.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Ok(_) => None,
            Self::Error(failure) => Some(&failure.message),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct ResultRecord {
    status: Status,
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "message")]
    msg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl From<CommandResult> for ResultRecord {
    fn from(result: CommandResult) -> Self {
        match result {
            CommandResult::Ok(Success { id, name, data }) => Self {
                status: Status::Ok,
                id,
                name,
                msg: None,
                data,
            },
            CommandResult::Error(Failure { message }) => Self {
                status: Status::Error,
                id: None,
                name: None,
                msg: Some(message),
                data: None,
            },
        }
    }
}

impl TryFrom<ResultRecord> for CommandResult {
    type Error = ProtocolError;

    fn try_from(record: ResultRecord) -> Result<Self, ProtocolError> {
        match record.status {
            Status::Ok => {
                if record.msg.is_some() {
                    return Err(ProtocolError::invalid_structure(
                        "ok result must not carry a message",
                    ));
                }
                Ok(Self::Ok(Success {
                    id: record.id,
                    name: record.name,
                    data: record.data,
                }))
            }
            Status::Error => {
                if record.id.is_some() || record.name.is_some() || record.data.is_some() {
                    return Err(ProtocolError::invalid_structure(
                        "error result must not carry id, name, or data",
                    ));
                }
                let message = record.msg.ok_or_else(|| {
                    ProtocolError::invalid_structure("error result is missing its message")
                })?;
                Ok(Self::error(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[test]
    fn ok_serializes_every_member() {
        let result = CommandResult::ok(Success::new().with_id(42).with_name("beam"));
        assert_eq!(
            serde_json::to_value(&result).expect("serialize"),
            json!({"status": "ok", "id": 42, "name": "beam", "msg": null})
        );
    }

    #[test]
    fn error_serializes_null_identity() {
        let result = CommandResult::error("boom");
        assert_eq!(
            serde_json::to_value(&result).expect("serialize"),
            json!({"status": "error", "id": null, "name": null, "msg": "boom"})
        );
    }

    #[test]
    fn data_is_emitted_only_when_present() {
        let result = CommandResult::ok(Success::new().with_data(json!([1, 2])));
        let value = serde_json::to_value(&result).expect("serialize");
        assert_eq!(value.get("data"), Some(&json!([1, 2])));
    }

    #[test]
    fn accepts_message_alias() {
        let result: CommandResult =
            serde_json::from_value(json!({"status": "error", "message": "legacy"}))
                .expect("decode alias");
        assert_eq!(result.message(), Some("legacy"));
    }

    #[test]
    fn decodes_sparse_ok() {
        let result: CommandResult =
            serde_json::from_value(json!({"status": "ok"})).expect("decode");
        assert_eq!(result, CommandResult::ok(Success::new()));
    }

    #[rstest]
    #[case(json!({"status": "ok", "msg": "unexpected"}))]
    #[case(json!({"status": "error", "id": 1, "msg": "x"}))]
    #[case(json!({"status": "error", "name": "n", "msg": "x"}))]
    #[case(json!({"status": "error", "data": {}, "msg": "x"}))]
    #[case(json!({"status": "error"}))]
    #[case(json!({"status": "maybe"}))]
    fn rejects_inconsistent_documents(#[case] document: Value) {
        assert!(serde_json::from_value::<CommandResult>(document).is_err());
    }
}
