//! Errors raised while framing or decoding protocol documents.

use std::io;

use thiserror::Error;

/// Failures while moving a frame across a byte stream.
#[derive(Debug, Error)]
pub enum FrameError {
    /// Reading from or writing to the stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The peer sent more than the frame limit without a newline.
    #[error("frame too large: {size} bytes exceeds {max_size} byte limit")]
    TooLarge {
        /// Bytes buffered when the limit tripped.
        size: usize,
        /// Configured limit.
        max_size: usize,
    },

    /// The outgoing message could not be serialized.
    #[error("failed to serialize frame: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A frame arrived intact but its contents violate the protocol.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The frame is not valid JSON or does not match the expected shape.
    #[error("malformed JSON: {message}")]
    Malformed {
        /// Human readable parser diagnostic.
        message: String,
        /// Underlying parser error when one exists.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The document parsed but a required field is empty or inconsistent.
    #[error("invalid structure: {message}")]
    InvalidStructure {
        /// Description of the violated constraint.
        message: String,
    },

    /// Arguments do not fit the operation they were sent to.
    #[error("invalid arguments: {message}")]
    InvalidArguments {
        /// Description of the offending argument.
        message: String,
    },
}

impl ProtocolError {
    /// Wraps a serde diagnostic.
    pub fn from_json_error(source: serde_json::Error) -> Self {
        Self::Malformed {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Creates a malformed-document error with a custom message.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an invalid structure error.
    pub fn invalid_structure(message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            message: message.into(),
        }
    }

    /// Creates an invalid arguments error.
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            message: message.into(),
        }
    }
}
