//! Error types for request dispatch failures.

use thiserror::Error;

use cadbridge_protocol::{FrameError, ProtocolError};

use crate::host::{ExecutorError, HostError};

/// Errors surfaced while serving one command.
///
/// The display text of each variant becomes the `msg` of the `error` result
/// returned to the client.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The request could not be read off the socket.
    #[error("failed to read request: {0}")]
    Frame(#[from] FrameError),

    /// The request is not a well-formed command.
    #[error("failed to parse request: {0}")]
    Protocol(#[from] ProtocolError),

    /// No handler is registered under the requested name.
    #[error("unknown operation '{operation}'")]
    UnknownOperation {
        /// Name the client asked for.
        operation: String,
    },

    /// Arguments do not fit the operation.
    #[error("invalid arguments for '{operation}': {message}")]
    InvalidArguments {
        /// Operation being prepared.
        operation: &'static str,
        /// Validation diagnostic.
        message: String,
    },

    /// The running host is older than the supported floor.
    #[error(
        "incompatible host: version {host_version} is below the minimum supported version {min_version}"
    )]
    IncompatibleHost {
        /// Version reported by the host.
        host_version: u32,
        /// Oldest supported version.
        min_version: u32,
    },

    /// The host rejected the operation.
    #[error("{operation} failed: {source}")]
    Host {
        /// Operation that failed.
        operation: String,
        /// Host diagnostic.
        #[source]
        source: HostError,
    },

    /// The job never completed on the host-safe context.
    #[error("{0}")]
    Executor(#[from] ExecutorError),
}

impl DispatchError {
    /// Creates an unknown operation error.
    pub fn unknown_operation(operation: impl Into<String>) -> Self {
        Self::UnknownOperation {
            operation: operation.into(),
        }
    }

    /// Creates an invalid arguments error.
    pub fn invalid_arguments(operation: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            operation,
            message: message.into(),
        }
    }

    /// Wraps a host failure for `operation`.
    pub fn host(operation: impl Into<String>, source: HostError) -> Self {
        Self::Host {
            operation: operation.into(),
            source,
        }
    }
}

/// Errors raised while building a dispatch table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// Two handlers claimed the same operation name.
    #[error("operation '{operation}' is registered more than once")]
    Duplicate {
        /// Conflicting name.
        operation: &'static str,
    },
}
