//! Failures surfaced by the bridge client.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;

use cadbridge_protocol::{FrameError, ProtocolError};

/// Errors returned by [`BridgeClient`](crate::BridgeClient).
///
/// None of these represent an `error` result from the host; those are
/// decoded successfully and returned as
/// [`CommandResult::Error`](cadbridge_protocol::CommandResult::Error).
#[derive(Debug, Error)]
pub enum ClientError {
    /// The bridge could not be reached within the retry budget.
    #[error("bridge unavailable at {address} after {attempts} attempt(s): {last_error}")]
    Unavailable {
        /// Address that was tried.
        address: SocketAddr,
        /// Attempts made.
        attempts: u32,
        /// Failure seen on the final attempt.
        #[source]
        last_error: io::Error,
    },
    /// The exchange failed in a way that retrying would not fix.
    #[error("transport failure talking to {address}: {source}")]
    Transport {
        /// Peer address.
        address: SocketAddr,
        /// Underlying I/O or framing failure.
        #[source]
        source: FrameError,
    },
    /// The request could not be built or the response was not a valid result.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    /// The host answered a typed call with an `error` result.
    #[error("{operation} rejected by host: {message}")]
    Rejected {
        /// Operation that was refused.
        operation: String,
        /// Message carried by the result.
        message: String,
    },
}

impl ClientError {
    /// Whether the bridge was never reached.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Failures of the `cadbridge` command-line runner.
#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("failed to initialise logging: {0}")]
    Telemetry(cadbridge_config::TelemetryError),
    #[error("the operation must be provided")]
    MissingOperation,
    #[error("invalid --args: {0}")]
    InvalidArguments(ProtocolError),
    #[error("failed to resolve bridge address {endpoint}: {source}")]
    Resolve { endpoint: String, source: io::Error },
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(serde_json::Error),
    #[error("failed to write output: {0}")]
    WriteOutput(io::Error),
}
