//! Failures raised by host operations and by the host-safe queue.

use thiserror::Error;

/// Domain failures reported by a [`HostModel`](super::HostModel).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    /// No element carries the requested identifier.
    #[error("element {id} does not exist")]
    ElementNotFound {
        /// Identifier that was looked up.
        id: i64,
    },
    /// The host refused to build the requested geometry.
    #[error("invalid geometry: {message}")]
    InvalidGeometry {
        /// Reason given by the host.
        message: String,
    },
    /// Any other failure reported by the host API.
    #[error("host API error: {message}")]
    Api {
        /// Text of the host error.
        message: String,
    },
}

impl HostError {
    /// Creates an invalid geometry error.
    pub fn invalid_geometry(message: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            message: message.into(),
        }
    }

    /// Creates a generic host API error.
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }
}

/// Failures handing a job to the host-safe context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutorError {
    /// The pump was dropped, so nothing will ever run the job.
    #[error("host execution context is no longer running")]
    Closed,
    /// The job panicked on the host thread; the pump kept running.
    #[error("handler panicked: {message}")]
    Panicked {
        /// Panic payload rendered as text.
        message: String,
    },
    /// The dedicated host thread could not be started or panicked outside a job.
    #[error("host thread failure: {message}")]
    Thread {
        /// Description of the failure.
        message: String,
    },
}
