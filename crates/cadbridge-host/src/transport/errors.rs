//! Failures of the command service socket.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Errors surfaced while binding or running the socket listener.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The endpoint host did not resolve.
    #[error("cannot resolve {host}:{port}: {source}")]
    Resolve {
        /// Configured host.
        host: String,
        /// Configured port.
        port: u16,
        /// Resolver error.
        #[source]
        source: io::Error,
    },
    /// The port could not be bound, usually because it is taken.
    #[error("cannot bind {addr}: {source}")]
    Bind {
        /// Address that could not be bound.
        addr: SocketAddr,
        /// Underlying socket error.
        #[source]
        source: io::Error,
    },
    /// Preparing the bound socket failed.
    #[error("cannot {step} on the listening socket: {source}")]
    Socket {
        /// What was being attempted.
        step: &'static str,
        /// Underlying socket error.
        #[source]
        source: io::Error,
    },
    /// The listener thread could not be created.
    #[error("cannot spawn the listener thread: {source}")]
    Spawn {
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
    /// The listener thread panicked while serving.
    #[error("listener thread panicked")]
    ThreadPanic,
}
