//! In-process half of the command bridge.
//!
//! A long-running, single-threaded host application embeds a
//! [`CommandService`]: a loopback TCP listener that accepts one JSON command
//! per connection, looks the operation up in an immutable [`DispatchTable`],
//! and hands the prepared call to the host-safe context through a bounded
//! queue ([`host_queue`]). The accept loop runs on one background thread so
//! the host's own thread is never blocked by socket I/O; host state is only
//! ever touched by whichever thread drains the [`HostPump`].
//!
//! Every failure on the serving path is converted into an `error`
//! [`CommandResult`](cadbridge_protocol::CommandResult). Only binding the
//! listener can fail startup.
//!
//! The `cadbridge-host` binary wires these pieces to an [`InMemoryModel`] so
//! the bridge can be exercised without the real host application.

mod bootstrap;
mod dispatch;
mod health;
mod host;
mod process;
mod service;
mod transport;

pub use cadbridge_config::{TelemetryError, TelemetryHandle};

pub use bootstrap::{ConfigLoader, StaticConfigLoader, SystemConfigLoader};
pub use dispatch::{
    DispatchError, DispatchTable, DispatchTableBuilder, Handler, PreparedCall, RegistrationError,
    UNSAVED_MODEL_NAME,
};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use host::{
    DEFAULT_QUEUE_CAPACITY, ElementInfo, ElementKind, ExecutorError, HostError, HostHandle,
    HostModel, HostPump, HostThread, InMemoryModel, StandardAttributes, host_queue,
};
pub use process::{
    LaunchError, ShutdownError, ShutdownSignal, TerminationSignals, run_host, run_host_with,
};
pub use service::{CommandService, DEFAULT_IO_TIMEOUT, RunningService, ServiceError};
pub use transport::ListenerError;

#[cfg(test)]
mod tests;
