//! The command service: a loopback listener wired to the dispatch table.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use cadbridge_config::ServiceEndpoint;

use crate::dispatch::{CommandConnectionHandler, DispatchTable};
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::host::HostHandle;
use crate::transport::{ListenerError, ListenerHandle, SocketListener};

/// Read and write timeout applied to every accepted connection.
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(20);

/// Errors that abort service startup or shutdown.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The endpoint would expose the service beyond the local machine.
    #[error("refusing to bind non-loopback endpoint {endpoint}")]
    NonLoopback {
        /// Rejected endpoint.
        endpoint: ServiceEndpoint,
    },
    /// The listener failed to bind or run.
    #[error(transparent)]
    Listener(#[from] ListenerError),
}

/// A configured, not yet running command service.
pub struct CommandService {
    table: Arc<DispatchTable>,
    host: HostHandle,
    reporter: Arc<dyn HealthReporter>,
    io_timeout: Duration,
}

impl CommandService {
    /// Serves `table` and runs its handlers through `host`.
    #[must_use]
    pub fn new(table: DispatchTable, host: HostHandle) -> Self {
        Self {
            table: Arc::new(table),
            host,
            reporter: Arc::new(StructuredHealthReporter::new()),
            io_timeout: DEFAULT_IO_TIMEOUT,
        }
    }

    /// Replaces the lifecycle reporter.
    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn HealthReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Overrides the per-connection socket timeout.
    #[must_use]
    pub fn with_io_timeout(mut self, io_timeout: Duration) -> Self {
        self.io_timeout = io_timeout;
        self
    }

    /// Binds `endpoint` and starts the background accept loop.
    ///
    /// Returns as soon as the listener is bound; the caller's thread is never
    /// used for serving.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NonLoopback` for endpoints reachable from other
    /// machines and `ServiceError::Listener` when binding fails, for example
    /// because the port is taken.
    pub fn start(self, endpoint: &ServiceEndpoint) -> Result<RunningService, ServiceError> {
        self.reporter.service_starting(endpoint);
        match self.start_listener(endpoint) {
            Ok(running) => {
                self.reporter.service_ready(running.local_addr);
                Ok(running)
            }
            Err(error) => {
                self.reporter.service_failed(&error);
                Err(error)
            }
        }
    }

    fn start_listener(&self, endpoint: &ServiceEndpoint) -> Result<RunningService, ServiceError> {
        if !endpoint.is_loopback() {
            return Err(ServiceError::NonLoopback {
                endpoint: endpoint.clone(),
            });
        }
        let listener = SocketListener::bind(endpoint)?;
        let local_addr = listener.local_addr();
        let handler = Arc::new(CommandConnectionHandler::new(
            Arc::clone(&self.table),
            self.host.clone(),
            Arc::clone(&self.reporter),
        ));
        let listener = listener.start(handler, self.io_timeout)?;
        Ok(RunningService {
            local_addr,
            listener: Some(listener),
            reporter: Arc::clone(&self.reporter),
        })
    }
}

/// A command service whose accept loop is running.
///
/// Dropping the value stops the accept loop without waiting for it.
pub struct RunningService {
    local_addr: SocketAddr,
    listener: Option<ListenerHandle>,
    reporter: Arc<dyn HealthReporter>,
}

impl RunningService {
    /// Address the listener is bound to.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Closes the listening socket; later connects are refused.
    ///
    /// The exchange in progress, if any, still completes on the listener
    /// thread. Calling this more than once has no further effect.
    pub fn stop(&self) {
        if let Some(listener) = &self.listener {
            listener.shutdown();
        }
    }

    /// Stops the service and waits for the accept loop to exit.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Listener` when the accept thread panicked.
    pub fn join(mut self) -> Result<(), ServiceError> {
        self.stop();
        if let Some(listener) = self.listener.take() {
            listener.join()?;
            self.reporter.service_stopped(self.local_addr);
        }
        Ok(())
    }
}

impl Drop for RunningService {
    fn drop(&mut self) {
        self.stop();
    }
}
