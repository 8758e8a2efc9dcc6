//! Connection handler that serves one command per connection.

use std::net::TcpStream;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use cadbridge_protocol::{Command, CommandResult, Success, read_frame, write_frame};

use crate::health::HealthReporter;
use crate::host::HostHandle;
use crate::transport::ConnectionHandler;

use super::DISPATCH_TARGET;
use super::errors::DispatchError;
use super::handshake::HostCompatibility;
use super::table::DispatchTable;

/// Reads a command, runs it on the host-safe context, and writes the result.
///
/// The host version is read on the first exchange and cached for the
/// lifetime of the handler; a failed read is retried on the next exchange.
pub(crate) struct CommandConnectionHandler {
    table: Arc<DispatchTable>,
    host: HostHandle,
    reporter: Arc<dyn HealthReporter>,
    compatibility: OnceCell<HostCompatibility>,
}

impl CommandConnectionHandler {
    pub(crate) fn new(
        table: Arc<DispatchTable>,
        host: HostHandle,
        reporter: Arc<dyn HealthReporter>,
    ) -> Self {
        Self {
            table,
            host,
            reporter,
            compatibility: OnceCell::new(),
        }
    }

    /// Serves a single request frame and returns the result to send back.
    pub(crate) fn respond(&self, frame: &[u8]) -> CommandResult {
        match self.dispatch(frame) {
            Ok(success) => CommandResult::Ok(success),
            Err(error) => {
                warn!(target: DISPATCH_TARGET, %error, "command failed");
                CommandResult::error(error.to_string())
            }
        }
    }

    fn dispatch(&self, frame: &[u8]) -> Result<Success, DispatchError> {
        let command = Command::parse(frame)?;
        command.validate()?;
        let operation = command.operation();

        self.compatibility()?.check()?;
        let handler = self.table.resolve(operation)?;
        let call = handler(&command.args)?;

        debug!(target: DISPATCH_TARGET, operation, "dispatching command");
        self.host
            .call(call)?
            .map_err(|source| DispatchError::host(operation, source))
    }

    fn compatibility(&self) -> Result<HostCompatibility, DispatchError> {
        self.compatibility
            .get_or_try_init(|| {
                let host_version = self.host.call(|model| model.host_version())?;
                let compatibility = HostCompatibility::new(host_version);
                self.reporter
                    .host_version_checked(compatibility.host_version(), compatibility.is_compatible());
                Ok::<_, DispatchError>(compatibility)
            })
            .copied()
    }
}

impl ConnectionHandler for CommandConnectionHandler {
    fn handle(&self, mut stream: TcpStream) {
        let result = match read_frame(&mut stream) {
            Ok(Some(frame)) => self.respond(&frame),
            Ok(None) => {
                debug!(target: DISPATCH_TARGET, "client disconnected without request");
                return;
            }
            Err(source) => {
                let error = DispatchError::from(source);
                warn!(target: DISPATCH_TARGET, %error, "failed to read request");
                CommandResult::error(error.to_string())
            }
        };

        if let Err(error) = write_frame(&mut stream, &result) {
            warn!(target: DISPATCH_TARGET, %error, "failed to write result");
        }
    }
}
