//! The retrying bridge client.

use std::thread;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use cadbridge_protocol::{
    Command, CommandResult, CreateBeamArgs, ProtocolError, VersionInfo, operations,
};

use crate::CLIENT_TARGET;
use crate::config::ClientConfig;
use crate::errors::ClientError;
use crate::transport::{AttemptError, exchange};

/// Sends commands to a running command service.
///
/// The client holds only its configuration; every call opens a fresh
/// connection, so one instance can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct BridgeClient {
    config: ClientConfig,
}

impl BridgeClient {
    /// Builds a client for `config`.
    #[must_use]
    pub const fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Builds a client for `port` on the loopback interface.
    #[must_use]
    pub fn loopback(port: u16) -> Self {
        Self::new(ClientConfig::loopback(port))
    }

    /// Settings in use.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends `command` and returns the decoded result.
    ///
    /// An `error` result from the host is a successful exchange and is
    /// returned as `Ok`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Unavailable` once the retry policy is exhausted
    /// by transient failures, and `ClientError::Transport` or
    /// `ClientError::Protocol` immediately for anything else.
    pub fn send(&self, command: &Command) -> Result<CommandResult, ClientError> {
        let ClientConfig {
            address,
            timeout,
            retry,
        } = self.config;
        let mut attempt = 1;
        loop {
            let delay = retry.delay_before(attempt);
            if !delay.is_zero() {
                thread::sleep(delay);
            }
            debug!(
                target: CLIENT_TARGET,
                operation = command.operation(),
                %address,
                attempt,
                "sending command"
            );
            match exchange(address, timeout, command) {
                Ok(result) => return Ok(result),
                Err(AttemptError::Fatal(error)) => return Err(error),
                Err(AttemptError::Transient(last_error)) if attempt >= retry.attempts() => {
                    warn!(
                        target: CLIENT_TARGET,
                        %address,
                        attempts = attempt,
                        step = ?retry.step(),
                        error = %last_error,
                        "bridge unavailable"
                    );
                    return Err(ClientError::Unavailable {
                        address,
                        attempts: attempt,
                        last_error,
                    });
                }
                Err(AttemptError::Transient(error)) => {
                    debug!(
                        target: CLIENT_TARGET,
                        %address,
                        attempt,
                        %error,
                        "transient failure; retrying"
                    );
                    attempt += 1;
                }
            }
        }
    }

    /// Sends `operation` with `args` serialized as the argument object.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Protocol` when `args` is not a JSON object, plus
    /// every error [`BridgeClient::send`] can return.
    pub fn call<A: Serialize>(
        &self,
        operation: &str,
        args: &A,
    ) -> Result<CommandResult, ClientError> {
        let command = Command::with_args(operation, args)?;
        self.send(&command)
    }

    /// Performs the version handshake.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Rejected` when the host refuses the handshake,
    /// for example because it is older than the supported floor.
    pub fn version_info(&self) -> Result<VersionInfo, ClientError> {
        let result = self.send(&Command::new(operations::GET_VERSION_INFO))?;
        decode_data(operations::GET_VERSION_INFO, result)
    }

    /// Creates a beam and returns the host's result.
    ///
    /// # Errors
    ///
    /// See [`BridgeClient::send`].
    pub fn create_beam(&self, args: &CreateBeamArgs) -> Result<CommandResult, ClientError> {
        self.call(operations::CREATE_BEAM, args)
    }
}

fn decode_data<T: DeserializeOwned>(
    operation: &str,
    result: CommandResult,
) -> Result<T, ClientError> {
    match result {
        CommandResult::Ok(success) => {
            let data = success.data.ok_or_else(|| {
                ProtocolError::invalid_structure(format!("{operation} result carries no data"))
            })?;
            serde_json::from_value(data)
                .map_err(|source| ProtocolError::from_json_error(source).into())
        }
        CommandResult::Error(failure) => Err(ClientError::Rejected {
            operation: operation.to_owned(),
            message: failure.message,
        }),
    }
}
