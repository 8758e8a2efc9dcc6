//! Outer half of the command bridge.
//!
//! [`BridgeClient`] opens one loopback TCP connection per command, writes a
//! single JSONL request, and decodes the single JSONL result the host writes
//! back. Connection refusals and timeouts are retried according to a
//! [`RetryPolicy`]; once the budget is spent the caller gets
//! [`ClientError::Unavailable`], which is never confused with an `error`
//! result sent by the host.
//!
//! The module also owns the `cadbridge` command-line runner. It is exposed
//! through [`run`] so tests can substitute IO streams.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use serde::Serialize;
use serde_json::{Map, Value};

use cadbridge_protocol::{Command, CommandResult, ProtocolError};

mod cli;
mod client;
mod config;
mod errors;
mod retry;
mod transport;

use cli::{Cli, CliCommand};
pub use client::BridgeClient;
pub use config::{ClientConfig, DEFAULT_TIMEOUT};
pub(crate) use config::{ConfigLoader, OrthoConfigLoader};
pub use errors::ClientError;
pub(crate) use errors::AppError;
pub use retry::{DEFAULT_ATTEMPTS, DEFAULT_RETRY_STEP, RetryPolicy};

pub(crate) const CLIENT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::client");

/// Exit status when the host answered `error`.
const EXIT_REJECTED: u8 = 1;
/// Exit status when no result could be obtained.
const EXIT_FAILED: u8 = 2;

/// What the command line asked the client to do.
#[derive(Debug)]
enum Invocation {
    Version,
    Operation(Command),
}

impl TryFrom<&Cli> for Invocation {
    type Error = AppError;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        if matches!(cli.command, Some(CliCommand::Version)) {
            return Ok(Self::Version);
        }
        let operation = cli
            .operation
            .as_deref()
            .map(str::trim)
            .filter(|operation| !operation.is_empty())
            .ok_or(AppError::MissingOperation)?;
        let args = match cli.args.as_deref() {
            Some(text) => parse_args(text)?,
            None => Map::new(),
        };
        Ok(Self::Operation(Command {
            operation: operation.to_owned(),
            args,
        }))
    }
}

fn parse_args(text: &str) -> Result<Map<String, Value>, AppError> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AppError::InvalidArguments(ProtocolError::invalid_arguments(
            "arguments must be a JSON object",
        ))),
        Err(error) => Err(AppError::InvalidArguments(ProtocolError::from_json_error(
            error,
        ))),
    }
}

/// Runs the `cadbridge` command line using the provided IO handles.
///
/// Exits with 0 when the host answered `ok`, 1 when it answered `error`, and
/// 2 when no result was obtained.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    run_with_loader(args, stdout, stderr, &OrthoConfigLoader)
}

pub(crate) fn run_with_loader<I, W, E, L>(
    args: I,
    stdout: &mut W,
    stderr: &mut E,
    loader: &L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) if error.use_stderr() => {
            let _ = write!(stderr, "{error}");
            return ExitCode::from(EXIT_FAILED);
        }
        Err(error) => {
            let _ = write!(stdout, "{error}");
            return ExitCode::SUCCESS;
        }
    };

    match execute(&cli, loader, stdout) {
        Ok(code) => code,
        Err(error) => {
            let _ = writeln!(stderr, "cadbridge: {error}");
            match error {
                AppError::Client(ClientError::Rejected { .. }) => ExitCode::from(EXIT_REJECTED),
                _ => ExitCode::from(EXIT_FAILED),
            }
        }
    }
}

fn execute<W, L>(cli: &Cli, loader: &L, stdout: &mut W) -> Result<ExitCode, AppError>
where
    W: Write,
    L: ConfigLoader,
{
    let invocation = Invocation::try_from(cli)?;
    let client = build_client(cli, loader)?;
    match invocation {
        Invocation::Version => {
            let info = client.version_info()?;
            emit(stdout, &info)?;
            Ok(ExitCode::SUCCESS)
        }
        Invocation::Operation(command) => {
            let result = client.send(&command)?;
            emit(stdout, &result)?;
            Ok(exit_code_for(&result))
        }
    }
}

fn build_client<L: ConfigLoader>(cli: &Cli, loader: &L) -> Result<BridgeClient, AppError> {
    let config = loader.load()?;
    let endpoint = config.endpoint().with_port(cli.port.unwrap_or_else(|| config.port()));
    let mut settings =
        ClientConfig::from_endpoint(&endpoint).map_err(|source| AppError::Resolve {
            endpoint: endpoint.to_string(),
            source,
        })?;
    if let Some(seconds) = cli.timeout {
        settings = settings.with_timeout(Duration::from_secs(seconds));
    }
    Ok(BridgeClient::new(settings))
}

fn emit<W: Write, T: Serialize>(stdout: &mut W, value: &T) -> Result<(), AppError> {
    serde_json::to_writer(&mut *stdout, value).map_err(AppError::SerialiseOutput)?;
    stdout.write_all(b"\n").map_err(AppError::WriteOutput)?;
    stdout.flush().map_err(AppError::WriteOutput)
}

fn exit_code_for(result: &CommandResult) -> ExitCode {
    if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_REJECTED)
    }
}

#[cfg(test)]
mod tests;
