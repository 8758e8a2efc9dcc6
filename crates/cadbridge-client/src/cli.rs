//! Command-line definitions for the `cadbridge` binary.

use clap::{Parser, Subcommand};

/// Sends one command to a running command bridge.
#[derive(Parser, Debug)]
#[command(
    name = "cadbridge",
    disable_help_subcommand = true,
    subcommand_negates_reqs = true
)]
pub(crate) struct Cli {
    /// Loopback port of the command service; overrides `CW_PORT`.
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Per-attempt timeout in seconds.
    #[arg(long, value_name = "SECONDS")]
    pub(crate) timeout: Option<u64>,
    /// Arguments for the operation, as a JSON object.
    #[arg(long, value_name = "JSON")]
    pub(crate) args: Option<String>,
    /// Structured subcommands (for example `version`).
    #[command(subcommand)]
    pub(crate) command: Option<CliCommand>,
    /// Operation to invoke (for example `create_beam`).
    #[arg(value_name = "OPERATION")]
    pub(crate) operation: Option<String>,
}

/// Subcommands handled by the client itself.
#[derive(Subcommand, Debug, Clone, Copy)]
pub(crate) enum CliCommand {
    /// Performs the version handshake and prints both versions.
    Version,
}
