//! Process-level orchestration for the standalone host binary.

mod errors;
mod launch;
mod shutdown;

pub use errors::LaunchError;
pub use launch::{run_host, run_host_with};
pub use shutdown::{ShutdownError, ShutdownSignal, TerminationSignals};

pub(crate) const PROCESS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::process");
