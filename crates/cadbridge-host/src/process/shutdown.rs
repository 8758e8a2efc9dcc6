use std::io;
use std::os::raw::c_int;

use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::Signals;
use signal_hook::low_level::signal_name;
use thiserror::Error;
use tracing::info;

use super::PROCESS_TARGET;

/// Something the host process can block on until it should stop serving.
pub trait ShutdownSignal: Send + Sync {
    /// Blocks until the service should be stopped.
    ///
    /// # Errors
    ///
    /// Returns [`ShutdownError::Install`] when the wait cannot be armed.
    fn wait(&self) -> Result<(), ShutdownError>;
}

/// Errors reported by shutdown signal listeners.
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// Registering for the termination signals failed.
    #[error("failed to register termination signals {signals:?}: {source}")]
    Install {
        /// Signal numbers that were requested.
        signals: Vec<c_int>,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Waits for the first of a set of POSIX termination signals.
#[derive(Debug, Clone)]
pub struct TerminationSignals {
    signals: Vec<c_int>,
}

impl TerminationSignals {
    /// Waits for an explicit set of signal numbers.
    #[must_use]
    pub fn new(signals: impl IntoIterator<Item = c_int>) -> Self {
        Self {
            signals: signals.into_iter().collect(),
        }
    }

    /// Signal numbers this listener reacts to.
    #[must_use]
    pub fn signals(&self) -> &[c_int] {
        &self.signals
    }
}

impl Default for TerminationSignals {
    /// `SIGTERM`, `SIGINT`, `SIGQUIT` and `SIGHUP`.
    fn default() -> Self {
        Self::new([SIGTERM, SIGINT, SIGQUIT, SIGHUP])
    }
}

impl ShutdownSignal for TerminationSignals {
    fn wait(&self) -> Result<(), ShutdownError> {
        let mut registered =
            Signals::new(&self.signals).map_err(|source| ShutdownError::Install {
                signals: self.signals.clone(),
                source,
            })?;
        let received = registered.forever().next();
        let name = received.and_then(signal_name).unwrap_or("unknown");
        info!(target: PROCESS_TARGET, signal = name, "stopping on termination signal");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_covers_interactive_and_service_stops() {
        let signals = TerminationSignals::default();
        for expected in [SIGTERM, SIGINT, SIGHUP] {
            assert!(signals.signals().contains(&expected));
        }
    }

    #[test]
    fn explicit_set_is_kept_in_order() {
        let signals = TerminationSignals::new([SIGINT, SIGTERM]);
        assert_eq!(signals.signals(), &[SIGINT, SIGTERM]);
    }
}
