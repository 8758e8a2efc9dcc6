//! Unified error surface for running the standalone host.

use std::sync::Arc;

use ortho_config::OrthoError;
use thiserror::Error;

use cadbridge_config::TelemetryError;

use crate::dispatch::RegistrationError;
use crate::host::ExecutorError;
use crate::service::ServiceError;

use super::shutdown::ShutdownError;

/// Errors surfaced while launching or supervising the host process.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Config {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Telemetry could not be installed.
    #[error("failed to initialise telemetry: {0}")]
    Telemetry(#[from] TelemetryError),
    /// The dispatch table is misconfigured.
    #[error("failed to build dispatch table: {0}")]
    Registration(#[from] RegistrationError),
    /// The host context could not be started or crashed.
    #[error("host context failed: {0}")]
    Host(#[from] ExecutorError),
    /// The command service failed to start or stop.
    #[error("command service failed: {0}")]
    Service(#[from] ServiceError),
    /// Waiting for a shutdown signal failed.
    #[error("shutdown listener failed: {0}")]
    Shutdown(#[from] ShutdownError),
}

impl From<Arc<OrthoError>> for LaunchError {
    fn from(source: Arc<OrthoError>) -> Self {
        Self::Config { source }
    }
}
