//! Supervises host launch sequencing and runtime orchestration.

use std::sync::Arc;

use tracing::info;

use cadbridge_config::telemetry;

use crate::bootstrap::{ConfigLoader, SystemConfigLoader};
use crate::dispatch::DispatchTable;
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::host::{DEFAULT_QUEUE_CAPACITY, HostThread, InMemoryModel};
use crate::service::CommandService;

use super::PROCESS_TARGET;
use super::errors::LaunchError;
use super::shutdown::{ShutdownSignal, TerminationSignals};

/// Runs the standalone host with production collaborators.
///
/// # Errors
///
/// Returns a [`LaunchError`] describing the first step that failed.
pub fn run_host() -> Result<(), LaunchError> {
    run_host_with(
        &SystemConfigLoader::default(),
        Arc::new(StructuredHealthReporter::new()),
        &TerminationSignals::default(),
    )
}

/// Runs the standalone host with injected collaborators.
///
/// Loads configuration, installs telemetry, starts an in-memory host on its
/// own thread, serves it until `shutdown` fires, then tears everything down
/// in reverse order.
///
/// # Errors
///
/// Returns a [`LaunchError`] describing the first step that failed.
pub fn run_host_with(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    shutdown: &dyn ShutdownSignal,
) -> Result<(), LaunchError> {
    let config = loader.load()?;
    telemetry::initialise(&config)?;
    info!(
        target: PROCESS_TARGET,
        endpoint = %config.endpoint(),
        log_format = %config.log_format(),
        "starting command bridge host"
    );

    let table = DispatchTable::standard()?;
    let (host, host_thread) = HostThread::spawn(DEFAULT_QUEUE_CAPACITY, InMemoryModel::default)?;
    let service = CommandService::new(table, host).with_reporter(reporter);
    let running = service.start(&config.endpoint())?;

    shutdown.wait()?;
    running.join()?;
    host_thread.join()?;
    info!(target: PROCESS_TARGET, "shutdown sequence completed");
    Ok(())
}
