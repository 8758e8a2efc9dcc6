//! Structured health reporting for command service lifecycle events.

use std::net::SocketAddr;
use std::sync::Arc;

use cadbridge_config::ServiceEndpoint;
use cadbridge_protocol::MIN_HOST_VERSION;

use crate::service::ServiceError;

const HEALTH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::health");

/// Observer trait used to surface lifecycle events to telemetry sinks.
pub trait HealthReporter: Send + Sync {
    /// Invoked before the service binds its endpoint.
    fn service_starting(&self, endpoint: &ServiceEndpoint);

    /// Invoked once the accept loop is running.
    fn service_ready(&self, local_addr: SocketAddr);

    /// Invoked when the service fails to start.
    fn service_failed(&self, error: &ServiceError);

    /// Invoked after the accept loop has exited.
    fn service_stopped(&self, local_addr: SocketAddr);

    /// Invoked the first time the host version is compared with the floor.
    fn host_version_checked(&self, host_version: u32, compatible: bool);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter + ?Sized,
{
    fn service_starting(&self, endpoint: &ServiceEndpoint) {
        (**self).service_starting(endpoint);
    }

    fn service_ready(&self, local_addr: SocketAddr) {
        (**self).service_ready(local_addr);
    }

    fn service_failed(&self, error: &ServiceError) {
        (**self).service_failed(error);
    }

    fn service_stopped(&self, local_addr: SocketAddr) {
        (**self).service_stopped(local_addr);
    }

    fn host_version_checked(&self, host_version: u32, compatible: bool) {
        (**self).host_version_checked(host_version, compatible);
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn service_starting(&self, endpoint: &ServiceEndpoint) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "service_starting",
            endpoint = %endpoint,
            "starting command service"
        );
    }

    fn service_ready(&self, local_addr: SocketAddr) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "service_ready",
            %local_addr,
            "command service listening"
        );
    }

    fn service_failed(&self, error: &ServiceError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "service_failed",
            error = %error,
            "command service failed to start"
        );
    }

    fn service_stopped(&self, local_addr: SocketAddr) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "service_stopped",
            %local_addr,
            "command service stopped"
        );
    }

    fn host_version_checked(&self, host_version: u32, compatible: bool) {
        if compatible {
            tracing::info!(
                target: HEALTH_TARGET,
                event = "host_compatible",
                host_version,
                min_version = MIN_HOST_VERSION,
                "host version accepted"
            );
        } else {
            tracing::error!(
                target: HEALTH_TARGET,
                event = "host_incompatible",
                host_version,
                min_version = MIN_HOST_VERSION,
                "host version below supported floor; all operations will be rejected"
            );
        }
    }
}
