//! Client-side connection settings and configuration loading.

use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use cadbridge_config::{Config, ServiceEndpoint, telemetry};

use crate::errors::AppError;
use crate::retry::RetryPolicy;

const BINARY_NAME: &str = "cadbridge";

/// Loads the shared bridge configuration for the command-line client.
pub(crate) trait ConfigLoader {
    /// Loads configuration from the environment and configuration files.
    ///
    /// Command-line overrides are applied by the caller, so only the binary
    /// name reaches `ortho_config`.
    fn load(&self) -> Result<Config, AppError>;
}

/// Production loader backed by `ortho_config`.
///
/// Installs the stderr log subscriber from the loaded `CW_LOG_FILTER` and
/// `CW_LOG_FORMAT` before handing the configuration back.
pub(crate) struct OrthoConfigLoader;

impl ConfigLoader for OrthoConfigLoader {
    fn load(&self) -> Result<Config, AppError> {
        let config =
            Config::load_from_iter([BINARY_NAME]).map_err(AppError::LoadConfiguration)?;
        telemetry::initialise(&config).map_err(AppError::Telemetry)?;
        Ok(config)
    }
}

/// Send/receive timeout applied to each attempt.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the bridge lives and how long to wait for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// Command service address.
    pub address: SocketAddr,
    /// Connect, write and read timeout for one attempt.
    pub timeout: Duration,
    /// Retry policy for transient failures.
    pub retry: RetryPolicy,
}

impl ClientConfig {
    /// Targets `port` on the IPv4 loopback interface with default settings.
    #[must_use]
    pub fn loopback(port: u16) -> Self {
        Self::new(SocketAddr::from((Ipv4Addr::LOCALHOST, port)))
    }

    /// Targets `address` with default timeout and retry policy.
    #[must_use]
    pub fn new(address: SocketAddr) -> Self {
        Self {
            address,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }

    /// Resolves a configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns the resolver error when the host name cannot be resolved.
    pub fn from_endpoint(endpoint: &ServiceEndpoint) -> io::Result<Self> {
        endpoint.resolve().map(Self::new)
    }

    /// Replaces the per-attempt timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replaces the retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}
