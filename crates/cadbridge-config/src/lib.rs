//! Shared configuration for the command bridge.
//!
//! Both the in-host command service and the outer bridge client resolve the
//! same loopback endpoint from this crate. Values are layered by
//! `ortho_config`: defaults, an optional configuration file, `CW_*`
//! environment variables, then command-line flags. The only override the
//! bridge documents for operators is `CW_PORT`; logging knobs exist for the
//! binaries.

use std::ffi::OsString;
use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use serde::{Deserialize, Serialize};

mod defaults;
mod endpoint;
mod logging;
pub mod telemetry;

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_PORT, LOOPBACK_HOST, default_endpoint, default_log_format,
};
pub use endpoint::ServiceEndpoint;
pub use logging::{LogFormat, LogFormatParseError};
pub use telemetry::{TelemetryError, TelemetryHandle};

/// Resolved bridge configuration.
///
/// Every field is optional so that unset layers fall through to the
/// defaults exposed by the accessor methods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "CW_")]
pub struct Config {
    /// Loopback TCP port served by the command service.
    pub port: Option<u16>,
    /// `tracing` filter expression for the binaries.
    pub log_filter: Option<String>,
    /// Output format for structured logs.
    pub log_format: Option<LogFormat>,
}

impl Config {
    /// Loads configuration from the process arguments and environment.
    pub fn load() -> Result<Self, Arc<OrthoError>> {
        Self::load_from_iter(std::env::args_os())
    }

    /// Loads configuration from an explicit argument list.
    ///
    /// The first item is treated as the binary name, mirroring
    /// `std::env::args_os`.
    pub fn load_from_iter<I, T>(args: I) -> Result<Self, Arc<OrthoError>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as OrthoConfig>::load_from_iter(args)
    }

    /// Port the command service binds on the loopback interface.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Loopback endpoint derived from [`Config::port`].
    #[must_use]
    pub fn endpoint(&self) -> ServiceEndpoint {
        default_endpoint().with_port(self.port())
    }

    /// Filter expression used when installing the log subscriber.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    /// Log output format.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format.unwrap_or_else(default_log_format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::default();
        assert_eq!(config.port(), 53002);
        assert_eq!(config.log_filter(), "info");
        assert_eq!(config.log_format(), LogFormat::Json);
        assert_eq!(config.endpoint().to_string(), "tcp://127.0.0.1:53002");
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = Config {
            port: Some(6000),
            log_filter: Some("debug".to_owned()),
            log_format: Some(LogFormat::Compact),
        };
        assert_eq!(config.port(), 6000);
        assert_eq!(config.log_filter(), "debug");
        assert_eq!(config.log_format(), LogFormat::Compact);
    }
}
