use crate::endpoint::ServiceEndpoint;
use crate::logging::LogFormat;

/// Port the command service listens on when `CW_PORT` is unset.
pub const DEFAULT_PORT: u16 = 53002;

/// The command service only ever binds the IPv4 loopback interface.
pub const LOOPBACK_HOST: &str = "127.0.0.1";

/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default logging format for the binaries.
#[must_use]
pub fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Loopback endpoint on [`DEFAULT_PORT`].
#[must_use]
pub fn default_endpoint() -> ServiceEndpoint {
    ServiceEndpoint::loopback(DEFAULT_PORT)
}
