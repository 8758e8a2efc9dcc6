//! Version handshake payload.

use serde::{Deserialize, Serialize};

/// Oldest host API level the bridge accepts.
pub const MIN_HOST_VERSION: u32 = 30;

/// Version of this protocol crate, reported as the bridge version.
pub const BRIDGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Versions reported by `get_version_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Major API level of the running host application.
    pub host_version: u32,
    /// Version of the bridge protocol implementation.
    pub bridge_version: String,
}

impl VersionInfo {
    /// Pairs a host version with this crate's bridge version.
    #[must_use]
    pub fn current(host_version: u32) -> Self {
        Self {
            host_version,
            bridge_version: BRIDGE_VERSION.to_owned(),
        }
    }

    /// Whether the host meets [`MIN_HOST_VERSION`].
    #[must_use]
    pub const fn is_compatible(&self) -> bool {
        is_compatible(self.host_version)
    }
}

/// Whether `host_version` meets [`MIN_HOST_VERSION`].
#[must_use]
pub const fn is_compatible(host_version: u32) -> bool {
    host_version >= MIN_HOST_VERSION
}
