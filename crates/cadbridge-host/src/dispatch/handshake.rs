//! Host version gate applied before any operation runs.

use cadbridge_protocol::{MIN_HOST_VERSION, is_compatible};

use super::errors::DispatchError;

/// Outcome of comparing the host version with the supported floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HostCompatibility {
    host_version: u32,
}

impl HostCompatibility {
    pub(crate) const fn new(host_version: u32) -> Self {
        Self { host_version }
    }

    pub(crate) const fn host_version(self) -> u32 {
        self.host_version
    }

    pub(crate) const fn is_compatible(self) -> bool {
        is_compatible(self.host_version)
    }

    /// Rejects every operation, `get_version_info` included, on an old host.
    pub(crate) fn check(self) -> Result<(), DispatchError> {
        if self.is_compatible() {
            return Ok(());
        }
        Err(DispatchError::IncompatibleHost {
            host_version: self.host_version,
            min_version: MIN_HOST_VERSION,
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(MIN_HOST_VERSION, true)]
    #[case(MIN_HOST_VERSION + 4, true)]
    #[case(MIN_HOST_VERSION - 1, false)]
    #[case(0, false)]
    fn gate_follows_the_floor(#[case] host_version: u32, #[case] accepted: bool) {
        assert_eq!(HostCompatibility::new(host_version).check().is_ok(), accepted);
    }

    #[test]
    fn rejection_names_both_versions() {
        let message = HostCompatibility::new(27)
            .check()
            .expect_err("old host")
            .to_string();
        assert!(message.contains("27"), "{message}");
        assert!(message.contains(&MIN_HOST_VERSION.to_string()), "{message}");
    }
}
