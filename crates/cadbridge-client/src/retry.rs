//! Bounded retry policy for transient transport failures.

use std::io;
use std::time::Duration;

/// Attempts made by [`RetryPolicy::default`].
pub const DEFAULT_ATTEMPTS: u32 = 3;

/// Backoff step used by [`RetryPolicy::default`].
pub const DEFAULT_RETRY_STEP: Duration = Duration::from_millis(250);

/// How often, and how patiently, a request is retried.
///
/// Attempt `n` (1-based) waits `step * (n - 1)` before connecting, so the
/// first attempt is immediate and later attempts back off linearly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    step: Duration,
}

impl RetryPolicy {
    /// Builds a policy. `attempts` is clamped to at least one.
    #[must_use]
    pub const fn new(attempts: u32, step: Duration) -> Self {
        let attempts = if attempts == 0 { 1 } else { attempts };
        Self { attempts, step }
    }

    /// A policy that never retries.
    #[must_use]
    pub const fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Total number of attempts, including the first.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Linear backoff increment.
    #[must_use]
    pub const fn step(&self) -> Duration {
        self.step
    }

    /// Delay to wait before `attempt` (1-based).
    #[must_use]
    pub fn delay_before(&self, attempt: u32) -> Duration {
        self.step.saturating_mul(attempt.saturating_sub(1))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ATTEMPTS, DEFAULT_RETRY_STEP)
    }
}

/// Whether an I/O failure means the bridge is not reachable yet.
///
/// Covers a service that is not listening and an exchange that timed out.
pub(crate) fn is_transient(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::AddrNotAvailable
            | io::ErrorKind::NotFound
            | io::ErrorKind::TimedOut
            | io::ErrorKind::WouldBlock
    )
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(1, 0)]
    #[case(2, 250)]
    #[case(3, 500)]
    fn backs_off_linearly(#[case] attempt: u32, #[case] millis: u64) {
        assert_eq!(
            RetryPolicy::default().delay_before(attempt),
            Duration::from_millis(millis)
        );
    }

    #[test]
    fn default_policy_uses_documented_constants() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts(), DEFAULT_ATTEMPTS);
        assert_eq!(policy.step(), DEFAULT_RETRY_STEP);
        assert_eq!(RetryPolicy::once().delay_before(2), Duration::ZERO);
    }

    #[test]
    fn zero_attempts_still_tries_once() {
        assert_eq!(RetryPolicy::new(0, DEFAULT_RETRY_STEP).attempts(), 1);
    }

    #[rstest]
    #[case(io::ErrorKind::ConnectionRefused, true)]
    #[case(io::ErrorKind::TimedOut, true)]
    #[case(io::ErrorKind::WouldBlock, true)]
    #[case(io::ErrorKind::ConnectionReset, false)]
    #[case(io::ErrorKind::PermissionDenied, false)]
    fn classifies_transient_failures(#[case] kind: io::ErrorKind, #[case] expected: bool) {
        assert_eq!(is_transient(&io::Error::from(kind)), expected);
    }
}
