//! Exponential backoff policy for the connection handshake.

/// Immutable retry configuration: `max_attempts` automatic retries with doubling delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay_ms: u64,
}

impl RetryPolicy {
    /// Creates a policy.
    pub const fn new(max_attempts: u32, base_delay_ms: u64) -> Self {
        Self {
            max_attempts,
            base_delay_ms,
        }
    }

    /// Upper bound for the retry counter.
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay unit the backoff doubles from.
    pub const fn base_delay_ms(&self) -> u64 {
        self.base_delay_ms
    }

    /// Delay before retry number `attempt`: `base_delay_ms * 2^attempt`, saturating.
    pub fn delay_for_attempt(&self, attempt: u32) -> u64 {
        let multiplier = 1_u64.checked_shl(attempt).unwrap_or(u64::MAX);
        self.base_delay_ms.saturating_mul(multiplier)
    }

    /// Whether another automatic retry may be scheduled at `retry_count`.
    pub const fn allows_retry(&self, retry_count: u32) -> bool {
        retry_count < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, 1_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_attempt_uses_base_delay() {
        let policy = RetryPolicy::new(3, 250);
        assert_eq!(policy.delay_for_attempt(0), 250);
    }

    #[test]
    fn scales_exponentially_for_attempts() {
        let policy = RetryPolicy::new(5, 100);
        assert_eq!(policy.delay_for_attempt(1), 200);
        assert_eq!(policy.delay_for_attempt(3), 800);
    }

    #[test]
    fn saturates_instead_of_overflowing() {
        let policy = RetryPolicy::new(10, 10_000);
        assert_eq!(policy.delay_for_attempt(64), u64::MAX);
        assert_eq!(policy.delay_for_attempt(62), u64::MAX);
    }

    #[test]
    fn stops_allowing_retries_at_max() {
        let policy = RetryPolicy::new(3, 1_000);
        assert!(policy.allows_retry(2));
        assert!(!policy.allows_retry(3));
        assert!(!RetryPolicy::new(0, 1_000).allows_retry(0));
    }
}
