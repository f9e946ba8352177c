use std::time::Duration;

use rand::Rng;

use crate::settings::OracleSettings;

/// Retry schedule for oracle calls: `base * 2^n` plus random jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_jitter: Duration::from_secs(1),
        }
    }
}

impl From<&OracleSettings> for RetryPolicy {
    fn from(settings: &OracleSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            base_delay: Duration::from_millis(settings.backoff_base_ms),
            max_jitter: Duration::from_millis(settings.backoff_jitter_ms),
        }
    }
}

impl RetryPolicy {
    /// Delay before retrying after the zero-based `attempt` failed, without jitter.
    pub fn base_delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.min(16)).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        let jitter_ms = self.max_jitter.as_millis() as u64;
        let jitter = if jitter_ms == 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_ms))
        };
        self.base_delay_for(attempt) + jitter
    }

    /// Longest time a single escalation can spend sleeping between attempts.
    pub fn worst_case_wait(&self) -> Duration {
        (0..self.max_attempts.saturating_sub(1))
            .map(|attempt| self.base_delay_for(attempt) + self.max_jitter)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_double_per_attempt() {
        let policy = RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
            max_jitter: Duration::ZERO,
        };
        assert_eq!(policy.delay_for(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for(2), Duration::from_millis(400));
    }

    #[test]
    fn jitter_stays_within_bound() {
        let policy = RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(10),
            max_jitter: Duration::from_millis(5),
        };
        for _ in 0..50 {
            let delay = policy.delay_for(1);
            assert!(delay >= Duration::from_millis(20));
            assert!(delay <= Duration::from_millis(25));
        }
    }

    #[test]
    fn worst_case_wait_is_bounded() {
        let policy = RetryPolicy::default();
        // Two sleeps between three attempts: (1s + 1s) + (2s + 1s).
        assert_eq!(policy.worst_case_wait(), Duration::from_secs(5));
    }

    #[test]
    fn settings_never_allow_zero_attempts() {
        let settings = OracleSettings {
            max_attempts: 0,
            ..OracleSettings::default()
        };
        assert_eq!(RetryPolicy::from(&settings).max_attempts, 1);
    }
}
