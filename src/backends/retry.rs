//! Declarative retry policy for backend fetch loops
//!
//! The policy is data, not control flow: a backend's loop asks the policy
//! how to react to a classified failure and tracks its budget separately.

use super::traits::FetchError;
use crate::config::PrimarySettings;
use std::time::Duration;

/// Retry policy for a backend
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts across the whole fetch, not per page
    pub max_attempts: u32,
    /// Cooldown after the provider throttles us
    pub throttle_cooldown: Duration,
    /// Cooldown after a transport failure
    pub transient_cooldown: Duration,
}

impl RetryPolicy {
    pub fn new(
        max_attempts: u32,
        throttle_cooldown: Duration,
        transient_cooldown: Duration,
    ) -> Self {
        Self {
            max_attempts,
            throttle_cooldown,
            transient_cooldown,
        }
    }

    pub fn from_settings(settings: &PrimarySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            throttle_cooldown: Duration::from_secs_f64(settings.throttle_cooldown_secs),
            transient_cooldown: Duration::from_secs_f64(settings.transient_cooldown_secs),
        }
    }

    /// Cooldown to apply before retrying this failure; None means abort
    pub fn cooldown_for(&self, err: &FetchError) -> Option<Duration> {
        match err {
            FetchError::Throttled => Some(self.throttle_cooldown),
            FetchError::Transport(_) => Some(self.transient_cooldown),
            _ => None,
        }
    }

    /// Start a fresh budget for one fetch
    pub fn budget(&self) -> RetryBudget {
        RetryBudget {
            remaining: self.max_attempts,
        }
    }
}

/// Remaining retry attempts for a single fetch
#[derive(Debug)]
pub struct RetryBudget {
    remaining: u32,
}

impl RetryBudget {
    /// Consume one attempt; returns false once the budget is exhausted
    pub fn consume(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining > 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> RetryPolicy {
        RetryPolicy::new(3, Duration::from_secs(5), Duration::from_secs(2))
    }

    #[test]
    fn test_budget_exhaustion() {
        let mut budget = policy().budget();
        assert!(budget.consume());
        assert!(budget.consume());
        assert!(!budget.consume());
        assert!(!budget.consume());
        assert_eq!(budget.remaining(), 0);
    }

    #[test]
    fn test_cooldown_selection() {
        let policy = policy();
        assert_eq!(
            policy.cooldown_for(&FetchError::Throttled),
            Some(Duration::from_secs(5))
        );
        assert_eq!(
            policy.cooldown_for(&FetchError::Transport(anyhow::anyhow!("io"))),
            Some(Duration::from_secs(2))
        );
        assert_eq!(policy.cooldown_for(&FetchError::AuthFailed), None);
        assert_eq!(policy.cooldown_for(&FetchError::HttpStatus(503)), None);
        assert_eq!(
            policy.cooldown_for(&FetchError::Provider("bad key".into())),
            None
        );
    }

    #[test]
    fn test_from_settings() {
        let settings = PrimarySettings::default();
        let policy = RetryPolicy::from_settings(&settings);
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.throttle_cooldown, Duration::from_secs(5));
        assert_eq!(policy.transient_cooldown, Duration::from_secs(2));
    }
}
