//! Periodic trigger registrations and retry backoff.
//!
//! The host's periodic facility only promises "at least every N minutes".
//! Registrations are keyed so asking twice never produces two schedules.

use std::collections::HashMap;
use std::time::Duration;

use crate::error::ConfigError;

/// Shortest interval a periodic trigger may be registered with.
pub const MIN_PERIODIC_INTERVAL_MINUTES: u64 = 15;

/// Key the sync worker registers its periodic pass under.
pub const WIDGET_SYNC_KEY: &str = "widget_sync";

/// A keyed periodic trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodicRegistration {
    pub key: String,
    pub interval: Duration,
}

impl PeriodicRegistration {
    pub fn new(key: impl Into<String>, interval_minutes: u64) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "periodic registration key must not be empty".to_string(),
            ));
        }
        if interval_minutes < MIN_PERIODIC_INTERVAL_MINUTES {
            return Err(ConfigError::Invalid(format!(
                "periodic interval must be at least {MIN_PERIODIC_INTERVAL_MINUTES} minutes, got {interval_minutes}"
            )));
        }
        Ok(Self {
            key,
            interval: Duration::from_secs(interval_minutes * 60),
        })
    }
}

/// What a registration call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Created,
    /// Same key and interval already registered
    Unchanged,
    /// Same key, interval replaced
    Updated,
}

/// Idempotent in-process registry of periodic triggers.
#[derive(Debug, Default)]
pub struct ScheduleRegistry {
    registrations: HashMap<String, PeriodicRegistration>,
}

impl ScheduleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or refresh a keyed schedule. Re-registering a key replaces it.
    pub fn register_periodic(&mut self, registration: PeriodicRegistration) -> RegistrationOutcome {
        match self.registrations.get(&registration.key) {
            Some(existing) if existing.interval == registration.interval => {
                RegistrationOutcome::Unchanged
            }
            Some(_) => {
                tracing::info!(
                    key = %registration.key,
                    interval = ?registration.interval,
                    "Replacing periodic registration"
                );
                self.registrations
                    .insert(registration.key.clone(), registration);
                RegistrationOutcome::Updated
            }
            None => {
                tracing::info!(
                    key = %registration.key,
                    interval = ?registration.interval,
                    "Registered periodic trigger"
                );
                self.registrations
                    .insert(registration.key.clone(), registration);
                RegistrationOutcome::Created
            }
        }
    }

    pub fn cancel(&mut self, key: &str) -> bool {
        self.registrations.remove(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&PeriodicRegistration> {
        self.registrations.get(key)
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

/// Exponential backoff applied by the host after a failed pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first failure; 0 disables retrying
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(30),
            max_backoff: Duration::from_secs(3_600),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (0-based), or `None` once the
    /// attempts are used up.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }
        let factor = 2_u32.checked_pow(attempt).unwrap_or(u32::MAX);
        let delay = self
            .initial_backoff
            .checked_mul(factor)
            .unwrap_or(self.max_backoff);
        Some(delay.min(self.max_backoff))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_intervals_below_minimum() {
        assert!(PeriodicRegistration::new(WIDGET_SYNC_KEY, 14).is_err());
        assert!(PeriodicRegistration::new("", 15).is_err());
        assert!(PeriodicRegistration::new(WIDGET_SYNC_KEY, 15).is_ok());
    }

    #[test]
    fn registration_is_idempotent_per_key() {
        let mut registry = ScheduleRegistry::new();
        let registration = PeriodicRegistration::new(WIDGET_SYNC_KEY, 15).unwrap();

        assert_eq!(
            registry.register_periodic(registration.clone()),
            RegistrationOutcome::Created
        );
        assert_eq!(
            registry.register_periodic(registration),
            RegistrationOutcome::Unchanged
        );
        assert_eq!(registry.len(), 1);

        let slower = PeriodicRegistration::new(WIDGET_SYNC_KEY, 30).unwrap();
        assert_eq!(
            registry.register_periodic(slower),
            RegistrationOutcome::Updated
        );
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get(WIDGET_SYNC_KEY).map(|r| r.interval),
            Some(Duration::from_secs(30 * 60))
        );

        assert!(registry.cancel(WIDGET_SYNC_KEY));
        assert!(registry.is_empty());
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 5,
            initial_backoff: Duration::from_secs(30),
            max_backoff: Duration::from_secs(100),
        };

        assert_eq!(policy.delay_for(0), Some(Duration::from_secs(30)));
        assert_eq!(policy.delay_for(1), Some(Duration::from_secs(60)));
        assert_eq!(policy.delay_for(2), Some(Duration::from_secs(100)));
        assert_eq!(policy.delay_for(4), Some(Duration::from_secs(100)));
        assert_eq!(policy.delay_for(5), None);
    }

    #[test]
    fn zero_attempts_never_retries() {
        let policy = RetryPolicy {
            max_attempts: 0,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.delay_for(0), None);
    }
}
