//! Circuit breaker configuration for the broker decorator.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Circuit breaker configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CircuitBreakerConfig {
    /// Default circuit breaker settings.
    #[serde(default)]
    pub default: CircuitBreakerSettings,
    /// Tradier-specific overrides.
    #[serde(default)]
    pub tradier: Option<CircuitBreakerSettings>,
}

/// Circuit breaker settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitBreakerSettings {
    /// Failure ratio that opens the circuit.
    #[serde(default = "default_failure_ratio_threshold")]
    pub failure_ratio_threshold: f64,
    /// Requests in the interval before the ratio is evaluated.
    #[serde(default = "default_minimum_requests")]
    pub minimum_requests: u32,
    /// Closed-state counting interval (seconds, 0 = never reset).
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
    /// Duration in open state (seconds).
    #[serde(default = "default_open_timeout")]
    pub open_timeout_secs: u64,
    /// Trial calls permitted in half-open state.
    #[serde(default = "default_half_open_max_calls")]
    pub half_open_max_calls: u32,
}

impl Default for CircuitBreakerSettings {
    fn default() -> Self {
        Self {
            failure_ratio_threshold: default_failure_ratio_threshold(),
            minimum_requests: default_minimum_requests(),
            interval_secs: default_interval(),
            open_timeout_secs: default_open_timeout(),
            half_open_max_calls: default_half_open_max_calls(),
        }
    }
}

impl CircuitBreakerSettings {
    /// Convert to the resilience module's `CircuitBreakerConfig`.
    #[must_use]
    pub const fn to_resilience_config(&self) -> crate::resilience::CircuitBreakerConfig {
        crate::resilience::CircuitBreakerConfig {
            failure_ratio_threshold: self.failure_ratio_threshold,
            minimum_requests: self.minimum_requests,
            interval: Duration::from_secs(self.interval_secs),
            open_timeout: Duration::from_secs(self.open_timeout_secs),
            half_open_max_calls: self.half_open_max_calls,
        }
    }

    /// Check ranges. Returns a message for the first bad value.
    pub(crate) fn validate(&self) -> Result<(), String> {
        let ratio = self.failure_ratio_threshold;
        if !ratio.is_finite() || ratio <= 0.0 || ratio > 1.0 {
            return Err(format!(
                "failure_ratio_threshold must be in (0.0, 1.0], got {ratio}"
            ));
        }
        if self.minimum_requests == 0 {
            return Err("minimum_requests must be at least 1".to_string());
        }
        if self.half_open_max_calls == 0 {
            return Err("half_open_max_calls must be at least 1".to_string());
        }
        Ok(())
    }
}

impl CircuitBreakerConfig {
    /// Get the breaker config for Tradier, falling back to defaults.
    #[must_use]
    pub fn tradier_config(&self) -> crate::resilience::CircuitBreakerConfig {
        self.tradier.as_ref().map_or_else(
            || self.default.to_resilience_config(),
            CircuitBreakerSettings::to_resilience_config,
        )
    }
}

const fn default_failure_ratio_threshold() -> f64 {
    0.6
}

const fn default_minimum_requests() -> u32 {
    5
}

const fn default_interval() -> u64 {
    60
}

const fn default_open_timeout() -> u64 {
    30
}

const fn default_half_open_max_calls() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_runtime_defaults() {
        assert_eq!(
            CircuitBreakerSettings::default().to_resilience_config(),
            crate::resilience::CircuitBreakerConfig::default()
        );
    }

    #[test]
    fn tradier_override_wins() {
        let config = CircuitBreakerConfig {
            default: CircuitBreakerSettings::default(),
            tradier: Some(CircuitBreakerSettings {
                open_timeout_secs: 5,
                ..CircuitBreakerSettings::default()
            }),
        };
        assert_eq!(
            config.tradier_config().open_timeout,
            Duration::from_secs(5)
        );
    }

    #[test]
    fn validate_ranges() {
        assert!(CircuitBreakerSettings::default().validate().is_ok());
        let bad = CircuitBreakerSettings {
            failure_ratio_threshold: 1.5,
            ..CircuitBreakerSettings::default()
        };
        assert!(bad.validate().is_err());
        let bad = CircuitBreakerSettings {
            half_open_max_calls: 0,
            ..CircuitBreakerSettings::default()
        };
        assert!(bad.validate().is_err());
    }
}
