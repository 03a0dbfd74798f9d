//! Configuration loading, validation and environment variable interpolation.
//!
//! # Usage
//!
//! ```rust,ignore
//! use strangle_broker::config::{load_config, build_broker};
//!
//! let config = load_config(Some("config.yaml"))?;
//! let broker = build_broker(&config)?;
//! ```

mod broker;
mod circuit_breaker;
mod observability;

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use broker::{BrokersConfig, TradierSettings};
pub use circuit_breaker::{CircuitBreakerConfig, CircuitBreakerSettings};
pub use observability::{LogFormat, LoggingConfig, ObservabilityConfig};

use crate::infrastructure::broker::{CircuitBreakerBroker, TradierBrokerAdapter, TradierError};

/// Name given to the Tradier circuit breaker.
pub const TRADIER_BREAKER_NAME: &str = "tradier";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),

    /// The broker adapter could not be built.
    #[error("Failed to build broker: {0}")]
    Broker(#[from] TradierError),
}

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Broker configuration.
    #[serde(default)]
    pub brokers: BrokersConfig,
    /// Circuit breaker configuration.
    #[serde(default)]
    pub circuit_breaker: CircuitBreakerConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or("config.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Build the Tradier adapter wrapped in its circuit breaker.
///
/// Credentials are checked here rather than at load time, so a config
/// without them can still drive logging setup.
pub fn build_broker(
    config: &Config,
) -> Result<CircuitBreakerBroker<TradierBrokerAdapter>, ConfigError> {
    let tradier = config
        .brokers
        .tradier
        .to_tradier_config()
        .map_err(ConfigError::ValidationError)?;

    tracing::info!(
        environment = %tradier.environment,
        base_url = %tradier.base_url(),
        use_otoco = tradier.use_otoco,
        "Building Tradier broker"
    );

    let adapter = TradierBrokerAdapter::new(tradier)?;
    Ok(CircuitBreakerBroker::new(
        adapter,
        TRADIER_BREAKER_NAME,
        config.circuit_breaker.tradier_config(),
    ))
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}`. Unset or empty variables
/// take the default, or the empty string without one.
#[allow(clippy::expect_used)] // pattern is a literal
fn interpolate_env_vars(input: &str) -> String {
    static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var pattern is valid")
    });

    ENV_VAR
        .replace_all(input, |caps: &Captures<'_>| {
            let default = caps.get(2).map_or("", |m| m.as_str());
            match std::env::var(&caps[1]) {
                Ok(value) if !value.is_empty() => value,
                _ => default.to_string(),
            }
        })
        .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    config
        .brokers
        .tradier
        .validate()
        .map_err(ConfigError::ValidationError)?;

    config
        .circuit_breaker
        .default
        .validate()
        .map_err(|e| ConfigError::ValidationError(format!("circuit_breaker.default: {e}")))?;
    if let Some(tradier) = &config.circuit_breaker.tradier {
        tradier
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("circuit_breaker.tradier: {e}")))?;
    }

    if config.observability.logging.level.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "observability.logging.level must not be empty".to_string(),
        ));
    }

    Ok(())
}
