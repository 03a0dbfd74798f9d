//! Broker configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::order::ProfitTarget;
use crate::infrastructure::broker::tradier::{
    DEFAULT_RATE_LIMIT_WARN_THRESHOLD, DEFAULT_TIMEOUT, TradierConfig, TradierEnvironment,
};

/// Broker configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BrokersConfig {
    /// Tradier broker configuration.
    #[serde(default)]
    pub tradier: TradierSettings,
}

/// Tradier broker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradierSettings {
    /// Bearer access token.
    #[serde(default)]
    pub access_token: String,
    /// Brokerage account id.
    #[serde(default)]
    pub account_id: String,
    /// "sandbox" or "live".
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Overrides the environment's base URL.
    #[serde(default)]
    pub base_url: Option<String>,
    /// HTTP timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Submit strangles as OTOCO with a profit-taking exit.
    #[serde(default)]
    pub use_otoco: bool,
    /// Fraction of the credit captured by the OTOCO exit.
    #[serde(default = "default_profit_target")]
    pub profit_target: f64,
    /// Accept lowercase `p`/`c` in OCC symbols.
    #[serde(default)]
    pub accept_lowercase_option_type: bool,
    /// Warn when `X-Ratelimit-Available` drops below this.
    #[serde(default = "default_rate_limit_warn_threshold")]
    pub rate_limit_warn_threshold: u32,
}

impl Default for TradierSettings {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            account_id: String::new(),
            environment: default_environment(),
            base_url: None,
            timeout_secs: default_timeout(),
            use_otoco: false,
            profit_target: default_profit_target(),
            accept_lowercase_option_type: false,
            rate_limit_warn_threshold: default_rate_limit_warn_threshold(),
        }
    }
}

impl TradierSettings {
    /// Parse the environment name.
    pub fn parse_environment(&self) -> Result<TradierEnvironment, String> {
        match self.environment.trim().to_ascii_lowercase().as_str() {
            "sandbox" | "paper" => Ok(TradierEnvironment::Sandbox),
            "live" | "production" => Ok(TradierEnvironment::Live),
            other => Err(format!(
                "tradier.environment must be 'sandbox' or 'live', got '{other}'"
            )),
        }
    }

    /// Check values that do not depend on credentials.
    pub(crate) fn validate(&self) -> Result<(), String> {
        self.parse_environment()?;
        if self.timeout_secs == 0 {
            return Err("tradier.timeout_secs must be positive".to_string());
        }
        ProfitTarget::new(self.profit_target).map_err(|e| format!("tradier.profit_target: {e}"))?;
        Ok(())
    }

    /// Build the adapter configuration.
    pub fn to_tradier_config(&self) -> Result<TradierConfig, String> {
        let environment = self.parse_environment()?;
        let profit_target =
            ProfitTarget::new(self.profit_target).map_err(|e| format!("tradier.profit_target: {e}"))?;

        let mut config = TradierConfig::new(
            self.access_token.trim(),
            self.account_id.trim(),
            environment,
        )
        .with_timeout(Duration::from_secs(self.timeout_secs))
        .with_lowercase_option_type(self.accept_lowercase_option_type)
        .with_rate_limit_warn_threshold(self.rate_limit_warn_threshold);

        config.profit_target = profit_target;
        if self.use_otoco {
            config = config.with_otoco(profit_target);
        }
        if let Some(base_url) = self.base_url.as_deref().filter(|u| !u.trim().is_empty()) {
            config = config.with_base_url(base_url.trim());
        }
        Ok(config)
    }
}

fn default_environment() -> String {
    "sandbox".to_string()
}

const fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

const fn default_profit_target() -> f64 {
    0.5
}

const fn default_rate_limit_warn_threshold() -> u32 {
    DEFAULT_RATE_LIMIT_WARN_THRESHOLD
}
