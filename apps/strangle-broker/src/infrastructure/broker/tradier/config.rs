//! Tradier adapter configuration.

use std::time::Duration;

use crate::domain::order::ProfitTarget;

/// Default HTTP request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default `X-Ratelimit-Available` value below which a warning is logged.
pub const DEFAULT_RATE_LIMIT_WARN_THRESHOLD: u32 = 10;

/// Environment for the Tradier API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TradierEnvironment {
    /// Sandbox (delayed data, simulated fills).
    #[default]
    Sandbox,
    /// Live brokerage.
    Live,
}

impl TradierEnvironment {
    /// Get the API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &'static str {
        match self {
            Self::Sandbox => "https://sandbox.tradier.com/v1",
            Self::Live => "https://api.tradier.com/v1",
        }
    }

    /// Check if this is live trading.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self, Self::Live)
    }
}

impl std::fmt::Display for TradierEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sandbox => write!(f, "SANDBOX"),
            Self::Live => write!(f, "LIVE"),
        }
    }
}

/// Configuration for the Tradier broker adapter.
#[derive(Debug, Clone)]
pub struct TradierConfig {
    /// Bearer access token.
    pub access_token: String,
    /// Brokerage account id.
    pub account_id: String,
    /// Trading environment.
    pub environment: TradierEnvironment,
    /// Overrides the environment's base URL when set.
    pub base_url: Option<String>,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// Submit strangles as OTOCO with an automatic profit-taking exit.
    pub use_otoco: bool,
    /// Profit target for the OTOCO exit.
    pub profit_target: ProfitTarget,
    /// Accept lowercase `p`/`c` in OCC symbols read back from the broker.
    pub accept_lowercase_option_type: bool,
    /// Warn when `X-Ratelimit-Available` drops below this value.
    pub rate_limit_warn_threshold: u32,
}

impl TradierConfig {
    /// Create a new configuration with defaults: 30s timeout, OTOCO off,
    /// 50% profit target, strict symbol decoding.
    #[must_use]
    pub fn new(
        access_token: impl Into<String>,
        account_id: impl Into<String>,
        environment: TradierEnvironment,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            account_id: account_id.into(),
            environment,
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            use_otoco: false,
            profit_target: ProfitTarget::DEFAULT,
            accept_lowercase_option_type: false,
            rate_limit_warn_threshold: DEFAULT_RATE_LIMIT_WARN_THRESHOLD,
        }
    }

    /// Point the client at a different base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the HTTP timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable OTOCO submission with the given profit target.
    #[must_use]
    pub const fn with_otoco(mut self, profit_target: ProfitTarget) -> Self {
        self.use_otoco = true;
        self.profit_target = profit_target;
        self
    }

    /// Set the lowercase option-type decoding policy.
    #[must_use]
    pub const fn with_lowercase_option_type(mut self, accept: bool) -> Self {
        self.accept_lowercase_option_type = accept;
        self
    }

    /// Set the rate-limit warning threshold.
    #[must_use]
    pub const fn with_rate_limit_warn_threshold(mut self, threshold: u32) -> Self {
        self.rate_limit_warn_threshold = threshold;
        self
    }

    /// Effective base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
            .trim_end_matches('/')
    }

    /// Profit target when OTOCO is enabled.
    #[must_use]
    pub const fn otoco_target(&self) -> Option<ProfitTarget> {
        if self.use_otoco {
            Some(self.profit_target)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_urls() {
        assert_eq!(
            TradierEnvironment::Sandbox.base_url(),
            "https://sandbox.tradier.com/v1"
        );
        assert_eq!(
            TradierEnvironment::Live.base_url(),
            "https://api.tradier.com/v1"
        );
        assert!(TradierEnvironment::Live.is_live());
        assert!(!TradierEnvironment::Sandbox.is_live());
        assert_eq!(TradierEnvironment::Live.to_string(), "LIVE");
    }

    #[test]
    fn defaults() {
        let config = TradierConfig::new("token", "VA000001", TradierEnvironment::Sandbox);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(!config.use_otoco);
        assert!(config.otoco_target().is_none());
        assert!(!config.accept_lowercase_option_type);
        assert_eq!(config.base_url(), "https://sandbox.tradier.com/v1");
    }

    #[test]
    fn base_url_override_strips_trailing_slash() {
        let config = TradierConfig::new("token", "VA000001", TradierEnvironment::Live)
            .with_base_url("http://127.0.0.1:8080/");
        assert_eq!(config.base_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn otoco_builder() {
        let target = ProfitTarget::new(0.6).unwrap();
        let config =
            TradierConfig::new("token", "VA000001", TradierEnvironment::Sandbox).with_otoco(target);
        assert_eq!(config.otoco_target(), Some(target));
    }
}
