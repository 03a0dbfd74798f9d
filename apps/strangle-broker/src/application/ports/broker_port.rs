//! Broker Port (Driven Port)
//!
//! Capability contract for account, market data and option order operations.
//! Every call takes a [`CancellationToken`]; cancelling it aborts the
//! in-flight request and the call returns [`BrokerError::Cancelled`].

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use tokio_util::sync::CancellationToken;

use crate::application::dto::{
    AccountBalances, CalendarDay, Expiration, HistoricalBar, HistoryInterval, MarketClock,
    OrderResult, Quote,
};
use crate::domain::option_contract::OptionContract;
use crate::domain::order::{
    CloseOrderParams, StrangleCloseParams, StrangleOrderParams, ValidationError,
};
use crate::domain::strangle::Position;

/// HTTP status the broker uses for unimplemented features.
pub const STATUS_NOT_IMPLEMENTED: u16 = 501;

/// Broker port error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BrokerError {
    /// Caller input rejected before any network call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Non-2xx response.
    #[error("Broker API error {status}: {body}")]
    Api {
        /// HTTP status.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The broker does not support the requested feature.
    #[error("Feature not supported by broker: {feature}")]
    FeatureUnsupported {
        /// Feature name.
        feature: String,
    },

    /// The circuit breaker rejected the call without reaching the broker.
    #[error("Circuit breaker '{name}' is open")]
    CircuitOpen {
        /// Breaker name.
        name: String,
    },

    /// The broker answered but the requested item was absent.
    #[error("Not found: {what}")]
    NotFound {
        /// What was looked up.
        what: String,
    },

    /// Connection-level failure.
    #[error("Broker transport error: {message}")]
    Transport {
        /// Error details.
        message: String,
    },

    /// Request exceeded the HTTP timeout.
    #[error("Broker request timed out")]
    Timeout,

    /// The caller cancelled the request.
    #[error("Broker request cancelled")]
    Cancelled,

    /// Unexpected response shape or other internal failure.
    #[error("Internal broker client error: {message}")]
    Internal {
        /// Error details.
        message: String,
    },
}

impl BrokerError {
    /// Returns true for errors that may succeed on a later attempt:
    /// 429, 5xx (except 501), transport failures and timeouts.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Api { status, .. } => {
                *status == 429 || (*status >= 500 && *status != STATUS_NOT_IMPLEMENTED)
            }
            Self::Transport { .. } | Self::Timeout => true,
            _ => false,
        }
    }

    /// Returns true for the unsupported-feature signal: the sentinel variant
    /// or an HTTP 501.
    #[must_use]
    pub const fn is_feature_unsupported(&self) -> bool {
        matches!(
            self,
            Self::FeatureUnsupported { .. }
                | Self::Api {
                    status: STATUS_NOT_IMPLEMENTED,
                    ..
                }
        )
    }

    /// Returns true if this outcome should count against broker health.
    ///
    /// Caller mistakes, cancellations, permanent rejections and
    /// unsupported-feature signals say nothing about broker health.
    #[must_use]
    pub const fn counts_as_failure(&self) -> bool {
        self.is_transient() || matches!(self, Self::Internal { .. })
    }
}

/// Port for broker interactions.
#[async_trait]
pub trait BrokerPort: Send + Sync {
    /// Get account balances and buying power.
    async fn get_balances(&self, cancel: &CancellationToken)
    -> Result<AccountBalances, BrokerError>;

    /// Get all open positions. An empty account yields an empty list.
    async fn get_positions(&self, cancel: &CancellationToken)
    -> Result<Vec<Position>, BrokerError>;

    /// Get the latest quote for a symbol.
    async fn get_quote(&self, symbol: &str, cancel: &CancellationToken)
    -> Result<Quote, BrokerError>;

    /// List option expirations for an underlying, with strikes if requested.
    async fn get_expirations(
        &self,
        symbol: &str,
        include_strikes: bool,
        cancel: &CancellationToken,
    ) -> Result<Vec<Expiration>, BrokerError>;

    /// Get the option chain for one expiration.
    async fn get_option_chain(
        &self,
        symbol: &str,
        expiration: NaiveDate,
        greeks: bool,
        cancel: &CancellationToken,
    ) -> Result<Vec<OptionContract>, BrokerError>;

    /// Get the market clock.
    async fn get_market_clock(
        &self,
        delayed: bool,
        cancel: &CancellationToken,
    ) -> Result<MarketClock, BrokerError>;

    /// Get the market calendar for one month.
    async fn get_market_calendar(
        &self,
        year: i32,
        month: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<CalendarDay>, BrokerError>;

    /// Returns true if the market trades on `date`. Dates missing from the
    /// calendar are not trading days.
    async fn is_trading_day(
        &self,
        date: NaiveDate,
        cancel: &CancellationToken,
    ) -> Result<bool, BrokerError> {
        let days = self
            .get_market_calendar(date.year(), date.month(), cancel)
            .await?;
        Ok(days
            .iter()
            .any(|day| day.date == date && day.is_trading_day()))
    }

    /// Get historical bars between `start` and `end` inclusive.
    async fn get_historical_bars(
        &self,
        symbol: &str,
        interval: HistoryInterval,
        start: NaiveDate,
        end: NaiveDate,
        cancel: &CancellationToken,
    ) -> Result<Vec<HistoricalBar>, BrokerError>;

    /// Open a short strangle for a net credit, as OTOCO when configured.
    async fn place_strangle_order(
        &self,
        params: &StrangleOrderParams,
        cancel: &CancellationToken,
    ) -> Result<OrderResult, BrokerError>;

    /// Close both legs of a short strangle.
    async fn close_strangle_order(
        &self,
        params: &StrangleCloseParams,
        cancel: &CancellationToken,
    ) -> Result<OrderResult, BrokerError>;

    /// Close one option position at a limit or at market.
    async fn place_single_leg_close(
        &self,
        params: &CloseOrderParams,
        cancel: &CancellationToken,
    ) -> Result<OrderResult, BrokerError>;

    /// Look up an order.
    async fn get_order_status(
        &self,
        order_id: &str,
        cancel: &CancellationToken,
    ) -> Result<OrderResult, BrokerError>;

    /// Cancel a working order.
    async fn cancel_order(
        &self,
        order_id: &str,
        cancel: &CancellationToken,
    ) -> Result<OrderResult, BrokerError>;
}
