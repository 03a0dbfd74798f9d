//! Circuit-breaking decorator for any `BrokerPort`.
//!
//! Every operation passes through one breaker. Only transient errors and
//! internal failures count against it; validation errors, cancellations,
//! permanent rejections and unsupported-feature signals are neutral.

use std::future::Future;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;

use crate::application::dto::{
    AccountBalances, CalendarDay, Expiration, HistoricalBar, HistoryInterval, MarketClock,
    OrderResult, Quote,
};
use crate::application::ports::{BrokerError, BrokerPort};
use crate::domain::option_contract::OptionContract;
use crate::domain::order::{CloseOrderParams, StrangleCloseParams, StrangleOrderParams};
use crate::domain::strangle::Position;
use crate::observability::record_circuit_breaker_rejection;
use crate::resilience::{CallOutcome, CircuitBreaker, CircuitBreakerConfig};

/// Wraps a broker with a circuit breaker.
#[derive(Debug)]
pub struct CircuitBreakerBroker<B> {
    inner: B,
    breaker: CircuitBreaker,
}

impl<B: BrokerPort> CircuitBreakerBroker<B> {
    /// Wrap `inner` with a breaker called `name`.
    #[must_use]
    pub fn new(inner: B, name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            inner,
            breaker: CircuitBreaker::new(name, config),
        }
    }

    /// Get the breaker, for state inspection.
    #[must_use]
    pub const fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// Get the wrapped broker.
    #[must_use]
    pub const fn inner(&self) -> &B {
        &self.inner
    }

    async fn execute<T, F>(&self, operation: &'static str, call: F) -> Result<T, BrokerError>
    where
        F: Future<Output = Result<T, BrokerError>> + Send,
    {
        let Some(permit) = self.breaker.try_acquire() else {
            record_circuit_breaker_rejection(self.breaker.name());
            tracing::debug!(
                breaker = %self.breaker.name(),
                operation,
                "Circuit open, rejecting broker call"
            );
            return Err(BrokerError::CircuitOpen {
                name: self.breaker.name().to_string(),
            });
        };

        let result = call.await;
        permit.record(classify(&result));
        result
    }
}

/// Map a broker result to its effect on the breaker.
fn classify<T>(result: &Result<T, BrokerError>) -> CallOutcome {
    match result {
        Ok(_) => CallOutcome::Success,
        Err(e) if e.counts_as_failure() => CallOutcome::Failure,
        Err(_) => CallOutcome::Neutral,
    }
}

#[async_trait]
impl<B: BrokerPort> BrokerPort for CircuitBreakerBroker<B> {
    async fn get_balances(&self, cancel: &CancellationToken) -> Result<AccountBalances, BrokerError> {
        self.execute("get_balances", self.inner.get_balances(cancel))
            .await
    }

    async fn get_positions(&self, cancel: &CancellationToken) -> Result<Vec<Position>, BrokerError> {
        self.execute("get_positions", self.inner.get_positions(cancel))
            .await
    }

    async fn get_quote(&self, symbol: &str, cancel: &CancellationToken) -> Result<Quote, BrokerError> {
        self.execute("get_quote", self.inner.get_quote(symbol, cancel))
            .await
    }

    async fn get_expirations(
        &self,
        symbol: &str,
        include_strikes: bool,
        cancel: &CancellationToken,
    ) -> Result<Vec<Expiration>, BrokerError> {
        self.execute(
            "get_expirations",
            self.inner.get_expirations(symbol, include_strikes, cancel),
        )
        .await
    }

    async fn get_option_chain(
        &self,
        symbol: &str,
        expiration: NaiveDate,
        greeks: bool,
        cancel: &CancellationToken,
    ) -> Result<Vec<OptionContract>, BrokerError> {
        self.execute(
            "get_option_chain",
            self.inner
                .get_option_chain(symbol, expiration, greeks, cancel),
        )
        .await
    }

    async fn get_market_clock(
        &self,
        delayed: bool,
        cancel: &CancellationToken,
    ) -> Result<MarketClock, BrokerError> {
        self.execute("get_market_clock", self.inner.get_market_clock(delayed, cancel))
            .await
    }

    async fn get_market_calendar(
        &self,
        year: i32,
        month: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<CalendarDay>, BrokerError> {
        self.execute(
            "get_market_calendar",
            self.inner.get_market_calendar(year, month, cancel),
        )
        .await
    }

    async fn get_historical_bars(
        &self,
        symbol: &str,
        interval: HistoryInterval,
        start: NaiveDate,
        end: NaiveDate,
        cancel: &CancellationToken,
    ) -> Result<Vec<HistoricalBar>, BrokerError> {
        self.execute(
            "get_historical_bars",
            self.inner
                .get_historical_bars(symbol, interval, start, end, cancel),
        )
        .await
    }

    async fn place_strangle_order(
        &self,
        params: &StrangleOrderParams,
        cancel: &CancellationToken,
    ) -> Result<OrderResult, BrokerError> {
        self.execute(
            "place_strangle_order",
            self.inner.place_strangle_order(params, cancel),
        )
        .await
    }

    async fn close_strangle_order(
        &self,
        params: &StrangleCloseParams,
        cancel: &CancellationToken,
    ) -> Result<OrderResult, BrokerError> {
        self.execute(
            "close_strangle_order",
            self.inner.close_strangle_order(params, cancel),
        )
        .await
    }

    async fn place_single_leg_close(
        &self,
        params: &CloseOrderParams,
        cancel: &CancellationToken,
    ) -> Result<OrderResult, BrokerError> {
        self.execute(
            "place_single_leg_close",
            self.inner.place_single_leg_close(params, cancel),
        )
        .await
    }

    async fn get_order_status(
        &self,
        order_id: &str,
        cancel: &CancellationToken,
    ) -> Result<OrderResult, BrokerError> {
        self.execute(
            "get_order_status",
            self.inner.get_order_status(order_id, cancel),
        )
        .await
    }

    async fn cancel_order(
        &self,
        order_id: &str,
        cancel: &CancellationToken,
    ) -> Result<OrderResult, BrokerError> {
        self.execute("cancel_order", self.inner.cancel_order(order_id, cancel))
            .await
    }
}
