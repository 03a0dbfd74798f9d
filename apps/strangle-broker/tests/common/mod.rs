//! Shared fixtures for integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;

use strangle_broker::application::dto::{
    AccountBalances, CalendarDay, Expiration, HistoricalBar, HistoryInterval, MarketClock,
    OrderResult, OrderStatus, Quote,
};
use strangle_broker::domain::option_contract::{Greeks, OptionContract, OptionType, encode};
use strangle_broker::domain::order::{CloseOrderParams, StrangleCloseParams, StrangleOrderParams};
use strangle_broker::domain::strangle::Position;
use strangle_broker::{BrokerError, BrokerPort};

pub fn expiration() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 17).unwrap()
}

pub fn contract(option_type: OptionType, strike: f64, delta: f64, bid: f64, ask: f64) -> OptionContract {
    OptionContract {
        symbol: encode("SPY", expiration(), option_type, strike).unwrap(),
        underlying: "SPY".to_string(),
        expiration: expiration(),
        option_type,
        strike,
        bid: Some(bid),
        ask: Some(ask),
        last: None,
        volume: 100,
        open_interest: 1000,
        greeks: Some(Greeks::with_delta(delta)),
    }
}

/// A small SPY chain: puts at 420/430/440, calls at 460/470/480.
pub fn spy_chain() -> Vec<OptionContract> {
    vec![
        contract(OptionType::Put, 420.0, -0.10, 0.80, 0.90),
        contract(OptionType::Put, 430.0, -0.16, 1.20, 1.30),
        contract(OptionType::Put, 440.0, -0.25, 1.90, 2.00),
        contract(OptionType::Call, 460.0, 0.28, 2.10, 2.20),
        contract(OptionType::Call, 470.0, 0.17, 1.10, 1.20),
        contract(OptionType::Call, 480.0, 0.09, 0.60, 0.70),
    ]
}

pub fn short_position(id: i64, symbol: &str) -> Position {
    Position {
        id,
        symbol: symbol.to_string(),
        quantity: -1.0,
        cost_basis: -120.0,
        date_acquired: None,
    }
}

/// Scripted in-memory broker.
///
/// Queued failures are returned, in order, by the next calls of any
/// operation; once the queue is empty the canned data is returned.
#[derive(Default)]
pub struct FakeBroker {
    pub positions: Mutex<Vec<Position>>,
    pub chain: Mutex<Vec<OptionContract>>,
    pub calendar: Mutex<Vec<CalendarDay>>,
    pub failures: Mutex<VecDeque<BrokerError>>,
    pub placed: Mutex<Vec<StrangleOrderParams>>,
    pub calls: AtomicUsize,
}

impl FakeBroker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chain(self, chain: Vec<OptionContract>) -> Self {
        *self.chain.lock().unwrap() = chain;
        self
    }

    pub fn with_positions(self, positions: Vec<Position>) -> Self {
        *self.positions.lock().unwrap() = positions;
        self
    }

    pub fn with_calendar(self, days: Vec<CalendarDay>) -> Self {
        *self.calendar.lock().unwrap() = days;
        self
    }

    pub fn fail_next(&self, err: BrokerError, times: usize) {
        let mut failures = self.failures.lock().unwrap();
        for _ in 0..times {
            failures.push_back(err.clone());
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn placed(&self) -> Vec<StrangleOrderParams> {
        self.placed.lock().unwrap().clone()
    }

    fn enter(&self) -> Result<(), BrokerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failures.lock().unwrap().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn ack(id: i64) -> OrderResult {
        OrderResult {
            id: Some(id),
            status: OrderStatus::Ok,
            ..Default::default()
        }
    }
}

#[async_trait]
impl BrokerPort for FakeBroker {
    async fn get_balances(&self, _cancel: &CancellationToken) -> Result<AccountBalances, BrokerError> {
        self.enter()?;
        Ok(AccountBalances::default())
    }

    async fn get_positions(&self, _cancel: &CancellationToken) -> Result<Vec<Position>, BrokerError> {
        self.enter()?;
        Ok(self.positions.lock().unwrap().clone())
    }

    async fn get_quote(&self, symbol: &str, _cancel: &CancellationToken) -> Result<Quote, BrokerError> {
        self.enter()?;
        Ok(Quote {
            symbol: symbol.to_string(),
            bid: Some(449.9),
            ask: Some(450.1),
            ..Default::default()
        })
    }

    async fn get_expirations(
        &self,
        _symbol: &str,
        _include_strikes: bool,
        _cancel: &CancellationToken,
    ) -> Result<Vec<Expiration>, BrokerError> {
        self.enter()?;
        Ok(vec![Expiration {
            date: expiration(),
            strikes: Vec::new(),
        }])
    }

    async fn get_option_chain(
        &self,
        _symbol: &str,
        _expiration: NaiveDate,
        _greeks: bool,
        _cancel: &CancellationToken,
    ) -> Result<Vec<OptionContract>, BrokerError> {
        self.enter()?;
        Ok(self.chain.lock().unwrap().clone())
    }

    async fn get_market_clock(
        &self,
        _delayed: bool,
        _cancel: &CancellationToken,
    ) -> Result<MarketClock, BrokerError> {
        self.enter()?;
        Err(BrokerError::NotFound {
            what: "clock".to_string(),
        })
    }

    async fn get_market_calendar(
        &self,
        _year: i32,
        _month: u32,
        _cancel: &CancellationToken,
    ) -> Result<Vec<CalendarDay>, BrokerError> {
        self.enter()?;
        Ok(self.calendar.lock().unwrap().clone())
    }

    async fn get_historical_bars(
        &self,
        _symbol: &str,
        _interval: HistoryInterval,
        _start: NaiveDate,
        _end: NaiveDate,
        _cancel: &CancellationToken,
    ) -> Result<Vec<HistoricalBar>, BrokerError> {
        self.enter()?;
        Ok(Vec::new())
    }

    async fn place_strangle_order(
        &self,
        params: &StrangleOrderParams,
        _cancel: &CancellationToken,
    ) -> Result<OrderResult, BrokerError> {
        self.enter()?;
        self.placed.lock().unwrap().push(params.clone());
        Ok(Self::ack(100))
    }

    async fn close_strangle_order(
        &self,
        _params: &StrangleCloseParams,
        _cancel: &CancellationToken,
    ) -> Result<OrderResult, BrokerError> {
        self.enter()?;
        Ok(Self::ack(101))
    }

    async fn place_single_leg_close(
        &self,
        _params: &CloseOrderParams,
        _cancel: &CancellationToken,
    ) -> Result<OrderResult, BrokerError> {
        self.enter()?;
        Ok(Self::ack(102))
    }

    async fn get_order_status(
        &self,
        order_id: &str,
        _cancel: &CancellationToken,
    ) -> Result<OrderResult, BrokerError> {
        self.enter()?;
        Ok(OrderResult {
            id: order_id.parse().ok(),
            status: OrderStatus::Open,
            ..Default::default()
        })
    }

    async fn cancel_order(
        &self,
        order_id: &str,
        _cancel: &CancellationToken,
    ) -> Result<OrderResult, BrokerError> {
        self.enter()?;
        Ok(OrderResult {
            id: order_id.parse().ok(),
            status: OrderStatus::Ok,
            ..Default::default()
        })
    }
}
