//! Tradier Broker Adapter
//!
//! Implementation of `BrokerPort` for the Tradier brokerage API:
//! - Market data, account and order endpoints over form-encoded HTTP
//! - Per-call cancellation and rate-limit warnings
//! - OTOCO strangles with a one-time fallback to a plain multileg order

mod adapter;
mod api_types;
mod config;
mod error;
mod http_client;
mod otoco;

pub use adapter::TradierBrokerAdapter;
pub use config::{
    DEFAULT_RATE_LIMIT_WARN_THRESHOLD, DEFAULT_TIMEOUT, TradierConfig, TradierEnvironment,
};
pub use error::TradierError;
pub use otoco::{OrderSubmitter, place_strangle};
