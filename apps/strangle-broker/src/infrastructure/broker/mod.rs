//! Broker Adapters
//!
//! Implementations of `BrokerPort`.

mod circuit_breaker_broker;
pub mod tradier;

pub use circuit_breaker_broker::CircuitBreakerBroker;
pub use tradier::{TradierBrokerAdapter, TradierConfig, TradierEnvironment, TradierError};
