//! Infrastructure Layer
//!
//! Driven adapters for the ports defined in the application layer:
//!
//! - `broker/`: the Tradier HTTP adapter and the circuit-breaking decorator
//!   that wraps any `BrokerPort`.

pub mod broker;
