//! Application Ports
//!
//! Driven ports: how the application reaches the broker.

mod broker_port;

pub use broker_port::{BrokerError, BrokerPort, STATUS_NOT_IMPLEMENTED};
