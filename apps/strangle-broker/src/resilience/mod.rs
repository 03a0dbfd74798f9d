//! Resilience patterns for broker calls.

mod circuit_breaker;

pub use circuit_breaker::{
    CallOutcome, CallPermit, CircuitBreaker, CircuitBreakerConfig, CircuitBreakerState,
    CircuitCounts,
};
