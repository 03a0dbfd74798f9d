// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Strangle Broker - Rust Core Library
//!
//! Resilient client for the Tradier brokerage API, specialized for short
//! strangles: sell one out-of-the-money put and one out-of-the-money call on
//! the same underlying and expiration for a net credit.
//!
//! # Architecture (Hexagonal)
//!
//! - **Domain**: pure logic with no I/O
//!   - `option_contract`: contract snapshots and the OCC symbol codec
//!   - `order`: validation and construction of strangle and close orders
//!   - `strangle`: strike selection, credit calculation, position matching
//!
//! - **Application**: the `BrokerPort` contract, DTOs and use cases
//!
//! - **Infrastructure**: the Tradier HTTP adapter and the circuit-breaking
//!   decorator that wraps any `BrokerPort`
//!
//! - **Cross-cutting**: `resilience` (circuit breaker), `observability`
//!   (metrics), `config` (YAML loading) and `telemetry` (tracing setup)

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Cross-cutting Modules
// =============================================================================

/// Configuration loading and validation.
pub mod config;

/// Metrics helpers.
pub mod observability;

/// Circuit breaker.
pub mod resilience;

/// Tracing subscriber setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use application::ports::{BrokerError, BrokerPort};
pub use application::use_cases::{OpenStrangleRequest, OpenStrangleUseCase};
pub use domain::option_contract::{OptionContract, OptionType, SymbolCodec};
pub use domain::order::{OrderBuilder, ProfitTarget, StrangleOrderParams, ValidationError};
pub use domain::strangle::{find_open_strangle, select_strangle_strikes, strangle_credit};
pub use infrastructure::broker::{
    CircuitBreakerBroker, TradierBrokerAdapter, TradierConfig, TradierEnvironment,
};
pub use resilience::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerState};
