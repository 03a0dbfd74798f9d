//! Validated order requests, ready for a broker adapter to serialize.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::duration::OrderDuration;
use super::order_types::{OrderClass, OrderSide, OrderType};
use super::tag::OrderTag;

/// One option leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLeg {
    /// OCC symbol.
    pub option_symbol: String,
    /// Leg side.
    pub side: OrderSide,
    /// Contracts, always > 0.
    pub quantity: u32,
}

/// A validated single-leg or multileg order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Order class.
    pub class: OrderClass,
    /// Underlying symbol.
    pub underlying: String,
    /// Net order type.
    pub order_type: OrderType,
    /// Limit price; `None` exactly when `order_type` is market.
    pub price: Option<Decimal>,
    /// Duration.
    pub duration: OrderDuration,
    /// Legs (one for single-leg, two for strangles).
    pub legs: Vec<OrderLeg>,
    /// Idempotency tag.
    pub tag: Option<OrderTag>,
    /// Ask the broker to preview instead of place.
    pub preview: bool,
}

impl OrderRequest {
    /// Returns true for multileg orders.
    #[must_use]
    pub const fn is_multileg(&self) -> bool {
        matches!(self.class, OrderClass::Multileg)
    }
}

/// An entry order that, once filled, triggers a profit-taking exit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtocoRequest {
    /// Duration of the entry order.
    pub duration: OrderDuration,
    /// Opening order (credit strangle).
    pub entry: OrderRequest,
    /// Closing order submitted on fill (debit strangle at the profit target).
    pub exit: OrderRequest,
    /// Idempotency tag.
    pub tag: Option<OrderTag>,
}
