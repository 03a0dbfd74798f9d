//! Order validation errors.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::option_contract::SymbolError;

/// Malformed caller input. Never sent to the network.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Duration does not normalize to day/gtc/pre/post.
    #[error("invalid duration '{value}': expected day, gtc, pre or post")]
    InvalidDuration {
        /// The rejected input.
        value: String,
    },

    /// Limit-style order without a price.
    #[error("{order_type} order requires a limit price")]
    MissingPrice {
        /// Order type that needed the price.
        order_type: &'static str,
    },

    /// Price is zero or negative.
    #[error("price must be positive, got {price}")]
    InvalidPrice {
        /// The rejected price.
        price: Decimal,
    },

    /// Quantity is zero or negative.
    #[error("quantity must be positive, got {quantity}")]
    InvalidQuantity {
        /// The rejected quantity.
        quantity: i64,
    },

    /// Put strike is not strictly below the call strike.
    #[error("put strike {put_strike} must be below call strike {call_strike}")]
    InvertedStrikes {
        /// Requested put strike.
        put_strike: f64,
        /// Requested call strike.
        call_strike: f64,
    },

    /// Expiration is not a calendar date.
    #[error("invalid expiration '{value}': expected YYYY-MM-DD")]
    InvalidExpiration {
        /// The rejected input.
        value: String,
    },

    /// Symbol could not be encoded or decoded.
    #[error(transparent)]
    InvalidSymbol(#[from] SymbolError),

    /// Leg symbol belongs to a different option type than required.
    #[error("symbol '{symbol}' is not a {expected}")]
    WrongOptionType {
        /// The offending symbol.
        symbol: String,
        /// Required type.
        expected: &'static str,
    },

    /// Idempotency tag uses characters the broker rejects.
    #[error("invalid order tag '{tag}': use letters, digits and '-' (max 255)")]
    InvalidTag {
        /// The rejected tag.
        tag: String,
    },

    /// Profit target outside 0.0-1.0.
    #[error("profit target must be between 0.0 and 1.0, got {value}")]
    InvalidProfitTarget {
        /// The rejected value.
        value: f64,
    },

    /// Market order in a pre- or post-market session.
    #[error("market orders are not accepted with '{duration}' duration; use a limit price")]
    ExtendedHoursMarketOrder {
        /// The extended-hours duration.
        duration: &'static str,
    },

    /// Order id is empty or not a plain broker id.
    #[error("invalid order id '{order_id}'")]
    InvalidOrderId {
        /// The rejected id.
        order_id: String,
    },
}
