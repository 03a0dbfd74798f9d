//! Raw caller parameters, validated by [`super::OrderBuilder`].

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};

use super::errors::ValidationError;
use super::order_types::CloseSide;

/// Parameters for opening a short strangle for a net credit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrangleOrderParams {
    /// Underlying symbol.
    pub underlying: String,
    /// Put strike.
    pub put_strike: f64,
    /// Call strike.
    pub call_strike: f64,
    /// Expiration, `YYYY-MM-DD`.
    pub expiration: String,
    /// Contracts per leg.
    pub quantity: i64,
    /// Net credit limit.
    pub credit: Decimal,
    /// Duration (synonyms accepted).
    pub duration: String,
    /// Optional idempotency tag.
    pub tag: Option<String>,
    /// Preview only.
    #[serde(default)]
    pub preview: bool,
}

impl StrangleOrderParams {
    /// Create parameters for a day order without a tag.
    #[must_use]
    pub fn new(
        underlying: impl Into<String>,
        put_strike: f64,
        call_strike: f64,
        expiration: impl Into<String>,
        quantity: i64,
        credit: Decimal,
    ) -> Self {
        Self {
            underlying: underlying.into(),
            put_strike,
            call_strike,
            expiration: expiration.into(),
            quantity,
            credit,
            duration: "day".to_string(),
            tag: None,
            preview: false,
        }
    }

    /// Set the duration.
    #[must_use]
    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = duration.into();
        self
    }

    /// Set the idempotency tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// Parameters for closing both legs of a short strangle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrangleCloseParams {
    /// OCC symbol of the short put.
    pub put_symbol: String,
    /// OCC symbol of the short call.
    pub call_symbol: String,
    /// Contracts per leg.
    pub quantity: i64,
    /// Net debit limit; `None` closes at market.
    pub debit: Option<Decimal>,
    /// Duration (synonyms accepted).
    pub duration: String,
    /// Optional idempotency tag.
    pub tag: Option<String>,
}

/// Parameters for closing a single option position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseOrderParams {
    /// OCC symbol of the position.
    pub option_symbol: String,
    /// Contracts.
    pub quantity: i64,
    /// Buy to close a short, sell to close a long.
    pub side: CloseSide,
    /// Limit price; `None` closes at market.
    pub limit_price: Option<Decimal>,
    /// Duration (synonyms accepted).
    pub duration: String,
    /// Optional idempotency tag.
    pub tag: Option<String>,
}

impl CloseOrderParams {
    /// Limit close.
    #[must_use]
    pub fn limit(
        option_symbol: impl Into<String>,
        quantity: i64,
        side: CloseSide,
        limit_price: Decimal,
    ) -> Self {
        Self {
            option_symbol: option_symbol.into(),
            quantity,
            side,
            limit_price: Some(limit_price),
            duration: "day".to_string(),
            tag: None,
        }
    }

    /// Market close.
    #[must_use]
    pub fn market(option_symbol: impl Into<String>, quantity: i64, side: CloseSide) -> Self {
        Self {
            option_symbol: option_symbol.into(),
            quantity,
            side,
            limit_price: None,
            duration: "day".to_string(),
            tag: None,
        }
    }
}

/// Fraction of the opening credit to capture before exiting (0.0-1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProfitTarget(f64);

impl ProfitTarget {
    /// Default target: close at half the credit.
    pub const DEFAULT: Self = Self(0.5);

    /// Out-of-range or non-finite values are rejected.
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(ValidationError::InvalidProfitTarget { value });
        }
        Ok(Self(value))
    }

    /// Get the ratio.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Debit at which the exit fires: `credit * (1 - target)`, to the cent.
    #[must_use]
    pub fn exit_debit(&self, credit: Decimal) -> Decimal {
        let keep = Decimal::from_f64(1.0 - self.0).unwrap_or(Decimal::ZERO);
        (credit * keep).round_dp(2)
    }
}

impl Default for ProfitTarget {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn profit_target_range() {
        assert!(ProfitTarget::new(0.0).is_ok());
        assert!(ProfitTarget::new(1.0).is_ok());
        assert_eq!(
            ProfitTarget::new(1.5),
            Err(ValidationError::InvalidProfitTarget { value: 1.5 })
        );
        assert!(ProfitTarget::new(-0.1).is_err());
        assert!(ProfitTarget::new(f64::NAN).is_err());
    }

    #[test]
    fn exit_debit_rounds_to_cents() {
        let target = ProfitTarget::new(0.5).unwrap();
        assert_eq!(target.exit_debit(dec!(2.45)), dec!(1.22));
        let target = ProfitTarget::new(0.75).unwrap();
        assert_eq!(target.exit_debit(dec!(4.00)), dec!(1.00));
    }

    #[test]
    fn default_profit_target() {
        assert!((ProfitTarget::default().value() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn strangle_params_builder() {
        let params = StrangleOrderParams::new("SPY", 430.0, 470.0, "2025-01-17", 1, dec!(2.10))
            .with_duration("gtc")
            .with_tag("abc");
        assert_eq!(params.duration, "gtc");
        assert_eq!(params.tag.as_deref(), Some("abc"));
    }
}
