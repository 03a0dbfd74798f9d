//! Order Builder
//!
//! Turns raw caller parameters into validated [`OrderRequest`]s. Checks run
//! in a fixed order and stop at the first failure:
//!
//! 1. duration
//! 2. price, and no market orders in pre/post sessions
//! 3. quantity
//! 4. strike ordering (strangles)
//! 5. expiration
//!
//! Strikes are converted to OCC symbols only when the legs are built.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::duration::OrderDuration;
use super::errors::ValidationError;
use super::order_types::{OrderClass, OrderSide, OrderType};
use super::params::{CloseOrderParams, ProfitTarget, StrangleCloseParams, StrangleOrderParams};
use super::request::{OrderLeg, OrderRequest, OtocoRequest};
use super::tag::OrderTag;
use crate::domain::option_contract::{OccSymbol, OptionType, SymbolCodec};

/// Validates parameters and builds order requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderBuilder {
    codec: SymbolCodec,
}

impl OrderBuilder {
    /// Create a builder that decodes leg symbols with `codec`.
    #[must_use]
    pub const fn new(codec: SymbolCodec) -> Self {
        Self { codec }
    }

    /// Get the codec used for leg symbols.
    #[must_use]
    pub const fn codec(&self) -> SymbolCodec {
        self.codec
    }

    /// Build an opening short strangle for a net credit.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered.
    pub fn strangle_open(
        &self,
        params: &StrangleOrderParams,
    ) -> Result<OrderRequest, ValidationError> {
        let duration = OrderDuration::normalize(&params.duration)?;
        let price = validate_price(Some(params.credit), OrderType::Credit)?;
        let quantity = validate_quantity(params.quantity)?;
        validate_strikes(params.put_strike, params.call_strike)?;
        let expiration = parse_expiration(&params.expiration)?;
        let tag = parse_tag(params.tag.as_deref())?;

        let underlying = params.underlying.trim();
        let put = self.codec.encode(
            underlying,
            expiration,
            OptionType::Put,
            params.put_strike,
        )?;
        let call = self.codec.encode(
            underlying,
            expiration,
            OptionType::Call,
            params.call_strike,
        )?;

        Ok(OrderRequest {
            class: OrderClass::Multileg,
            underlying: underlying.to_string(),
            order_type: OrderType::Credit,
            price,
            duration,
            legs: vec![
                leg(put, OrderSide::SellToOpen, quantity),
                leg(call, OrderSide::SellToOpen, quantity),
            ],
            tag,
            preview: params.preview,
        })
    }

    /// Build a multileg close of a short strangle.
    ///
    /// A debit limit closes for at most that debit; no debit closes at market.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered, including legs that
    /// are not decodable or have the wrong option type.
    pub fn strangle_close(
        &self,
        params: &StrangleCloseParams,
    ) -> Result<OrderRequest, ValidationError> {
        let duration = OrderDuration::normalize(&params.duration)?;
        let order_type = if params.debit.is_some() {
            OrderType::Debit
        } else {
            OrderType::Market
        };
        let price = validate_price(params.debit, order_type)?;
        validate_session(duration, order_type)?;
        let quantity = validate_quantity(params.quantity)?;
        let tag = parse_tag(params.tag.as_deref())?;

        let put = self.decode_leg(&params.put_symbol, OptionType::Put)?;
        let call = self.decode_leg(&params.call_symbol, OptionType::Call)?;
        validate_strikes(put.strike(), call.strike())?;

        Ok(OrderRequest {
            class: OrderClass::Multileg,
            underlying: put.underlying().to_string(),
            order_type,
            price,
            duration,
            legs: vec![
                leg(params.put_symbol.trim().to_string(), OrderSide::BuyToClose, quantity),
                leg(params.call_symbol.trim().to_string(), OrderSide::BuyToClose, quantity),
            ],
            tag,
            preview: false,
        })
    }

    /// Build a single-leg close, limit when a price is given, else market.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered.
    pub fn single_leg_close(
        &self,
        params: &CloseOrderParams,
    ) -> Result<OrderRequest, ValidationError> {
        let duration = OrderDuration::normalize(&params.duration)?;
        let order_type = if params.limit_price.is_some() {
            OrderType::Limit
        } else {
            OrderType::Market
        };
        let price = validate_price(params.limit_price, order_type)?;
        validate_session(duration, order_type)?;
        let quantity = validate_quantity(params.quantity)?;
        let tag = parse_tag(params.tag.as_deref())?;

        let symbol = params.option_symbol.trim();
        let decoded = self.codec.decode(symbol)?;

        Ok(OrderRequest {
            class: OrderClass::Option,
            underlying: decoded.underlying().to_string(),
            order_type,
            price,
            duration,
            legs: vec![leg(symbol.to_string(), params.side.into(), quantity)],
            tag,
            preview: false,
        })
    }

    /// Build an OTOCO strangle: the credit entry plus a GTC debit exit at
    /// `credit * (1 - target)`.
    ///
    /// # Errors
    ///
    /// Returns the entry's [`ValidationError`], or
    /// [`ValidationError::InvalidPrice`] when the exit debit rounds to zero.
    pub fn otoco_strangle(
        &self,
        params: &StrangleOrderParams,
        target: ProfitTarget,
    ) -> Result<OtocoRequest, ValidationError> {
        let mut entry = self.strangle_open(params)?;
        let tag = entry.tag.take();

        let debit = target.exit_debit(params.credit);
        if debit <= Decimal::ZERO {
            return Err(ValidationError::InvalidPrice { price: debit });
        }

        let exit = OrderRequest {
            class: OrderClass::Multileg,
            underlying: entry.underlying.clone(),
            order_type: OrderType::Debit,
            price: Some(debit),
            duration: OrderDuration::Gtc,
            legs: entry
                .legs
                .iter()
                .map(|l| leg(l.option_symbol.clone(), OrderSide::BuyToClose, l.quantity))
                .collect(),
            tag: None,
            preview: entry.preview,
        };

        Ok(OtocoRequest {
            duration: entry.duration,
            entry,
            exit,
            tag,
        })
    }

    fn decode_leg(&self, symbol: &str, expected: OptionType) -> Result<OccSymbol, ValidationError> {
        let decoded = self.codec.decode(symbol.trim())?;
        if decoded.option_type() != expected {
            return Err(ValidationError::WrongOptionType {
                symbol: symbol.to_string(),
                expected: match expected {
                    OptionType::Put => "put",
                    OptionType::Call => "call",
                },
            });
        }
        Ok(decoded)
    }
}

fn leg(option_symbol: String, side: OrderSide, quantity: u32) -> OrderLeg {
    OrderLeg {
        option_symbol,
        side,
        quantity,
    }
}

fn validate_price(
    price: Option<Decimal>,
    order_type: OrderType,
) -> Result<Option<Decimal>, ValidationError> {
    if !order_type.requires_price() {
        return Ok(None);
    }
    match price {
        None => Err(ValidationError::MissingPrice {
            order_type: order_type.as_str(),
        }),
        Some(p) if p <= Decimal::ZERO => Err(ValidationError::InvalidPrice { price: p }),
        Some(p) => Ok(Some(p)),
    }
}

/// Extended sessions only take priced orders.
fn validate_session(
    duration: OrderDuration,
    order_type: OrderType,
) -> Result<(), ValidationError> {
    if duration.is_extended_hours() && !order_type.requires_price() {
        return Err(ValidationError::ExtendedHoursMarketOrder {
            duration: duration.as_str(),
        });
    }
    Ok(())
}

fn validate_quantity(quantity: i64) -> Result<u32, ValidationError> {
    match u32::try_from(quantity) {
        Ok(q) if q > 0 => Ok(q),
        _ => Err(ValidationError::InvalidQuantity { quantity }),
    }
}

fn validate_strikes(put_strike: f64, call_strike: f64) -> Result<(), ValidationError> {
    // NaN fails this comparison too.
    if put_strike < call_strike {
        Ok(())
    } else {
        Err(ValidationError::InvertedStrikes {
            put_strike,
            call_strike,
        })
    }
}

fn parse_expiration(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ValidationError::InvalidExpiration {
            value: value.to_string(),
        }
    })
}

fn parse_tag(tag: Option<&str>) -> Result<Option<OrderTag>, ValidationError> {
    tag.map(OrderTag::new).transpose()
}
