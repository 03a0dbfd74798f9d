//! Mid-price credit for a put/call pair.

use super::errors::StrategyError;
use crate::domain::option_contract::{OptionContract, OptionType};

/// Tolerance when matching strikes recomputed from floats.
pub const STRIKE_EPSILON: f64 = 1e-3;

/// Combined mid-price credit of the put at `put_strike` and the call at
/// `call_strike`.
///
/// # Errors
///
/// Returns [`StrategyError::StrikeNotFound`] if either leg has no contract
/// within [`STRIKE_EPSILON`], and [`StrategyError::NoQuote`] if a leg lacks a
/// two-sided quote. A missing or unquoted leg is never priced as zero.
pub fn strangle_credit(
    contracts: &[OptionContract],
    put_strike: f64,
    call_strike: f64,
) -> Result<f64, StrategyError> {
    let put = leg_mid(contracts, OptionType::Put, put_strike)?;
    let call = leg_mid(contracts, OptionType::Call, call_strike)?;
    Ok(put + call)
}

fn leg_mid(
    contracts: &[OptionContract],
    option_type: OptionType,
    strike: f64,
) -> Result<f64, StrategyError> {
    let label = match option_type {
        OptionType::Put => "put",
        OptionType::Call => "call",
    };
    let contract = contracts
        .iter()
        .find(|c| c.option_type == option_type && (c.strike - strike).abs() < STRIKE_EPSILON)
        .ok_or(StrategyError::StrikeNotFound {
            option_type: label,
            strike,
        })?;
    contract.mid_price().ok_or(StrategyError::NoQuote {
        option_type: label,
        strike,
    })
}
