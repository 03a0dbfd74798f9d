//! Delta-targeted strike selection.

use serde::{Deserialize, Serialize};

use super::errors::StrategyError;
use crate::domain::option_contract::{OptionContract, OptionType};

/// Put and call chosen for a strangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrangleStrikes {
    /// Put strike.
    pub put_strike: f64,
    /// Call strike.
    pub call_strike: f64,
    /// Put OCC symbol.
    pub put_symbol: String,
    /// Call OCC symbol.
    pub call_symbol: String,
}

/// Pick the put and call whose delta is closest to `target_delta`.
///
/// Puts are compared by `|delta|`, calls by `delta`. Contracts without
/// greeks, or with a non-finite delta, are skipped. On a tie the first contract encountered wins.
///
/// # Errors
///
/// Returns an error if the target is not in (0, 1) or either side has no
/// contract with greeks.
pub fn select_strangle_strikes(
    contracts: &[OptionContract],
    target_delta: f64,
) -> Result<StrangleStrikes, StrategyError> {
    if !target_delta.is_finite() || target_delta <= 0.0 || target_delta >= 1.0 {
        return Err(StrategyError::InvalidTargetDelta {
            target: target_delta,
        });
    }

    let put = closest(contracts, OptionType::Put, target_delta).ok_or(
        StrategyError::NoCandidates {
            option_type: "put",
        },
    )?;
    let call = closest(contracts, OptionType::Call, target_delta).ok_or(
        StrategyError::NoCandidates {
            option_type: "call",
        },
    )?;

    Ok(StrangleStrikes {
        put_strike: put.strike,
        call_strike: call.strike,
        put_symbol: put.symbol.clone(),
        call_symbol: call.symbol.clone(),
    })
}

fn closest(
    contracts: &[OptionContract],
    option_type: OptionType,
    target: f64,
) -> Option<&OptionContract> {
    let mut best: Option<(&OptionContract, f64)> = None;

    for contract in contracts.iter().filter(|c| c.option_type == option_type) {
        let Some(delta) = contract.delta().filter(|d| d.is_finite()) else {
            continue;
        };
        let delta = match option_type {
            OptionType::Put => delta.abs(),
            OptionType::Call => delta,
        };
        let diff = (delta - target).abs();
        if best.is_none_or(|(_, best_diff)| diff < best_diff) {
            best = Some((contract, diff));
        }
    }

    best.map(|(contract, _)| contract)
}
