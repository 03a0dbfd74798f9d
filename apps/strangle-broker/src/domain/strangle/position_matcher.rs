//! Detect an open short strangle among account positions.

use super::position::Position;
use crate::domain::option_contract::{OptionType, SymbolCodec};

/// The two short legs of an open strangle.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenStrangle {
    /// Short put.
    pub put: Position,
    /// Short call.
    pub call: Position,
}

/// Find a short put and a short call on `underlying`.
///
/// The underlying is read by decoding each symbol, so "AAPL" never matches
/// "AAPLW". Equity and undecodable symbols are skipped. The first
/// qualifying position of each type wins.
#[must_use]
pub fn find_open_strangle(
    positions: &[Position],
    underlying: &str,
    codec: SymbolCodec,
) -> Option<OpenStrangle> {
    let underlying = underlying.trim();
    let mut put: Option<&Position> = None;
    let mut call: Option<&Position> = None;

    for position in positions.iter().filter(|p| p.is_short()) {
        let Ok(symbol) = codec.decode(&position.symbol) else {
            continue;
        };
        if symbol.underlying() != underlying {
            continue;
        }
        let slot = match symbol.option_type() {
            OptionType::Put => &mut put,
            OptionType::Call => &mut call,
        };
        if slot.is_none() {
            *slot = Some(position);
        }
    }

    Some(OpenStrangle {
        put: put?.clone(),
        call: call?.clone(),
    })
}
