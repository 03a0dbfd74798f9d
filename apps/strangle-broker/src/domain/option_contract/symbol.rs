//! OCC option symbol encoding and decoding.
//!
//! Format: `UNDERLYING + YYMMDD + {P|C} + strike * 1000 (8 digits)`,
//! e.g. `AAPL250117P00095000` is the AAPL 2025-01-17 95.0 put.
//!
//! Decoding is strict: the six date digits must not touch another digit,
//! the strike must be exactly eight digits and end the string, and the
//! underlying must be non-empty. Anything else is [`SymbolError::NotDecodable`],
//! never a partially parsed underlying.

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use super::contract::OptionType;

/// Largest strike representable in eight digits of thousandths.
const MAX_STRIKE_THOUSANDTHS: u64 = 99_999_999;

/// Length of the fixed tail: YYMMDD + type + 8-digit strike.
const TAIL_LEN: usize = 15;

/// Errors from encoding or decoding OCC symbols.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SymbolError {
    /// Underlying was empty.
    #[error("underlying symbol is empty")]
    EmptyUnderlying,

    /// Underlying ends in a digit, which would make the date run ambiguous.
    #[error("underlying '{underlying}' cannot end in a digit")]
    InvalidUnderlying {
        /// The rejected underlying.
        underlying: String,
    },

    /// Strike is not positive, not finite, or too large for eight digits.
    #[error("invalid strike {strike}")]
    InvalidStrike {
        /// The rejected strike.
        strike: f64,
    },

    /// Expiration year cannot be written as YY in the 2000s.
    #[error("expiration {expiration} outside 2000-2099")]
    ExpirationOutOfRange {
        /// The rejected expiration.
        expiration: NaiveDate,
    },

    /// Symbol does not match the OCC layout.
    #[error("symbol '{symbol}' is not decodable: {reason}")]
    NotDecodable {
        /// The rejected symbol.
        symbol: String,
        /// Which rule failed.
        reason: &'static str,
    },
}

/// A decoded OCC option symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OccSymbol {
    underlying: String,
    expiration: NaiveDate,
    option_type: OptionType,
    strike_thousandths: u64,
}

impl OccSymbol {
    /// Underlying symbol, case preserved.
    #[must_use]
    pub fn underlying(&self) -> &str {
        &self.underlying
    }

    /// Expiration date.
    #[must_use]
    pub const fn expiration(&self) -> NaiveDate {
        self.expiration
    }

    /// Put or call.
    #[must_use]
    pub const fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// Strike in thousandths of a currency unit.
    #[must_use]
    pub const fn strike_thousandths(&self) -> u64 {
        self.strike_thousandths
    }

    /// Strike price.
    #[must_use]
    pub fn strike(&self) -> f64 {
        self.strike_thousandths as f64 / 1000.0
    }
}

impl std::fmt::Display for OccSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}{}{:08}",
            self.underlying,
            self.expiration.format("%y%m%d"),
            self.option_type.code(),
            self.strike_thousandths
        )
    }
}

/// OCC symbol codec.
///
/// Whether a lowercase `p`/`c` type character is accepted on decode is a
/// policy choice; the default rejects it. The underlying is always
/// compared case-sensitively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SymbolCodec {
    accept_lowercase_type: bool,
}

impl SymbolCodec {
    /// Codec that only accepts uppercase `P`/`C`.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            accept_lowercase_type: false,
        }
    }

    /// Codec that also accepts lowercase `p`/`c`.
    #[must_use]
    pub const fn accepting_lowercase_type() -> Self {
        Self {
            accept_lowercase_type: true,
        }
    }

    /// Create a codec from the configured policy.
    #[must_use]
    pub const fn new(accept_lowercase_type: bool) -> Self {
        Self {
            accept_lowercase_type,
        }
    }

    /// Encode contract terms into an OCC symbol.
    pub fn encode(
        &self,
        underlying: &str,
        expiration: NaiveDate,
        option_type: OptionType,
        strike: f64,
    ) -> Result<String, SymbolError> {
        encode(underlying, expiration, option_type, strike)
    }

    /// Decode an OCC symbol.
    pub fn decode(&self, symbol: &str) -> Result<OccSymbol, SymbolError> {
        let bytes = symbol.as_bytes();
        let not_decodable = |reason| SymbolError::NotDecodable {
            symbol: symbol.to_string(),
            reason,
        };

        if bytes.len() <= TAIL_LEN {
            return Err(not_decodable("too short"));
        }

        let strike_start = bytes.len() - 8;
        let type_pos = strike_start - 1;
        let date_start = type_pos - 6;

        if !bytes[strike_start..].iter().all(u8::is_ascii_digit) {
            return Err(not_decodable("strike must be eight trailing digits"));
        }

        let option_type = match bytes[type_pos] {
            b'P' => OptionType::Put,
            b'C' => OptionType::Call,
            b'p' if self.accept_lowercase_type => OptionType::Put,
            b'c' if self.accept_lowercase_type => OptionType::Call,
            _ => return Err(not_decodable("type must be P or C")),
        };

        if !bytes[date_start..type_pos].iter().all(u8::is_ascii_digit) {
            return Err(not_decodable("expiration must be six digits"));
        }
        if bytes[date_start - 1].is_ascii_digit() {
            return Err(not_decodable("expiration digits adjoin other digits"));
        }

        // date_start sits right after a non-digit byte before an ASCII digit,
        // so it is a char boundary.
        let underlying = symbol[..date_start].trim();
        if underlying.is_empty() {
            return Err(not_decodable("empty underlying"));
        }

        let date = &symbol[date_start..type_pos];
        let expiration = parse_yymmdd(date).ok_or_else(|| not_decodable("invalid expiration"))?;

        let strike_thousandths = symbol[strike_start..]
            .parse::<u64>()
            .map_err(|_| not_decodable("invalid strike"))?;

        Ok(OccSymbol {
            underlying: underlying.to_string(),
            expiration,
            option_type,
            strike_thousandths,
        })
    }
}

/// Encode contract terms into an OCC symbol.
///
/// The strike is rounded to the nearest thousandth (ties away from zero) here
/// and nowhere earlier, so repeated calls with the same float are identical.
pub fn encode(
    underlying: &str,
    expiration: NaiveDate,
    option_type: OptionType,
    strike: f64,
) -> Result<String, SymbolError> {
    let underlying = underlying.trim();
    if underlying.is_empty() {
        return Err(SymbolError::EmptyUnderlying);
    }
    if underlying.ends_with(|c: char| c.is_ascii_digit()) {
        return Err(SymbolError::InvalidUnderlying {
            underlying: underlying.to_string(),
        });
    }

    let strike_thousandths = strike_to_thousandths(strike)?;

    if !(2000..=2099).contains(&expiration.year()) {
        return Err(SymbolError::ExpirationOutOfRange { expiration });
    }

    let symbol = OccSymbol {
        underlying: underlying.to_string(),
        expiration,
        option_type,
        strike_thousandths,
    };
    Ok(symbol.to_string())
}

/// Decode with the strict (uppercase type only) codec.
pub fn decode(symbol: &str) -> Result<OccSymbol, SymbolError> {
    SymbolCodec::strict().decode(symbol)
}

/// Read the option type from the last nine characters only.
///
/// Cheaper than [`decode`] and does not require the rest of the symbol to
/// be well formed. Accepts either case for the type character.
#[must_use]
pub fn type_of(symbol: &str) -> Option<OptionType> {
    let bytes = symbol.as_bytes();
    if bytes.len() < 9 {
        return None;
    }
    let tail = &bytes[bytes.len() - 9..];
    if !tail[1..].iter().all(u8::is_ascii_digit) {
        return None;
    }
    match tail[0] {
        b'P' | b'p' => Some(OptionType::Put),
        b'C' | b'c' => Some(OptionType::Call),
        _ => None,
    }
}

/// Convert a strike to thousandths, rounding half away from zero.
pub(crate) fn strike_to_thousandths(strike: f64) -> Result<u64, SymbolError> {
    if !strike.is_finite() || strike <= 0.0 {
        return Err(SymbolError::InvalidStrike { strike });
    }
    let scaled = (strike * 1000.0).round();
    if scaled < 1.0 || scaled > MAX_STRIKE_THOUSANDTHS as f64 {
        return Err(SymbolError::InvalidStrike { strike });
    }
    Ok(scaled as u64)
}

fn parse_yymmdd(date: &str) -> Option<NaiveDate> {
    let yy: i32 = date.get(0..2)?.parse().ok()?;
    let mm: u32 = date.get(2..4)?.parse().ok()?;
    let dd: u32 = date.get(4..6)?.parse().ok()?;
    NaiveDate::from_ymd_opt(2000 + yy, mm, dd)
}
