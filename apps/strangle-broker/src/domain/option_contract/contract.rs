//! Option Contract Value Object

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Option type (put or call).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    /// Put option (right to sell).
    Put,
    /// Call option (right to buy).
    Call,
}

impl OptionType {
    /// The single-character code used in OCC symbols.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Put => 'P',
            Self::Call => 'C',
        }
    }

    /// Parse a broker `option_type` string ("put" / "call").
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "put" => Some(Self::Put),
            "call" => Some(Self::Call),
            _ => None,
        }
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Put => write!(f, "put"),
            Self::Call => write!(f, "call"),
        }
    }
}

/// Option Greeks as reported with a chain snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Greeks {
    /// Delta. Negative for puts, positive for calls.
    pub delta: f64,
    /// Gamma.
    pub gamma: f64,
    /// Theta (per day).
    pub theta: f64,
    /// Vega.
    pub vega: f64,
    /// Rho.
    pub rho: f64,
    /// Phi.
    pub phi: f64,
    /// Implied volatility at the bid.
    pub bid_iv: f64,
    /// Implied volatility at the mid.
    pub mid_iv: f64,
    /// Implied volatility at the ask.
    pub ask_iv: f64,
    /// Smoothed implied volatility.
    pub smv_vol: f64,
}

impl Greeks {
    /// Create Greeks with just delta.
    #[must_use]
    pub fn with_delta(delta: f64) -> Self {
        Self {
            delta,
            ..Default::default()
        }
    }
}

/// Immutable snapshot of one option contract from a chain request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    /// OCC symbol (e.g. "AAPL250117P00095000").
    pub symbol: String,
    /// Underlying symbol.
    pub underlying: String,
    /// Expiration date.
    pub expiration: NaiveDate,
    /// Put or call.
    pub option_type: OptionType,
    /// Strike price.
    pub strike: f64,
    /// Best bid, absent when the broker has no quote.
    pub bid: Option<f64>,
    /// Best ask, absent when the broker has no quote.
    pub ask: Option<f64>,
    /// Last trade price, if any.
    pub last: Option<f64>,
    /// Session volume.
    pub volume: u64,
    /// Open interest.
    pub open_interest: u64,
    /// Greeks, present only when requested and supplied by the broker.
    pub greeks: Option<Greeks>,
}

impl OptionContract {
    /// Mid price, `(bid + ask) / 2`.
    ///
    /// `None` unless the quote is two-sided: both sides present, finite and
    /// non-negative, with a positive ask.
    #[must_use]
    pub fn mid_price(&self) -> Option<f64> {
        let (bid, ask) = (self.bid?, self.ask?);
        if !bid.is_finite() || !ask.is_finite() || bid < 0.0 || ask <= 0.0 {
            return None;
        }
        Some((bid + ask) / 2.0)
    }

    /// Delta, if greeks are attached.
    #[must_use]
    pub fn delta(&self) -> Option<f64> {
        self.greeks.map(|g| g.delta)
    }

    /// Check if this is a put.
    #[must_use]
    pub const fn is_put(&self) -> bool {
        matches!(self.option_type, OptionType::Put)
    }

    /// Check if this is a call.
    #[must_use]
    pub const fn is_call(&self) -> bool {
        matches!(self.option_type, OptionType::Call)
    }

    /// Days to expiration as of `today`. Negative once expired.
    #[must_use]
    pub fn days_to_expiration(&self, today: NaiveDate) -> i64 {
        (self.expiration - today).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn contract(bid: Option<f64>, ask: Option<f64>) -> OptionContract {
        OptionContract {
            symbol: "SPY250117P00450000".to_string(),
            underlying: "SPY".to_string(),
            expiration: NaiveDate::from_ymd_opt(2025, 1, 17).unwrap(),
            option_type: OptionType::Put,
            strike: 450.0,
            bid,
            ask,
            last: None,
            volume: 0,
            open_interest: 0,
            greeks: None,
        }
    }

    #[test]
    fn option_type_code_and_display() {
        assert_eq!(OptionType::Put.code(), 'P');
        assert_eq!(OptionType::Call.code(), 'C');
        assert_eq!(OptionType::Put.to_string(), "put");
    }

    #[test]
    fn option_type_parse() {
        assert_eq!(OptionType::parse("PUT"), Some(OptionType::Put));
        assert_eq!(OptionType::parse(" call "), Some(OptionType::Call));
        assert_eq!(OptionType::parse("straddle"), None);
    }

    #[test]
    fn option_type_serde() {
        let json = serde_json::to_string(&OptionType::Call).unwrap();
        assert_eq!(json, "\"call\"");
    }

    #[test]
    fn mid_price_averages_bid_and_ask() {
        let mid = contract(Some(1.10), Some(1.30)).mid_price().unwrap();
        assert!((mid - 1.20).abs() < 1e-9);
        assert_eq!(contract(Some(0.0), Some(0.10)).mid_price(), Some(0.05));
    }

    #[test_case(None, Some(1.30) ; "no bid")]
    #[test_case(Some(1.10), None ; "no ask")]
    #[test_case(None, None ; "no quote")]
    #[test_case(Some(0.0), Some(0.0) ; "zero ask")]
    #[test_case(Some(f64::NAN), Some(1.30) ; "nan bid")]
    #[test_case(Some(-0.05), Some(1.30) ; "negative bid")]
    fn mid_price_requires_two_sided_quote(bid: Option<f64>, ask: Option<f64>) {
        assert_eq!(contract(bid, ask).mid_price(), None);
    }

    #[test]
    fn delta_absent_without_greeks() {
        let mut c = contract(Some(1.0), Some(1.2));
        assert!(c.delta().is_none());
        c.greeks = Some(Greeks::with_delta(-0.16));
        assert_eq!(c.delta(), Some(-0.16));
    }

    #[test]
    fn days_to_expiration() {
        let c = contract(Some(1.0), Some(1.2));
        let today = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        assert_eq!(c.days_to_expiration(today), 7);
    }
}
