//! Market Data DTOs
//!
//! Field names follow the broker's JSON so these deserialize directly.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Latest quote for an equity or option.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Quote {
    /// Symbol.
    pub symbol: String,
    /// Description.
    pub description: String,
    /// Instrument type ("stock", "option", "etf", "index").
    #[serde(rename = "type")]
    pub instrument_type: String,
    /// Last trade price.
    pub last: Option<f64>,
    /// Best bid.
    pub bid: Option<f64>,
    /// Best ask.
    pub ask: Option<f64>,
    /// Session open.
    pub open: Option<f64>,
    /// Session high.
    pub high: Option<f64>,
    /// Session low.
    pub low: Option<f64>,
    /// Previous close.
    pub prevclose: Option<f64>,
    /// Net change.
    pub change: Option<f64>,
    /// Session volume.
    pub volume: Option<u64>,
}

impl Quote {
    /// Mid price when both sides are quoted.
    #[must_use]
    pub fn mid_price(&self) -> Option<f64> {
        Some((self.bid? + self.ask?) / 2.0)
    }
}

/// One listed expiration, optionally with its strikes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expiration {
    /// Expiration date.
    pub date: NaiveDate,
    /// Listed strikes; empty unless requested.
    pub strikes: Vec<f64>,
}

/// Market session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketState {
    /// Pre-market session.
    Premarket,
    /// Regular session.
    Open,
    /// Post-market session.
    Postmarket,
    /// Closed.
    Closed,
    /// Any state the broker adds later.
    #[serde(other)]
    Unknown,
}

/// Market clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketClock {
    /// Current market date.
    pub date: NaiveDate,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Current state.
    pub state: MarketState,
    /// Unix timestamp of the clock reading.
    pub timestamp: i64,
    /// Time of the next state change ("HH:MM").
    #[serde(default)]
    pub next_change: String,
    /// State after the next change.
    pub next_state: MarketState,
}

impl MarketClock {
    /// Returns true during the regular session.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.state, MarketState::Open)
    }
}

/// Session hours for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionHours {
    /// Session start (exchange local time).
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    /// Session end (exchange local time).
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

/// One day of the market calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarDay {
    /// Date.
    pub date: NaiveDate,
    /// "open" or "closed".
    pub status: String,
    /// Holiday or session description.
    #[serde(default)]
    pub description: String,
    /// Regular session hours, absent on closed days.
    #[serde(default)]
    pub open: Option<SessionHours>,
}

impl CalendarDay {
    /// Returns true if the market trades on this day.
    #[must_use]
    pub fn is_trading_day(&self) -> bool {
        self.status.eq_ignore_ascii_case("open")
    }
}

/// Bar interval for historical prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryInterval {
    /// One bar per day.
    #[default]
    Daily,
    /// One bar per week.
    Weekly,
    /// One bar per month.
    Monthly,
}

impl HistoryInterval {
    /// Wire value for the `interval` parameter.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

/// One OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalBar {
    /// Bar date.
    pub date: NaiveDate,
    /// Open.
    pub open: f64,
    /// High.
    pub high: f64,
    /// Low.
    pub low: f64,
    /// Close.
    pub close: f64,
    /// Volume.
    #[serde(default)]
    pub volume: u64,
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_tolerates_nulls() {
        let json = r#"{"symbol":"SPY","description":"SPDR S&P 500","type":"etf",
            "last":450.1,"bid":450.05,"ask":450.15,"volume":null,"change":null}"#;
        let quote: Quote = serde_json::from_str(json).unwrap();
        assert_eq!(quote.symbol, "SPY");
        assert_eq!(quote.instrument_type, "etf");
        assert_eq!(quote.volume, None);
        assert!((quote.mid_price().unwrap() - 450.10).abs() < 1e-9);
    }

    #[test]
    fn clock_parses_states() {
        let json = r#"{"date":"2025-01-17","description":"Market is open from 09:30 to 16:00",
            "state":"open","timestamp":1737124200,"next_change":"16:00","next_state":"postmarket"}"#;
        let clock: MarketClock = serde_json::from_str(json).unwrap();
        assert!(clock.is_open());
        assert_eq!(clock.next_state, MarketState::Postmarket);
    }

    #[test]
    fn unknown_state_does_not_fail() {
        let json = r#"{"date":"2025-01-17","state":"halted","timestamp":0,"next_state":"open"}"#;
        let clock: MarketClock = serde_json::from_str(json).unwrap();
        assert_eq!(clock.state, MarketState::Unknown);
    }

    #[test]
    fn calendar_day_with_and_without_hours() {
        let open: CalendarDay = serde_json::from_str(
            r#"{"date":"2025-01-17","status":"open","open":{"start":"09:30","end":"16:00"}}"#,
        )
        .unwrap();
        assert!(open.is_trading_day());
        assert_eq!(
            open.open.unwrap().start,
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );

        let closed: CalendarDay = serde_json::from_str(
            r#"{"date":"2025-01-20","status":"closed","description":"Martin Luther King Day"}"#,
        )
        .unwrap();
        assert!(!closed.is_trading_day());
        assert!(closed.open.is_none());
    }
}
