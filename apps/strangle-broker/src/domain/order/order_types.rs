//! Order side, class and type as the broker spells them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of one option leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSide {
    /// Open a short position.
    SellToOpen,
    /// Open a long position.
    BuyToOpen,
    /// Close a short position.
    BuyToClose,
    /// Close a long position.
    SellToClose,
}

impl OrderSide {
    /// Wire value for `side[n]`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SellToOpen => "sell_to_open",
            Self::BuyToOpen => "buy_to_open",
            Self::BuyToClose => "buy_to_close",
            Self::SellToClose => "sell_to_close",
        }
    }

    /// Returns true for closing sides.
    #[must_use]
    pub const fn is_closing(&self) -> bool {
        matches!(self, Self::BuyToClose | Self::SellToClose)
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side accepted by single-leg close orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseSide {
    /// Close a short position.
    BuyToClose,
    /// Close a long position.
    SellToClose,
}

impl From<CloseSide> for OrderSide {
    fn from(side: CloseSide) -> Self {
        match side {
            CloseSide::BuyToClose => Self::BuyToClose,
            CloseSide::SellToClose => Self::SellToClose,
        }
    }
}

/// Order class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderClass {
    /// Single option leg.
    Option,
    /// Two or more legs priced as one.
    Multileg,
    /// One-triggers-one-cancels-other.
    Otoco,
}

impl OrderClass {
    /// Wire value for `class`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Option => "option",
            Self::Multileg => "multileg",
            Self::Otoco => "otoco",
        }
    }
}

/// Net order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Fill at market.
    Market,
    /// Single-leg limit.
    Limit,
    /// Multileg for a net credit.
    Credit,
    /// Multileg for a net debit.
    Debit,
}

impl OrderType {
    /// Wire value for `type`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Market => "market",
            Self::Limit => "limit",
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }

    /// Returns true if the order carries a limit price.
    #[must_use]
    pub const fn requires_price(&self) -> bool {
        !matches!(self, Self::Market)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_wire_values() {
        assert_eq!(OrderSide::SellToOpen.as_str(), "sell_to_open");
        assert_eq!(OrderSide::BuyToClose.to_string(), "buy_to_close");
        assert!(OrderSide::SellToClose.is_closing());
        assert!(!OrderSide::SellToOpen.is_closing());
    }

    #[test]
    fn close_side_converts() {
        assert_eq!(OrderSide::from(CloseSide::BuyToClose), OrderSide::BuyToClose);
        assert_eq!(
            OrderSide::from(CloseSide::SellToClose),
            OrderSide::SellToClose
        );
    }

    #[test]
    fn order_type_price_requirement() {
        assert!(!OrderType::Market.requires_price());
        assert!(OrderType::Credit.requires_price());
        assert!(OrderType::Debit.requires_price());
        assert!(OrderType::Limit.requires_price());
    }

    #[test]
    fn class_wire_values() {
        assert_eq!(OrderClass::Multileg.as_str(), "multileg");
        assert_eq!(OrderClass::Otoco.as_str(), "otoco");
    }
}
