//! Order DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order status as reported by the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Accepted by the broker (placement acknowledgment).
    Ok,
    /// Received, not yet working.
    #[default]
    Pending,
    /// Working.
    Open,
    /// Partially filled.
    PartiallyFilled,
    /// Completely filled.
    Filled,
    /// Expired unfilled.
    Expired,
    /// Canceled.
    Canceled,
    /// Rejected.
    Rejected,
    /// Broker-side error.
    Error,
    /// Any status the broker adds later.
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Returns true if the order can no longer change.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Filled | Self::Expired | Self::Canceled | Self::Rejected | Self::Error
        )
    }
}

/// One leg of a multileg order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderLegResult {
    /// Leg id.
    pub id: Option<i64>,
    /// OCC symbol.
    pub option_symbol: Option<String>,
    /// Leg side.
    pub side: Option<String>,
    /// Leg quantity.
    pub quantity: Option<f64>,
    /// Leg status.
    pub status: OrderStatus,
    /// Quantity executed.
    pub exec_quantity: Option<f64>,
    /// Average fill price.
    pub avg_fill_price: Option<f64>,
}

/// Broker view of an order: the placement acknowledgment or a later status
/// lookup. Fields the broker did not send are `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderResult {
    /// Broker order id. Absent for previews.
    pub id: Option<i64>,
    /// Current status.
    pub status: OrderStatus,
    /// Order class.
    pub class: Option<String>,
    /// Net order type.
    pub order_type: Option<String>,
    /// Underlying or option symbol.
    pub symbol: Option<String>,
    /// Side (single-leg orders).
    pub side: Option<String>,
    /// Ordered quantity.
    pub quantity: Option<f64>,
    /// Duration.
    pub duration: Option<String>,
    /// Limit price.
    pub price: Option<f64>,
    /// Average fill price.
    pub avg_fill_price: Option<f64>,
    /// Quantity executed so far.
    pub exec_quantity: Option<f64>,
    /// Price of the last fill.
    pub last_fill_price: Option<f64>,
    /// Quantity of the last fill.
    pub last_fill_quantity: Option<f64>,
    /// Quantity still working.
    pub remaining_quantity: Option<f64>,
    /// Creation time.
    pub create_date: Option<DateTime<Utc>>,
    /// Last transaction time.
    pub transaction_date: Option<DateTime<Utc>>,
    /// Idempotency tag.
    pub tag: Option<String>,
    /// Partner id from the placement acknowledgment.
    pub partner_id: Option<String>,
    /// Legs of a multileg or OTOCO order.
    pub legs: Vec<OrderLegResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_values() {
        let status: OrderStatus = serde_json::from_str("\"partially_filled\"").unwrap();
        assert_eq!(status, OrderStatus::PartiallyFilled);
        let status: OrderStatus = serde_json::from_str("\"ok\"").unwrap();
        assert_eq!(status, OrderStatus::Ok);
        let status: OrderStatus = serde_json::from_str("\"held\"").unwrap();
        assert_eq!(status, OrderStatus::Unknown);
    }

    #[test]
    fn terminal_statuses() {
        assert!(OrderStatus::Filled.is_terminal());
        assert!(OrderStatus::Canceled.is_terminal());
        assert!(!OrderStatus::Open.is_terminal());
        assert!(!OrderStatus::PartiallyFilled.is_terminal());
        assert!(!OrderStatus::Ok.is_terminal());
    }
}
