//! Account position as reported by the broker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Quantity below which a position counts as short. Broker quantities are
/// floats and may carry rounding noise around zero.
pub const SHORT_QUANTITY_THRESHOLD: f64 = -0.001;

/// One open holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Broker position id.
    pub id: i64,
    /// Option (OCC) or equity symbol.
    pub symbol: String,
    /// Signed quantity; negative is short.
    pub quantity: f64,
    /// Total cost basis.
    pub cost_basis: f64,
    /// When the position was opened.
    pub date_acquired: Option<DateTime<Utc>>,
}

impl Position {
    /// Returns true if the quantity is meaningfully negative.
    #[must_use]
    pub fn is_short(&self) -> bool {
        self.quantity < SHORT_QUANTITY_THRESHOLD
    }
}
