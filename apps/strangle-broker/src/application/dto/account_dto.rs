//! Account DTOs

use serde::{Deserialize, Serialize};

/// Account balances and buying power.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AccountBalances {
    /// Account number.
    pub account_number: String,
    /// Account type ("cash", "margin" or "pdt").
    pub account_type: String,
    /// Total equity.
    pub total_equity: f64,
    /// Total cash.
    pub total_cash: f64,
    /// Market value of all positions.
    pub market_value: f64,
    /// Buying power available for options.
    pub option_buying_power: f64,
    /// Buying power available for stock.
    pub stock_buying_power: f64,
    /// Market value of short options.
    pub option_short_value: f64,
    /// Number of working orders.
    pub pending_orders_count: i64,
}
