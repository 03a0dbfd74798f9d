//! Data Transfer Objects (DTOs)
//!
//! Results returned through the broker port.

mod account_dto;
mod market_dto;
mod order_dto;

pub use account_dto::AccountBalances;
pub use market_dto::{
    CalendarDay, Expiration, HistoricalBar, HistoryInterval, MarketClock, MarketState, Quote,
    SessionHours,
};
pub use order_dto::{OrderLegResult, OrderResult, OrderStatus};
