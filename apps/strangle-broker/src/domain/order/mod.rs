//! Order parameters, validation and request construction.

mod builder;
mod duration;
mod errors;
mod order_types;
mod params;
mod request;
mod tag;

pub use builder::OrderBuilder;
pub use duration::OrderDuration;
pub use errors::ValidationError;
pub use order_types::{CloseSide, OrderClass, OrderSide, OrderType};
pub use params::{CloseOrderParams, ProfitTarget, StrangleCloseParams, StrangleOrderParams};
pub use request::{OrderLeg, OrderRequest, OtocoRequest};
pub use tag::OrderTag;
