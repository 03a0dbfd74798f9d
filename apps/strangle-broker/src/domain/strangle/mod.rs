//! Short strangle strategy helpers: strike selection, credit and position
//! matching. All pure functions over already-fetched data.

mod credit;
mod errors;
mod position;
mod position_matcher;
mod strike_selector;

pub use credit::{STRIKE_EPSILON, strangle_credit};
pub use errors::StrategyError;
pub use position::{Position, SHORT_QUANTITY_THRESHOLD};
pub use position_matcher::{OpenStrangle, find_open_strangle};
pub use strike_selector::{StrangleStrikes, select_strangle_strikes};
