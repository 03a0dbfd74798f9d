//! Application Layer
//!
//! - **Ports**: the broker capability contract and its error taxonomy
//! - **Use Cases**: strangle workflows composed from ports and domain helpers
//! - **DTOs**: results returned through the ports

pub mod dto;
pub mod ports;
pub mod use_cases;

pub use dto::*;
pub use ports::*;
pub use use_cases::*;
