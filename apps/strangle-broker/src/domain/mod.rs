//! Domain Layer
//!
//! Broker-independent types and pure logic: the OCC symbol codec, order
//! validation and construction, and the strangle strategy helpers.

pub mod option_contract;
pub mod order;
pub mod strangle;
