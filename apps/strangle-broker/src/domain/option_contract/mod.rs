//! Option contracts and the OCC symbol codec.

mod contract;
pub mod symbol;

pub use contract::{Greeks, OptionContract, OptionType};
pub use symbol::{OccSymbol, SymbolCodec, SymbolError, decode, encode, type_of};
