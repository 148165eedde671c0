mod addresses;
mod brawl_contracts;

pub use addresses::*;
pub use brawl_contracts::*;
