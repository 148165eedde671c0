mod airdrop_service;
mod balance_snapshot_service;
mod chain_contracts;
mod nft_snapshot_service;

pub use airdrop_service::*;
pub use balance_snapshot_service::*;
pub use chain_contracts::*;
pub use nft_snapshot_service::*;
