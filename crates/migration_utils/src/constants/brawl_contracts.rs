use std::{collections::HashMap, str::FromStr};

use ethers::{prelude::Lazy, types::Address};
use provider_utils::enums::ENetwork;

use super::ZERO_ADDRESS;

pub const BLOCK_BRAWLERS_NFT_NAME: &str = "BlockBrawlers";
pub const BLOCK_BRAWLERS_NFT_TYPE: &str = "ERC-721";

/// BlockBrawlers hero collection on the source chain
pub static BLOCK_BRAWLERS_NFTS: Lazy<HashMap<ENetwork, Address>> = Lazy::new(|| {
    HashMap::from([
        (
            ENetwork::SkaleBlockBrawlers,
            Address::from_str("0xD2963F7e218609B91373cDdA853b20746bA24D61").unwrap(),
        ),
        (ENetwork::SkaleNebula, *ZERO_ADDRESS),
        (ENetwork::SkaleNebulaTestnet, *ZERO_ADDRESS),
    ])
});

/// BRAWL token accepting `batchMint` on the target chain
pub static BRAWL_TOKENS: Lazy<HashMap<ENetwork, Address>> = Lazy::new(|| {
    HashMap::from([
        (ENetwork::SkaleBlockBrawlers, *ZERO_ADDRESS),
        (ENetwork::SkaleNebula, *ZERO_ADDRESS),
        (
            ENetwork::SkaleNebulaTestnet,
            Address::from_str("0xE8b11401351aD4501305fa8E04E259B818af752F").unwrap(),
        ),
    ])
});

/// Heroes collection accepting `mintBatch` on the target chain
pub static BRAWL_HEROES: Lazy<HashMap<ENetwork, Address>> = Lazy::new(|| {
    HashMap::from([
        (ENetwork::SkaleBlockBrawlers, *ZERO_ADDRESS),
        (ENetwork::SkaleNebula, *ZERO_ADDRESS),
        (
            ENetwork::SkaleNebulaTestnet,
            Address::from_str("0xd1A9ECdF1acA8b3d525ecF2365f7341dEA2dDD3F").unwrap(),
        ),
    ])
});
