use serde::{Deserialize, Serialize};
use strum_macros::EnumString;

#[derive(
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Clone,
    Copy,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ENetwork {
    /// BRAWL Chain, the SKALE chain the game migrates away from
    #[default]
    SkaleBlockBrawlers,
    SkaleNebula,
    SkaleNebulaTestnet,
}

impl ENetwork {
    pub fn is_testnet(&self) -> bool {
        matches!(self, ENetwork::SkaleNebulaTestnet)
    }
}
