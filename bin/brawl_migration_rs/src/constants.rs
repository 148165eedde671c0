use std::{path::PathBuf, str::FromStr};

use anyhow::anyhow;
use ethers::types::U64;
use migration_utils::env::get_env;
use provider_utils::{enums::ENetwork, networks::get_network_config};

pub const DEFAULT_SOURCE_NETWORK: &str = "SKALE_BLOCK_BRAWLERS";
pub const DEFAULT_TARGET_NETWORK: &str = "SKALE_NEBULA_TESTNET";
pub const DEFAULT_SNAPSHOT_DIR: &str = "snapshots";

pub const DEFAULT_NFT_BATCH_SIZE: &str = "100";
pub const DEFAULT_BALANCE_PAGE_SIZE: &str = "250";
pub const DEFAULT_CONTRACT_CHECK_BATCH_SIZE: &str = "100";
pub const DEFAULT_BRAWL_CHUNK_SIZE: &str = "50";
pub const DEFAULT_HEROES_CHUNK_SIZE: &str = "250";
pub const DEFAULT_BATCH_MINT_GAS: &str = "268000000";

#[derive(Debug, Clone)]
pub struct Env {
    /// Chain the snapshots are read from
    pub source_network: ENetwork,
    /// Chain the airdrops are minted on
    pub target_network: ENetwork,
    pub target_chain_id: U64,
    pub snapshot_dir: PathBuf,
}

impl Env {
    pub fn new() -> anyhow::Result<Self> {
        let source_network = parse_network("SOURCE_NETWORK", DEFAULT_SOURCE_NETWORK)?;
        let target_network = parse_network("TARGET_NETWORK", DEFAULT_TARGET_NETWORK)?;
        let target_config = get_network_config(&target_network)?;

        Ok(Self {
            source_network,
            target_network,
            target_chain_id: U64::from(target_config.chain_id),
            snapshot_dir: PathBuf::from(get_env("SNAPSHOT_DIR", Some(DEFAULT_SNAPSHOT_DIR))?),
        })
    }
}

fn parse_network(key: &str, default_value: &str) -> anyhow::Result<ENetwork> {
    let network_str = get_env(key, Some(default_value))?;
    ENetwork::from_str(&network_str).map_err(|_| anyhow!("{} {:?} invalid", key, network_str))
}
