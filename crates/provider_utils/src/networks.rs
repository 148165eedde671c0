use ethers::prelude::Lazy;
use std::collections::HashMap;

use crate::enums::ENetwork;

#[derive(Debug, Clone, Default)]
pub struct NetworkConfig {
    pub network: ENetwork,
    pub chain_id: u64,
    /// Human readable name stored in snapshot documents
    pub chain_name: String,
    /// SKALE chain identifier, e.g. `frayed-decent-antares`
    pub skale_chain_name: String,
    pub rpc_url: Vec<String>,
    pub explorer_url: String,
}

pub static NETWORKS: Lazy<HashMap<ENetwork, NetworkConfig>> = Lazy::new(|| {
    HashMap::from([
        (
            ENetwork::SkaleBlockBrawlers,
            NetworkConfig {
                network: ENetwork::SkaleBlockBrawlers,
                chain_id: 391845894,
                chain_name: "BRAWL Chain".to_string(),
                skale_chain_name: "frayed-decent-antares".to_string(),
                rpc_url: vec![
                    "https://mainnet.skalenodes.com/v1/frayed-decent-antares".to_string(),
                ],
                explorer_url: "https://frayed-decent-antares.explorer.mainnet.skalenodes.com"
                    .to_string(),
            },
        ),
        (
            ENetwork::SkaleNebula,
            NetworkConfig {
                network: ENetwork::SkaleNebula,
                chain_id: 1482601649,
                chain_name: "SKALE Nebula Hub".to_string(),
                skale_chain_name: "green-giddy-denebola".to_string(),
                rpc_url: vec!["https://mainnet.skalenodes.com/v1/green-giddy-denebola".to_string()],
                explorer_url: "https://green-giddy-denebola.explorer.mainnet.skalenodes.com"
                    .to_string(),
            },
        ),
        (
            ENetwork::SkaleNebulaTestnet,
            NetworkConfig {
                network: ENetwork::SkaleNebulaTestnet,
                chain_id: 37084624,
                chain_name: "SKALE Nebula Hub Testnet".to_string(),
                skale_chain_name: "lanky-ill-funny-testnet".to_string(),
                rpc_url: vec![
                    "https://testnet.skalenodes.com/v1/lanky-ill-funny-testnet".to_string(),
                ],
                explorer_url: "https://lanky-ill-funny-testnet.explorer.testnet.skalenodes.com"
                    .to_string(),
            },
        ),
    ])
});

pub fn get_network_config(network: &ENetwork) -> anyhow::Result<&'static NetworkConfig> {
    NETWORKS
        .get(network)
        .ok_or_else(|| anyhow::anyhow!("NETWORKS {:?} not found", network))
}
