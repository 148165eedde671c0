use anyhow::anyhow;
use ethers::providers::{Http, Middleware, Provider};

use crate::{
    constants::{DESERIALIZATION_ERROR_MSG, DNS_LOOKUP_ERROR_MSG},
    enums::ENetwork,
    networks::get_network_config,
};

pub struct HttpProviders;

impl HttpProviders {
    pub fn get_providers(network: &ENetwork) -> anyhow::Result<Vec<Provider<Http>>> {
        let network = get_network_config(network)?;

        let mut providers = Vec::new();
        for url in &network.rpc_url {
            let provider = Provider::<Http>::try_from(url.as_str())?;
            providers.push(provider);
        }

        Ok(providers)
    }

    /// First provider answering `eth_blockNumber`. Unreachable endpoints are skipped,
    /// any other rpc error is returned as is.
    pub async fn get_healthy_provider(network: &ENetwork) -> anyhow::Result<Provider<Http>> {
        let providers = Self::get_providers(network)?;

        for provider in providers {
            match provider.get_block_number().await {
                Ok(_) => {
                    return Ok(provider);
                }
                Err(err) => {
                    let err_string = err.to_string();
                    if err_string.contains(DNS_LOOKUP_ERROR_MSG)
                        || err_string.contains(DESERIALIZATION_ERROR_MSG)
                    {
                        log::info!("Provider {:?} is unavailable !!", provider.url().host());
                        continue;
                    }
                    return Err(err.into());
                }
            }
        }

        Err(anyhow!("All providers failed to retrieve the block number"))
    }
}
