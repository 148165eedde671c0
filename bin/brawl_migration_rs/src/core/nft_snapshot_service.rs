use std::{path::PathBuf, sync::Arc, time::Instant};

use anyhow::anyhow;
use ethers::{
    providers::{Http, Middleware, Provider},
    types::{Address, BlockNumber},
};
use migration_toolkit::{
    paginator::{read_tokens, read_total_supply, NftSource},
    snapshot::{
        write_snapshot, NftContractInfo, NftSnapshot, NftSnapshotData, SnapshotBlock,
        SnapshotDocument, SnapshotTimestamp, NFT_SNAPSHOT_PREFIX,
    },
};
use migration_utils::{
    abi::block_brawlers_erc721_abi,
    constants::{BLOCK_BRAWLERS_NFT_NAME, BLOCK_BRAWLERS_NFT_TYPE},
};
use provider_utils::networks::{get_network_config, NetworkConfig};

use crate::{constants::Env, core::ContractNftSource, types::NftSnapshotConfig};

pub struct NftSnapshotService {
    env: Env,
    config: NftSnapshotConfig,
    http_provider: Arc<Provider<Http>>,
}

impl NftSnapshotService {
    pub fn new(env: Env, config: NftSnapshotConfig, http_provider: Arc<Provider<Http>>) -> Self {
        Self {
            env,
            config,
            http_provider,
        }
    }

    /// Capture owner and hero code of every BlockBrawlers token into `nft-snapshot-<block>.json`
    pub async fn take_snapshot(&self) -> anyhow::Result<PathBuf> {
        let start_time = Instant::now();
        let network_config = get_network_config(&self.env.source_network)?;

        let block = self
            .http_provider
            .get_block(BlockNumber::Latest)
            .await?
            .ok_or(anyhow!("latest block not found"))?;
        let block = SnapshotBlock::from_block(&block)?;
        log::info!("snapshot at block {} {:?}", block.number, block.hash);

        let source = ContractNftSource::new(self.config.contract_address, self.http_provider.clone());
        let document = collect_nft_snapshot(
            &source,
            block,
            network_config,
            self.config.contract_address,
            self.config.batch_size,
        )
        .await?;

        let path = write_snapshot(&self.env.snapshot_dir, NFT_SNAPSHOT_PREFIX, &document)?;
        log::info!("Snapshot Completed In {:?}", start_time.elapsed());
        log::info!("Snapshot written to: {:?}", path);

        Ok(path)
    }
}

pub async fn collect_nft_snapshot<S: NftSource + ?Sized>(
    source: &S,
    block: SnapshotBlock,
    network_config: &NetworkConfig,
    contract_address: Address,
    batch_size: u64,
) -> anyhow::Result<NftSnapshot> {
    let total_supply = read_total_supply(source).await?;
    log::info!("Total Supply: {}", total_supply);

    let tokens = read_tokens(source, total_supply, batch_size).await?;

    Ok(SnapshotDocument {
        block,
        data: NftSnapshotData {
            skale_chain_name: network_config.skale_chain_name.clone(),
            chain_name: network_config.chain_name.clone(),
            contract: NftContractInfo {
                name: BLOCK_BRAWLERS_NFT_NAME.to_string(),
                kind: BLOCK_BRAWLERS_NFT_TYPE.to_string(),
                address: contract_address,
                abi: block_brawlers_erc721_abi()?,
            },
            tokens,
            total_supply: total_supply.into(),
        },
        timestamp: SnapshotTimestamp::now(),
    })
}

#[cfg(test)]
mod tests {
    use ethers::types::{H256, U256};
    use migration_toolkit::{
        paginator::MockNftSource,
        snapshot::{read_snapshot, NftSnapshotData},
    };
    use provider_utils::enums::ENetwork;
    use tempfile::tempdir;

    use super::*;

    #[tokio::test]
    async fn nft_snapshot_round_trips_through_disk() {
        let mut source = MockNftSource::new();
        source.expect_total_supply().returning(|| Ok(U256::from(130)));
        source.expect_owner_of().returning(|token_id| {
            if token_id.as_u64() % 10 == 0 {
                Ok(Address::zero())
            } else {
                Ok(Address::from_low_u64_be(token_id.as_u64()))
            }
        });
        source
            .expect_hero_of()
            .returning(|token_id| Ok(token_id + U256::from(5000)));

        let block = SnapshotBlock {
            number: 7460737,
            hash: H256::repeat_byte(9),
            timestamp: U256::from(1_718_000_000u64),
        };
        let network_config = get_network_config(&ENetwork::SkaleBlockBrawlers).unwrap();
        let contract_address = Address::from_low_u64_be(0xd2);

        let document = collect_nft_snapshot(&source, block, network_config, contract_address, 100)
            .await
            .unwrap();
        assert_eq!(document.data.tokens.len(), 130);
        assert_eq!(document.data.total_supply, U256::from(130));
        assert_eq!(document.data.chain_name, "BRAWL Chain");
        assert_eq!(document.data.skale_chain_name, "frayed-decent-antares");
        assert_eq!(document.data.contract.kind, "ERC-721");

        let dir = tempdir().unwrap();
        let path = write_snapshot(dir.path(), NFT_SNAPSHOT_PREFIX, &document).unwrap();
        assert!(path.ends_with("nft-snapshot-7460737.json"));

        let parsed = read_snapshot::<NftSnapshotData>(&path).unwrap();
        assert_eq!(parsed.data.tokens, document.data.tokens);
        assert_eq!(parsed.data.tokens[129].hero_code, "5129");
    }
}
