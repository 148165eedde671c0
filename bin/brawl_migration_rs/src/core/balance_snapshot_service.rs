use std::{path::PathBuf, sync::Arc, time::Instant};

use anyhow::anyhow;
use ethers::{
    providers::{Http, JsonRpcClient, Middleware, Provider},
    types::BlockNumber,
};
use futures::future::try_join_all;
use migration_toolkit::{
    explorer::{AccountPages, ExplorerClient},
    filters::BalanceFilter,
    paginator::collect_account_pages,
    records::BalanceRecord,
    snapshot::{
        write_snapshot, BalanceSnapshot, BalanceSnapshotData, SnapshotBlock, SnapshotDocument,
        SnapshotTimestamp, BRAWL_SNAPSHOT_PREFIX,
    },
};
use provider_utils::networks::{get_network_config, NetworkConfig};

use crate::{constants::Env, types::BalanceSnapshotConfig};

pub struct BalanceSnapshotService {
    env: Env,
    config: BalanceSnapshotConfig,
    http_provider: Arc<Provider<Http>>,
}

impl BalanceSnapshotService {
    pub fn new(
        env: Env,
        config: BalanceSnapshotConfig,
        http_provider: Arc<Provider<Http>>,
    ) -> Self {
        Self {
            env,
            config,
            http_provider,
        }
    }

    /// Capture every player's BRAWL balance into `brawl-snapshot-<block>.json`
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

        let explorer = ExplorerClient::new(&self.config.explorer_url)?;
        let mut document =
            collect_balance_snapshot(&explorer, block, network_config, &self.config).await?;

        if self.config.detect_contracts {
            tag_contracts(
                self.http_provider.as_ref(),
                &mut document.data.balances,
                self.config.code_batch_size,
            )
            .await?;
        }

        let path = write_snapshot(&self.env.snapshot_dir, BRAWL_SNAPSHOT_PREFIX, &document)?;
        log::info!("Snapshot Completed In {:?}", start_time.elapsed());
        log::info!("Snapshot written to: {:?}", path);

        Ok(path)
    }
}

/// Flag accounts holding code, `batch_size` concurrent `getCode` calls at a time. Returns how
/// many accounts are contracts. The first failed lookup aborts the tagging.
pub async fn tag_contracts<P: JsonRpcClient>(
    provider: &Provider<P>,
    balances: &mut [BalanceRecord],
    batch_size: usize,
) -> anyhow::Result<usize> {
    if batch_size == 0 {
        return Err(anyhow!("contract check batch size must be greater than zero"));
    }

    let mut contracts = 0;
    for chunk in balances.chunks_mut(batch_size) {
        let codes = try_join_all(
            chunk
                .iter()
                .map(|record| provider.get_code(record.address, None)),
        )
        .await?;
        for (record, code) in chunk.iter_mut().zip(codes) {
            let is_contract = !code.is_empty();
            contracts += is_contract as usize;
            record.is_contract = Some(is_contract);
        }
    }
    log::info!("{} of {} accounts are contracts", contracts, balances.len());
    Ok(contracts)
}

pub async fn collect_balance_snapshot<S: AccountPages + ?Sized>(
    source: &S,
    block: SnapshotBlock,
    network_config: &NetworkConfig,
    config: &BalanceSnapshotConfig,
) -> anyhow::Result<BalanceSnapshot> {
    let accounts = collect_account_pages(source, config.page_size).await?;
    log::info!("Balances: {}", accounts.len());

    let filter = BalanceFilter::new(config.deny_list.iter().copied(), config.max_balance);
    let balances = filter.apply(accounts);

    Ok(SnapshotDocument {
        block,
        data: BalanceSnapshotData {
            skale_chain_name: network_config.skale_chain_name.clone(),
            chain_name: network_config.chain_name.clone(),
            balances,
        },
        timestamp: SnapshotTimestamp::now(),
    })
}
