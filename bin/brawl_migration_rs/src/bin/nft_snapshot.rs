use std::sync::Arc;

use brawl_migration_rs::{constants::Env, core::NftSnapshotService, types::NftSnapshotConfig};
use migration_utils::log::setup_logger;
use provider_utils::http_providers::HttpProviders;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    setup_logger(None)?;

    let env = Env::new()?;
    let config = NftSnapshotConfig::from_env(&env)?;
    log::info!(
        "nft snapshot of {:?} on {:?}",
        config.contract_address,
        env.source_network
    );

    let http_provider = HttpProviders::get_healthy_provider(&env.source_network).await?;
    let nft_snapshot_service = NftSnapshotService::new(env, config, Arc::new(http_provider));
    nft_snapshot_service.take_snapshot().await?;
    Ok(())
}
