use std::{path::PathBuf, sync::Arc};

use anyhow::anyhow;
use brawl_migration_rs::{
    constants::Env,
    core::AirdropService,
    types::{AirdropConfig, AirdropKind},
};
use migration_toolkit::snapshot::{read_snapshot, BalanceSnapshotData};
use migration_utils::log::setup_logger;
use provider_utils::http_providers::HttpProviders;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    setup_logger(None)?;

    let snapshot_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .ok_or(anyhow!("usage: airdrop_brawl <brawl-snapshot-BLOCK.json>"))?;

    let env = Env::new()?;
    let config = AirdropConfig::from_env(&env, AirdropKind::Brawl)?;
    if !env.target_network.is_testnet() {
        log::warn!("minting on {:?}, not a testnet", env.target_network);
    }
    let snapshot = read_snapshot::<BalanceSnapshotData>(&snapshot_path)?;

    let http_provider = HttpProviders::get_healthy_provider(&env.target_network).await?;
    let airdrop_service = AirdropService::new(config, Arc::new(http_provider));
    airdrop_service
        .airdrop_brawl(&snapshot, &snapshot_path)
        .await?;
    Ok(())
}
