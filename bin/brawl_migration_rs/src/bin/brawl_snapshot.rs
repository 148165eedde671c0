use std::sync::Arc;

use brawl_migration_rs::{
    constants::Env, core::BalanceSnapshotService, types::BalanceSnapshotConfig,
};
use migration_utils::log::setup_logger;
use provider_utils::http_providers::HttpProviders;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    setup_logger(None)?;

    let env = Env::new()?;
    let config = BalanceSnapshotConfig::from_env(&env)?;
    log::info!(
        "balance snapshot of {:?} via {}",
        env.source_network,
        config.explorer_url
    );

    let http_provider = HttpProviders::get_healthy_provider(&env.source_network).await?;
    let balance_snapshot_service =
        BalanceSnapshotService::new(env, config, Arc::new(http_provider));
    balance_snapshot_service.take_snapshot().await?;
    Ok(())
}
