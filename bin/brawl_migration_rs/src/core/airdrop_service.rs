use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Provider},
    signers::Signer,
};
use migration_toolkit::{
    batcher::{submit_in_chunks, BatchSubmitter, SubmissionReport},
    filters::{balance_drop_list, hero_drop_list},
    ledger::SubmissionLedger,
    records::{BalanceDrop, HeroDrop},
    snapshot::{BalanceSnapshot, NftSnapshot},
};

use crate::{
    core::{BrawlTokenSubmitter, HeroesSubmitter, SignerProvider},
    types::{AirdropConfig, AirdropKind},
    utils::ledger_path_for,
};

pub struct AirdropService {
    config: AirdropConfig,
    http_provider: Arc<Provider<Http>>,
}

impl AirdropService {
    pub fn new(config: AirdropConfig, http_provider: Arc<Provider<Http>>) -> Self {
        Self {
            config,
            http_provider,
        }
    }

    /// Mint every snapshot balance on the BRAWL token via `batchMint`
    pub async fn airdrop_brawl(
        &self,
        snapshot: &BalanceSnapshot,
        snapshot_path: &Path,
    ) -> anyhow::Result<SubmissionReport> {
        let drops = balance_drop_list(&snapshot.data.balances, self.config.skip_contracts);
        log::info!(
            "airdrop {} of {} balances from block {} by {:?}",
            drops.len(),
            snapshot.data.balances.len(),
            snapshot.block.number,
            self.config.wallet.address()
        );

        let submitter = BrawlTokenSubmitter::new(
            self.config.contract_address,
            Arc::new(self.signer()),
            self.config.batch_mint_gas,
        );
        let mut ledger = self.open_ledger(snapshot_path, snapshot.block.number, drops.len())?;
        run_brawl_airdrop(&submitter, &drops, self.config.chunk_size, &mut ledger).await
    }

    /// Mint every owned hero on the new collection via `mintBatch`
    pub async fn airdrop_heroes(
        &self,
        snapshot: &NftSnapshot,
        snapshot_path: &Path,
    ) -> anyhow::Result<SubmissionReport> {
        let heroes = hero_drop_list(&snapshot.data.tokens)?;
        log::info!(
            "airdrop {} of {} heroes from block {} by {:?}",
            heroes.len(),
            snapshot.data.tokens.len(),
            snapshot.block.number,
            self.config.wallet.address()
        );

        let submitter = HeroesSubmitter::new(self.config.contract_address, Arc::new(self.signer()));
        let mut ledger = self.open_ledger(snapshot_path, snapshot.block.number, heroes.len())?;
        run_heroes_airdrop(&submitter, &heroes, self.config.chunk_size, &mut ledger).await
    }

    fn signer(&self) -> SignerProvider {
        SignerMiddleware::new(self.http_provider.clone(), self.config.wallet.clone())
    }

    fn ledger_path(&self, snapshot_path: &Path) -> PathBuf {
        self.config
            .ledger_path
            .clone()
            .unwrap_or_else(|| ledger_path_for(snapshot_path, self.config.kind.name()))
    }

    fn open_ledger(
        &self,
        snapshot_path: &Path,
        snapshot_block: u64,
        total_entries: usize,
    ) -> anyhow::Result<SubmissionLedger> {
        let path = self.ledger_path(snapshot_path);
        log::info!("ledger: {:?}", path);
        Ok(SubmissionLedger::open(
            &path,
            snapshot_block,
            self.config.chunk_size,
            total_entries,
        )?)
    }
}

pub async fn run_brawl_airdrop<S>(
    submitter: &S,
    drops: &[BalanceDrop],
    chunk_size: usize,
    ledger: &mut SubmissionLedger,
) -> anyhow::Result<SubmissionReport>
where
    S: BatchSubmitter<Item = BalanceDrop> + ?Sized,
{
    run_airdrop(AirdropKind::Brawl, submitter, drops, chunk_size, ledger).await
}

pub async fn run_heroes_airdrop<S>(
    submitter: &S,
    heroes: &[HeroDrop],
    chunk_size: usize,
    ledger: &mut SubmissionLedger,
) -> anyhow::Result<SubmissionReport>
where
    S: BatchSubmitter<Item = HeroDrop> + ?Sized,
{
    run_airdrop(AirdropKind::Heroes, submitter, heroes, chunk_size, ledger).await
}

async fn run_airdrop<S>(
    kind: AirdropKind,
    submitter: &S,
    items: &[S::Item],
    chunk_size: usize,
    ledger: &mut SubmissionLedger,
) -> anyhow::Result<SubmissionReport>
where
    S: BatchSubmitter + ?Sized,
{
    if items.is_empty() {
        log::warn!("nothing to airdrop for {}", kind.name());
        return Ok(SubmissionReport::default());
    }

    let report = submit_in_chunks(submitter, items, chunk_size, ledger).await?;
    log::info!(
        "{} airdrop done: {} transactions sent, {} chunks already minted",
        kind.name(),
        report.submitted.len(),
        report.skipped
    );
    Ok(report)
}
