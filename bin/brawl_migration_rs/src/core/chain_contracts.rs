use std::sync::Arc;

use async_trait::async_trait;
use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Middleware, PendingTransaction, Provider},
    signers::LocalWallet,
    types::{Address, H256, U256, U64},
};
use migration_toolkit::{
    batcher::{BatchSubmitter, ReceiptStatus},
    paginator::NftSource,
    records::{BalanceDrop, HeroDrop},
};
use migration_utils::{
    abi::{BlockBrawlersErc721Abigen, BrawlHeroesAbigen, BrawlTokenNebulaAbigen},
    utils::format_lower_hex,
};

pub type SignerProvider = SignerMiddleware<Arc<Provider<Http>>, LocalWallet>;

/// BlockBrawlers collection read through an rpc provider
pub struct ContractNftSource {
    contract: BlockBrawlersErc721Abigen<Provider<Http>>,
}

impl ContractNftSource {
    pub fn new(contract_address: Address, http_provider: Arc<Provider<Http>>) -> Self {
        Self {
            contract: BlockBrawlersErc721Abigen::new(contract_address, http_provider),
        }
    }
}

#[async_trait]
impl NftSource for ContractNftSource {
    async fn total_supply(&self) -> anyhow::Result<U256> {
        Ok(self.contract.total_supply().call().await?)
    }

    async fn owner_of(&self, token_id: U256) -> anyhow::Result<Address> {
        Ok(self.contract.owner_of(token_id).call().await?)
    }

    async fn hero_of(&self, token_id: U256) -> anyhow::Result<U256> {
        Ok(self.contract.get_hero(token_id).call().await?)
    }
}

/// Wait for the receipt of `tx_hash`, also when it was broadcast by an earlier run
async fn wait_for_receipt(signer: &SignerProvider, tx_hash: H256) -> anyhow::Result<ReceiptStatus> {
    let provider: &Provider<Http> = signer.inner();
    let tx_receipt = PendingTransaction::new(tx_hash, provider).await?;
    Ok(match tx_receipt {
        None => ReceiptStatus::NotFound,
        Some(tx_receipt) if tx_receipt.status == Some(U64::zero()) => ReceiptStatus::Reverted,
        Some(_) => ReceiptStatus::Success,
    })
}

/// `batchMint(address[],uint256[])` on the BRAWL token
pub struct BrawlTokenSubmitter {
    token: BrawlTokenNebulaAbigen<SignerProvider>,
    signer: Arc<SignerProvider>,
    gas: U256,
}

impl BrawlTokenSubmitter {
    pub fn new(token_address: Address, signer: Arc<SignerProvider>, gas: U256) -> Self {
        Self {
            token: BrawlTokenNebulaAbigen::new(token_address, signer.clone()),
            signer,
            gas,
        }
    }
}

#[async_trait]
impl BatchSubmitter for BrawlTokenSubmitter {
    type Item = BalanceDrop;

    async fn send_batch(&self, batch: &[BalanceDrop]) -> anyhow::Result<H256> {
        let (recipients, amounts): (Vec<Address>, Vec<U256>) = batch
            .iter()
            .map(|drop| (drop.address, drop.amount))
            .unzip();
        let batch_mint_fn = self
            .token
            .batch_mint(recipients, amounts)
            .gas(self.gas)
            .legacy();
        let pending_tx = batch_mint_fn.send().await?;
        log::info!("pending_tx {}", format_lower_hex(&pending_tx.tx_hash()));
        Ok(pending_tx.tx_hash())
    }

    async fn confirm(&self, tx_hash: H256) -> anyhow::Result<ReceiptStatus> {
        wait_for_receipt(&self.signer, tx_hash).await
    }
}

/// `mintBatch((address,uint256,uint256)[])` on the heroes collection
pub struct HeroesSubmitter {
    heroes: BrawlHeroesAbigen<SignerProvider>,
    signer: Arc<SignerProvider>,
}

impl HeroesSubmitter {
    pub fn new(heroes_address: Address, signer: Arc<SignerProvider>) -> Self {
        Self {
            heroes: BrawlHeroesAbigen::new(heroes_address, signer.clone()),
            signer,
        }
    }
}

#[async_trait]
impl BatchSubmitter for HeroesSubmitter {
    type Item = HeroDrop;

    async fn send_batch(&self, batch: &[HeroDrop]) -> anyhow::Result<H256> {
        let heroes: Vec<(Address, U256, U256)> = batch.iter().map(|&hero| hero.into()).collect();
        let mint_batch_fn = self.heroes.mint_batch(heroes).legacy();
        let pending_tx = mint_batch_fn.send().await?;
        log::info!("pending_tx {}", format_lower_hex(&pending_tx.tx_hash()));
        Ok(pending_tx.tx_hash())
    }

    async fn confirm(&self, tx_hash: H256) -> anyhow::Result<ReceiptStatus> {
        wait_for_receipt(&self.signer, tx_hash).await
    }
}
