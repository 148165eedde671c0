use std::{path::PathBuf, str::FromStr};

use anyhow::anyhow;
use ethers::{
    signers::LocalWallet,
    types::{Address, U256},
};
use migration_utils::{
    constants::{BLOCK_BRAWLERS_NFTS, BRAWL_HEROES, BRAWL_TOKENS, SKALE_SYSTEM_ACCOUNTS, ZERO_ADDRESS},
    env::{get_env, get_env_bool, get_env_parsed},
    utils::load_private_key_wallet,
};
use provider_utils::{enums::ENetwork, networks::get_network_config};

use crate::{
    constants::{
        Env, DEFAULT_BALANCE_PAGE_SIZE, DEFAULT_BATCH_MINT_GAS, DEFAULT_BRAWL_CHUNK_SIZE,
        DEFAULT_CONTRACT_CHECK_BATCH_SIZE, DEFAULT_HEROES_CHUNK_SIZE, DEFAULT_NFT_BATCH_SIZE,
    },
    utils::{parse_address_list, parse_dec_u256},
};

#[derive(Debug, Clone)]
pub struct NftSnapshotConfig {
    pub contract_address: Address,
    pub batch_size: u64,
}

impl NftSnapshotConfig {
    pub fn from_env(env: &Env) -> anyhow::Result<Self> {
        let contract_address = configured_address(
            "NFT_CONTRACT_ADDRESS",
            lookup(&BLOCK_BRAWLERS_NFTS, &env.source_network),
            &env.source_network,
        )?;
        let batch_size = positive_size::<u64>("NFT_BATCH_SIZE", DEFAULT_NFT_BATCH_SIZE)?;

        Ok(Self {
            contract_address,
            batch_size,
        })
    }
}

#[derive(Debug, Clone)]
pub struct BalanceSnapshotConfig {
    pub explorer_url: String,
    pub page_size: u32,
    /// Balances above this belong to validator or system accounts
    pub max_balance: U256,
    pub deny_list: Vec<Address>,
    pub detect_contracts: bool,
    pub code_batch_size: usize,
}

impl BalanceSnapshotConfig {
    pub fn from_env(env: &Env) -> anyhow::Result<Self> {
        let network_config = get_network_config(&env.source_network)?;
        let explorer_url = get_env("EXPLORER_URL", Some(network_config.explorer_url.as_str()))?;
        let page_size = positive_size::<u32>("BALANCE_PAGE_SIZE", DEFAULT_BALANCE_PAGE_SIZE)?;
        let max_balance = parse_dec_u256(&get_env("MAX_BALANCE", None)?)
            .map_err(|err| anyhow!("MAX_BALANCE invalid: {}", err))?;
        let deny_list = match std::env::var("BALANCE_DENY_LIST") {
            Ok(value) => parse_address_list(&value)?,
            Err(_) => SKALE_SYSTEM_ACCOUNTS.clone(),
        };

        Ok(Self {
            explorer_url,
            page_size,
            max_balance,
            deny_list,
            detect_contracts: get_env_bool("DETECT_CONTRACTS")?,
            code_batch_size: positive_size::<usize>(
                "CONTRACT_CHECK_BATCH_SIZE",
                DEFAULT_CONTRACT_CHECK_BATCH_SIZE,
            )?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirdropKind {
    Brawl,
    Heroes,
}

impl AirdropKind {
    pub fn name(&self) -> &'static str {
        match self {
            AirdropKind::Brawl => "brawl",
            AirdropKind::Heroes => "heroes",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AirdropConfig {
    pub kind: AirdropKind,
    pub wallet: LocalWallet,
    pub contract_address: Address,
    pub chunk_size: usize,
    /// Only used by `batchMint`, hero mints are estimated
    pub batch_mint_gas: U256,
    pub skip_contracts: bool,
    pub ledger_path: Option<PathBuf>,
}

impl AirdropConfig {
    pub fn from_env(env: &Env, kind: AirdropKind) -> anyhow::Result<Self> {
        let private_key = get_env("PRIVATE_KEY", None).map_err(|_| anyhow!("Missing PRIVATE_KEY"))?;
        let wallet = load_private_key_wallet(&private_key, env.target_chain_id.as_u64())
            .map_err(|err| anyhow!("PRIVATE_KEY invalid: {}", err))?;

        let (contract_address, chunk_size) = match kind {
            AirdropKind::Brawl => (
                configured_address(
                    "BRAWL_TOKEN_ADDRESS",
                    lookup(&BRAWL_TOKENS, &env.target_network),
                    &env.target_network,
                )?,
                positive_size::<usize>("BRAWL_CHUNK_SIZE", DEFAULT_BRAWL_CHUNK_SIZE)?,
            ),
            AirdropKind::Heroes => (
                configured_address(
                    "HEROES_ADDRESS",
                    lookup(&BRAWL_HEROES, &env.target_network),
                    &env.target_network,
                )?,
                positive_size::<usize>("HEROES_CHUNK_SIZE", DEFAULT_HEROES_CHUNK_SIZE)?,
            ),
        };

        Ok(Self {
            kind,
            wallet,
            contract_address,
            chunk_size,
            batch_mint_gas: parse_dec_u256(&get_env("BATCH_MINT_GAS", Some(DEFAULT_BATCH_MINT_GAS))?)?,
            skip_contracts: get_env_bool("SKIP_CONTRACTS")?,
            ledger_path: std::env::var("LEDGER_PATH").ok().map(PathBuf::from),
        })
    }
}

/// Batch, page and chunk sizes, zero is a config error
fn positive_size<T>(key: &str, default_value: &str) -> anyhow::Result<T>
where
    T: FromStr + Default + PartialEq,
    T::Err: std::fmt::Display,
{
    check_positive(key, get_env_parsed::<T>(key, Some(default_value))?)
}

fn check_positive<T: Default + PartialEq>(key: &str, value: T) -> anyhow::Result<T> {
    if value == T::default() {
        return Err(anyhow!("{} must be greater than zero", key));
    }
    Ok(value)
}

fn lookup(
    addresses: &std::collections::HashMap<ENetwork, Address>,
    network: &ENetwork,
) -> Address {
    addresses.get(network).copied().unwrap_or(*ZERO_ADDRESS)
}

/// Env override first, then the per-network default. Zero means not deployed there.
fn configured_address(
    key: &str,
    default_address: Address,
    network: &ENetwork,
) -> anyhow::Result<Address> {
    let address = match std::env::var(key) {
        Ok(value) => Address::from_str(value.trim())
            .map_err(|err| anyhow!("{} invalid {:?}: {}", key, value, err))?,
        Err(_) => default_address,
    };
    if address == *ZERO_ADDRESS {
        return Err(anyhow!(
            "Please config {} for {:?} network",
            key,
            network
        ));
    }
    Ok(address)
}
