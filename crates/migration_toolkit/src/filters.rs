use std::collections::HashSet;

use ethers::types::{Address, U256};
use migration_utils::constants::ZERO_ADDRESS;

use crate::records::{BalanceDrop, BalanceRecord, HeroDrop, RecordError, TokenRecord};

/// Snapshot-time filter for explorer balances
#[derive(Debug, Clone)]
pub struct BalanceFilter {
    deny_list: HashSet<Address>,
    max_balance: U256,
}

impl BalanceFilter {
    pub fn new(deny_list: impl IntoIterator<Item = Address>, max_balance: U256) -> Self {
        Self {
            deny_list: deny_list.into_iter().collect(),
            max_balance,
        }
    }

    /// Keeps genuine player balances. Balances above `max_balance` belong to validator or
    /// system accounts.
    pub fn accepts(&self, record: &BalanceRecord) -> bool {
        record.address != *ZERO_ADDRESS
            && !self.deny_list.contains(&record.address)
            && !record.balance.is_zero()
            && record.balance <= self.max_balance
    }

    pub fn apply(&self, records: Vec<BalanceRecord>) -> Vec<BalanceRecord> {
        let before = records.len();
        let kept: Vec<BalanceRecord> = records
            .into_iter()
            .filter(|record| self.accepts(record))
            .collect();
        log::info!("kept {} of {} balances", kept.len(), before);
        kept
    }
}

/// Accounts to receive a `batchMint`, in snapshot order
pub fn balance_drop_list(records: &[BalanceRecord], skip_contracts: bool) -> Vec<BalanceDrop> {
    records
        .iter()
        .filter(|record| !record.balance.is_zero())
        .filter(|record| !(skip_contracts && record.is_contract == Some(true)))
        .map(|record| BalanceDrop {
            address: record.address,
            amount: record.balance,
        })
        .collect()
}

/// Heroes to mint, in token id order. Tokens owned by the zero address are burned or unminted.
pub fn hero_drop_list(tokens: &[TokenRecord]) -> Result<Vec<HeroDrop>, RecordError> {
    tokens
        .iter()
        .filter(|token| token.owner != *ZERO_ADDRESS)
        .map(HeroDrop::try_from)
        .collect()
}
