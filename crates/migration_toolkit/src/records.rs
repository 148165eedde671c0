use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::json_codecs::{from_balance_string, from_u256_string, to_u256_string};

/// One hero NFT as read from the source collection
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    #[serde(
        deserialize_with = "from_u256_string",
        serialize_with = "to_u256_string"
    )]
    pub token_id: U256,
    pub owner: Address,
    pub hero_code: String,
}

/// Native BRAWL balance of one account
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BalanceRecord {
    #[serde(alias = "user")]
    pub address: Address,
    #[serde(
        deserialize_with = "from_balance_string",
        serialize_with = "to_u256_string"
    )]
    pub balance: U256,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_contract: Option<bool>,
}

impl BalanceRecord {
    pub fn new(address: Address, balance: U256) -> Self {
        Self {
            address,
            balance,
            is_contract: None,
        }
    }
}

/// Recipient and amount of one `batchMint` entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceDrop {
    pub address: Address,
    pub amount: U256,
}

/// One `mintBatch` entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeroDrop {
    pub to: Address,
    pub token_id: U256,
    pub hero_code: U256,
}

impl From<HeroDrop> for (Address, U256, U256) {
    fn from(hero: HeroDrop) -> Self {
        (hero.to, hero.token_id, hero.hero_code)
    }
}

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("invalid hero code {hero_code:?} for token {token_id}")]
    HeroCode { token_id: U256, hero_code: String },
}

impl TryFrom<&TokenRecord> for HeroDrop {
    type Error = RecordError;

    fn try_from(token: &TokenRecord) -> Result<Self, Self::Error> {
        let invalid = || RecordError::HeroCode {
            token_id: token.token_id,
            hero_code: token.hero_code.clone(),
        };
        let hero_code = token.hero_code.trim();
        if hero_code.is_empty() {
            return Err(invalid());
        }
        let hero_code = U256::from_dec_str(hero_code).map_err(|_| invalid())?;
        Ok(HeroDrop {
            to: token.owner,
            token_id: token.token_id,
            hero_code,
        })
    }
}
