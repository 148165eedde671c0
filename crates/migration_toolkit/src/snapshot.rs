use std::{
    fs,
    path::{Path, PathBuf},
};

use ethers::types::{Address, Block, H256, U256};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::{
    json_codecs::{from_u256_string, from_u64_string, to_u256_string, to_u64_string},
    records::{BalanceRecord, TokenRecord},
};

pub const NFT_SNAPSHOT_PREFIX: &str = "nft-snapshot";
pub const BRAWL_SNAPSHOT_PREFIX: &str = "brawl-snapshot";

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("snapshot {0:?} already exists")]
    AlreadyExists(PathBuf),
    #[error("snapshot file is named after block {file} but holds block {document}")]
    BlockMismatch { file: u64, document: u64 },
    #[error("block {0} is missing its number or hash")]
    IncompleteBlock(String),
}

/// Chain head the snapshot was taken at
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotBlock {
    #[serde(deserialize_with = "from_u64_string", serialize_with = "to_u64_string")]
    pub number: u64,
    pub hash: H256,
    #[serde(
        deserialize_with = "from_u256_string",
        serialize_with = "to_u256_string"
    )]
    pub timestamp: U256,
}

impl SnapshotBlock {
    pub fn from_block<TX>(block: &Block<TX>) -> Result<Self, SnapshotError> {
        let (Some(number), Some(hash)) = (block.number, block.hash) else {
            return Err(SnapshotError::IncompleteBlock(format!("{:?}", block.number)));
        };
        Ok(Self {
            number: number.as_u64(),
            hash,
            timestamp: block.timestamp,
        })
    }
}

/// Wall clock time the snapshot was written at
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SnapshotTimestamp {
    pub str: String,
    pub num: i64,
}

impl SnapshotTimestamp {
    pub fn now() -> Self {
        let now = chrono::Local::now();
        Self {
            str: now.format("%a %b %d %Y").to_string(),
            num: now.timestamp_millis(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SnapshotDocument<D> {
    pub block: SnapshotBlock,
    pub data: D,
    pub timestamp: SnapshotTimestamp,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NftContractInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub address: Address,
    #[serde(default)]
    pub abi: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NftSnapshotData {
    pub skale_chain_name: String,
    pub chain_name: String,
    pub contract: NftContractInfo,
    pub tokens: Vec<TokenRecord>,
    #[serde(
        deserialize_with = "from_u256_string",
        serialize_with = "to_u256_string"
    )]
    pub total_supply: U256,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSnapshotData {
    pub skale_chain_name: String,
    pub chain_name: String,
    pub balances: Vec<BalanceRecord>,
}

pub type NftSnapshot = SnapshotDocument<NftSnapshotData>;
pub type BalanceSnapshot = SnapshotDocument<BalanceSnapshotData>;

pub fn snapshot_file_name(prefix: &str, block_number: u64) -> String {
    format!("{}-{}.json", prefix, block_number)
}

/// Block number encoded in `<prefix>-<number>.json`, if the file follows that pattern
pub fn block_number_from_path(path: &Path) -> Option<u64> {
    path.file_stem()?
        .to_str()?
        .rsplit('-')
        .next()?
        .parse::<u64>()
        .ok()
}

/// Write `<dir>/<prefix>-<block>.json` as 4-space indented JSON. Snapshots are write-once.
pub fn write_snapshot<D: Serialize>(
    dir: &Path,
    prefix: &str,
    document: &SnapshotDocument<D>,
) -> Result<PathBuf, SnapshotError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(snapshot_file_name(prefix, document.block.number));
    if path.exists() {
        return Err(SnapshotError::AlreadyExists(path));
    }

    let mut content = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut content, formatter);
    document.serialize(&mut serializer)?;
    fs::write(&path, content)?;

    Ok(path)
}

pub fn read_snapshot<D: DeserializeOwned>(
    path: &Path,
) -> Result<SnapshotDocument<D>, SnapshotError> {
    let content = fs::read_to_string(path)?;
    let document: SnapshotDocument<D> = serde_json::from_str(&content)?;

    if let Some(file_block) = block_number_from_path(path) {
        if file_block != document.block.number {
            return Err(SnapshotError::BlockMismatch {
                file: file_block,
                document: document.block.number,
            });
        }
    }

    Ok(document)
}
