//! Per-chunk submission record of one airdrop run. Persisted after every change so a rerun
//! resumes instead of minting the same chunk twice.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use ethers::types::H256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("ledger {path:?} belongs to another run: {field} is {found}, expected {expected}")]
    Mismatch {
        path: PathBuf,
        field: &'static str,
        found: u64,
        expected: u64,
    },
    #[error("chunk {0} was sent but never confirmed, check the chain and fix the ledger by hand")]
    PendingChunk(usize),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ChunkStatus {
    /// About to be sent, no transaction hash known yet
    Pending,
    /// Sent, receipt not seen yet. Never sent again, only looked up.
    Broadcast {
        #[serde(rename = "txHash")]
        tx_hash: H256,
    },
    Submitted {
        #[serde(rename = "txHash")]
        tx_hash: H256,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct LedgerState {
    snapshot_block: u64,
    chunk_size: usize,
    total_entries: usize,
    chunks: BTreeMap<usize, ChunkStatus>,
}

#[derive(Debug)]
pub struct SubmissionLedger {
    path: PathBuf,
    state: LedgerState,
}

impl SubmissionLedger {
    /// Load the ledger at `path`, or start an empty one. An existing ledger must describe the
    /// same snapshot block, chunk size and drop-list length.
    pub fn open(
        path: &Path,
        snapshot_block: u64,
        chunk_size: usize,
        total_entries: usize,
    ) -> Result<Self, LedgerError> {
        let expected = LedgerState {
            snapshot_block,
            chunk_size,
            total_entries,
            chunks: BTreeMap::new(),
        };
        if !path.exists() {
            return Ok(Self {
                path: path.to_path_buf(),
                state: expected,
            });
        }

        let state: LedgerState = serde_json::from_str(&fs::read_to_string(path)?)?;
        for (field, found, wanted) in [
            ("snapshotBlock", state.snapshot_block, snapshot_block),
            ("chunkSize", state.chunk_size as u64, chunk_size as u64),
            ("totalEntries", state.total_entries as u64, total_entries as u64),
        ] {
            if found != wanted {
                return Err(LedgerError::Mismatch {
                    path: path.to_path_buf(),
                    field,
                    found,
                    expected: wanted,
                });
            }
        }

        log::info!(
            "resuming from ledger {:?}, {} chunks recorded",
            path,
            state.chunks.len()
        );
        Ok(Self {
            path: path.to_path_buf(),
            state,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn status(&self, chunk_index: usize) -> Option<&ChunkStatus> {
        self.state.chunks.get(&chunk_index)
    }

    pub fn submitted_count(&self) -> usize {
        self.state
            .chunks
            .values()
            .filter(|status| matches!(status, ChunkStatus::Submitted { .. }))
            .count()
    }

    pub fn mark(&mut self, chunk_index: usize, status: ChunkStatus) -> Result<(), LedgerError> {
        self.state.chunks.insert(chunk_index, status);
        self.persist()
    }

    fn persist(&self) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, serde_json::to_string_pretty(&self.state)?)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}
