use anyhow::anyhow;
use async_trait::async_trait;
use ethers::types::H256;
use itertools::Itertools;

use crate::ledger::{ChunkStatus, LedgerError, SubmissionLedger};

/// Outcome of waiting on a broadcast transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStatus {
    Success,
    Reverted,
    /// The node no longer knows the transaction, it was dropped or never propagated
    NotFound,
}

/// Sends batched mint transactions and looks up their receipts
#[async_trait]
pub trait BatchSubmitter: Send + Sync {
    type Item: Send + Sync;

    /// Broadcast one mint transaction, returning its hash as soon as the node accepted it
    async fn send_batch(&self, batch: &[Self::Item]) -> anyhow::Result<H256>;

    /// Wait until `tx_hash` is mined
    async fn confirm(&self, tx_hash: H256) -> anyhow::Result<ReceiptStatus>;
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SubmissionReport {
    pub submitted: Vec<H256>,
    pub skipped: usize,
}

/// Contiguous chunks of at most `chunk_size` entries, in list order
pub fn partition<T>(items: &[T], chunk_size: usize) -> anyhow::Result<Vec<&[T]>> {
    if chunk_size == 0 {
        return Err(anyhow!("chunk size must be greater than zero"));
    }
    Ok(items.chunks(chunk_size).collect_vec())
}

/// Submit `items` chunk by chunk, awaiting each transaction before sending the next.
///
/// The ledger gets the tx hash as soon as a chunk is broadcast. A rerun looks up the receipt of
/// a broadcast chunk instead of sending it again, skips submitted chunks and resends chunks that
/// failed before broadcast or reverted. A chunk left pending by an interrupted run stops the
/// run. The first failing chunk aborts the rest.
pub async fn submit_in_chunks<S>(
    submitter: &S,
    items: &[S::Item],
    chunk_size: usize,
    ledger: &mut SubmissionLedger,
) -> anyhow::Result<SubmissionReport>
where
    S: BatchSubmitter + ?Sized,
{
    let chunks = partition(items, chunk_size)?;
    let total_chunks = chunks.len();
    let mut report = SubmissionReport::default();

    for (index, chunk) in chunks.into_iter().enumerate() {
        let chunk_label = format!("chunk {}/{}", index + 1, total_chunks);

        let tx_hash = match ledger.status(index).cloned() {
            Some(ChunkStatus::Submitted { tx_hash }) => {
                log::info!("{} already minted at {:#x}, skip", chunk_label, tx_hash);
                report.skipped += 1;
                continue;
            }
            Some(ChunkStatus::Pending) => return Err(LedgerError::PendingChunk(index).into()),
            Some(ChunkStatus::Broadcast { tx_hash }) => {
                log::info!(
                    "{} was broadcast as {:#x}, waiting for its receipt",
                    chunk_label,
                    tx_hash
                );
                tx_hash
            }
            status => {
                if let Some(ChunkStatus::Failed { error }) = status {
                    log::warn!("retrying {} which failed with: {}", chunk_label, error);
                }

                ledger.mark(index, ChunkStatus::Pending)?;
                match submitter.send_batch(chunk).await {
                    Ok(tx_hash) => {
                        ledger.mark(index, ChunkStatus::Broadcast { tx_hash })?;
                        tx_hash
                    }
                    Err(err) => {
                        ledger.mark(
                            index,
                            ChunkStatus::Failed {
                                error: format!("{:#}", err),
                            },
                        )?;
                        return Err(err.context(format!("{} failed", chunk_label)));
                    }
                }
            }
        };

        // Only a mined outcome changes a broadcast chunk, anything else keeps it broadcast
        match submitter.confirm(tx_hash).await {
            Ok(ReceiptStatus::Success) => {
                ledger.mark(index, ChunkStatus::Submitted { tx_hash })?;
                log::info!(
                    "Batch Mint Transaction Hash: {:#x} ({}, {} entries)",
                    tx_hash,
                    chunk_label,
                    chunk.len()
                );
                report.submitted.push(tx_hash);
            }
            Ok(ReceiptStatus::Reverted) => {
                let error = format!("transaction {:#x} reverted", tx_hash);
                ledger.mark(
                    index,
                    ChunkStatus::Failed {
                        error: error.clone(),
                    },
                )?;
                return Err(anyhow!("{} failed: {}", chunk_label, error));
            }
            Ok(ReceiptStatus::NotFound) => {
                return Err(anyhow!(
                    "{} transaction {:#x} not found, rerun once it is mined or mark the chunk failed in {:?}",
                    chunk_label,
                    tx_hash,
                    ledger.path()
                ));
            }
            Err(err) => {
                return Err(err.context(format!(
                    "{} broadcast as {:#x}, receipt unknown",
                    chunk_label, tx_hash
                )));
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::{collections::VecDeque, sync::Mutex};

    use tempfile::tempdir;

    use super::*;

    #[derive(Default)]
    struct RecordingSubmitter {
        batches: Mutex<Vec<Vec<u32>>>,
        confirmed: Mutex<Vec<H256>>,
        fail_on_call: Option<usize>,
        // popped per confirm call, success once empty
        receipts: Mutex<VecDeque<anyhow::Result<ReceiptStatus>>>,
        hash_base: u64,
    }

    impl RecordingSubmitter {
        fn with_receipts(receipts: Vec<anyhow::Result<ReceiptStatus>>) -> Self {
            Self {
                receipts: Mutex::new(receipts.into()),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl BatchSubmitter for RecordingSubmitter {
        type Item = u32;

        async fn send_batch(&self, batch: &[u32]) -> anyhow::Result<H256> {
            let mut batches = self.batches.lock().unwrap();
            if self.fail_on_call == Some(batches.len()) {
                return Err(anyhow!("nonce too low"));
            }
            batches.push(batch.to_vec());
            Ok(H256::from_low_u64_be(self.hash_base + batches.len() as u64))
        }

        async fn confirm(&self, tx_hash: H256) -> anyhow::Result<ReceiptStatus> {
            self.confirmed.lock().unwrap().push(tx_hash);
            self.receipts
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(ReceiptStatus::Success))
        }
    }

    fn drop_list(len: u32) -> Vec<u32> {
        (0..len).collect()
    }

    #[test]
    fn partition_keeps_order_and_remainder() {
        let items = drop_list(530);
        let chunks = partition(&items, 250).unwrap();
        assert_eq!(
            chunks.iter().map(|chunk| chunk.len()).collect_vec(),
            vec![250, 250, 30]
        );
        assert_eq!(chunks[2][0], 500);
        assert!(partition(&items, 0).is_err());
        assert!(partition::<u32>(&[], 50).unwrap().is_empty());
    }

    #[tokio::test]
    async fn submits_every_chunk_in_order() {
        let dir = tempdir().unwrap();
        let items = drop_list(530);
        let mut ledger = SubmissionLedger::open(&dir.path().join("l.json"), 1, 250, 530).unwrap();
        let submitter = RecordingSubmitter::default();

        let report = submit_in_chunks(&submitter, &items, 250, &mut ledger)
            .await
            .unwrap();

        let batches = submitter.batches.lock().unwrap();
        assert_eq!(
            batches.iter().map(|batch| batch.len()).collect_vec(),
            vec![250, 250, 30]
        );
        assert_eq!(batches.concat(), items);
        assert_eq!(report.submitted.len(), 3);
        assert_eq!(report.skipped, 0);
        assert_eq!(ledger.submitted_count(), 3);
    }

    #[tokio::test]
    async fn send_failure_stops_the_run_and_rerun_resumes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let items = drop_list(530);

        let mut ledger = SubmissionLedger::open(&path, 1, 250, 530).unwrap();
        let failing = RecordingSubmitter {
            fail_on_call: Some(1),
            ..Default::default()
        };
        let err = submit_in_chunks(&failing, &items, 250, &mut ledger)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("chunk 2/3 failed"));
        assert_eq!(failing.batches.lock().unwrap().len(), 1);
        assert!(matches!(ledger.status(1), Some(ChunkStatus::Failed { .. })));
        assert_eq!(ledger.status(2), None);

        let mut ledger = SubmissionLedger::open(&path, 1, 250, 530).unwrap();
        let healthy = RecordingSubmitter::default();
        let report = submit_in_chunks(&healthy, &items, 250, &mut ledger)
            .await
            .unwrap();

        let batches = healthy.batches.lock().unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0][0], 250);
        assert_eq!(batches[1][0], 500);
        assert_eq!(report.skipped, 1);
        assert_eq!(ledger.submitted_count(), 3);
    }

    #[tokio::test]
    async fn broadcast_chunk_is_confirmed_not_resent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let items = drop_list(530);

        let mut ledger = SubmissionLedger::open(&path, 1, 250, 530).unwrap();
        let flaky = RecordingSubmitter::with_receipts(vec![Err(anyhow!("receipt poll timed out"))]);
        let err = submit_in_chunks(&flaky, &items, 250, &mut ledger)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("receipt unknown"));
        assert_eq!(flaky.batches.lock().unwrap().len(), 1);
        let first_hash = H256::from_low_u64_be(1);
        assert_eq!(
            ledger.status(0),
            Some(&ChunkStatus::Broadcast {
                tx_hash: first_hash
            })
        );

        let mut ledger = SubmissionLedger::open(&path, 1, 250, 530).unwrap();
        let rerun = RecordingSubmitter {
            hash_base: 100,
            ..Default::default()
        };
        let report = submit_in_chunks(&rerun, &items, 250, &mut ledger)
            .await
            .unwrap();

        let batches = rerun.batches.lock().unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0][0], 250);
        assert_eq!(rerun.confirmed.lock().unwrap()[0], first_hash);
        assert_eq!(report.submitted[0], first_hash);
        assert_eq!(
            ledger.status(0),
            Some(&ChunkStatus::Submitted {
                tx_hash: first_hash
            })
        );
        assert_eq!(ledger.submitted_count(), 3);
    }

    #[tokio::test]
    async fn reverted_chunk_is_failed_and_resent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let items = drop_list(100);

        let mut ledger = SubmissionLedger::open(&path, 1, 50, 100).unwrap();
        let reverting = RecordingSubmitter::with_receipts(vec![Ok(ReceiptStatus::Reverted)]);
        let err = submit_in_chunks(&reverting, &items, 50, &mut ledger)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("reverted"));
        assert!(matches!(ledger.status(0), Some(ChunkStatus::Failed { .. })));

        let mut ledger = SubmissionLedger::open(&path, 1, 50, 100).unwrap();
        let healthy = RecordingSubmitter::default();
        submit_in_chunks(&healthy, &items, 50, &mut ledger)
            .await
            .unwrap();
        assert_eq!(healthy.batches.lock().unwrap().len(), 2);
        assert_eq!(ledger.submitted_count(), 2);
    }

    #[tokio::test]
    async fn unknown_transaction_stays_broadcast() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let items = drop_list(100);

        let mut ledger = SubmissionLedger::open(&path, 1, 50, 100).unwrap();
        let dropped = RecordingSubmitter::with_receipts(vec![Ok(ReceiptStatus::NotFound)]);
        let err = submit_in_chunks(&dropped, &items, 50, &mut ledger)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert!(matches!(ledger.status(0), Some(ChunkStatus::Broadcast { .. })));

        // still unknown on the next run, nothing is sent
        let mut ledger = SubmissionLedger::open(&path, 1, 50, 100).unwrap();
        let rerun = RecordingSubmitter::with_receipts(vec![Ok(ReceiptStatus::NotFound)]);
        assert!(submit_in_chunks(&rerun, &items, 50, &mut ledger)
            .await
            .is_err());
        assert!(rerun.batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn pending_chunk_blocks_the_rerun() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let items = drop_list(100);
        let mut ledger = SubmissionLedger::open(&path, 1, 50, 100).unwrap();
        ledger.mark(0, ChunkStatus::Pending).unwrap();

        let submitter = RecordingSubmitter::default();
        let err = submit_in_chunks(&submitter, &items, 50, &mut ledger)
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<LedgerError>(),
            Some(LedgerError::PendingChunk(0))
        ));
        assert!(submitter.batches.lock().unwrap().is_empty());
    }
}
