use std::{collections::HashSet, ops::Range};

use anyhow::anyhow;
use async_trait::async_trait;
use ethers::types::{Address, U256};
use futures::future::try_join_all;
use mockall::automock;

use crate::{
    explorer::{AccountPages, ExplorerError},
    records::{BalanceRecord, TokenRecord},
};

/// Walk `listaccounts` from page 1 until the source says there is no next page.
///
/// Sources without an explicit signal are walked until a page adds no account that was not
/// already collected. Accounts are de-duplicated by address, so an explorer re-serving its last
/// page past the end also terminates. A short page alone does not end the walk.
pub async fn collect_account_pages<S>(
    source: &S,
    offset: u32,
) -> Result<Vec<BalanceRecord>, ExplorerError>
where
    S: AccountPages + ?Sized,
{
    let mut accounts: Vec<BalanceRecord> = Vec::new();
    let mut seen = HashSet::new();
    let mut page = 1;

    loop {
        let prev_accounts_len = accounts.len();
        let fetched = source.fetch_page(page, offset).await?;
        for account in fetched.accounts {
            if seen.insert(account.address) {
                accounts.push(account);
            }
        }
        let new_accounts = accounts.len() - prev_accounts_len;

        log::info!(
            "Fetched page {}, {} new, found {} accounts",
            page,
            new_accounts,
            accounts.len()
        );

        if fetched.has_next == Some(false) || new_accounts == 0 {
            break;
        }
        page += 1;
    }

    Ok(accounts)
}

/// Read access to the hero collection on the source chain
#[automock]
#[async_trait]
pub trait NftSource: Send + Sync {
    async fn total_supply(&self) -> anyhow::Result<U256>;
    async fn owner_of(&self, token_id: U256) -> anyhow::Result<Address>;
    async fn hero_of(&self, token_id: U256) -> anyhow::Result<U256>;
}

/// Consecutive token id ranges of at most `batch_size` covering `0..total_supply`, yielded lazily
pub fn token_batches(total_supply: u64, batch_size: u64) -> impl Iterator<Item = Range<u64>> {
    let step = usize::try_from(batch_size).unwrap_or(usize::MAX);
    let end = if batch_size == 0 { 0 } else { total_supply };
    (0..end)
        .step_by(step.max(1))
        .map(move |start| start..total_supply.min(start.saturating_add(batch_size)))
}

pub async fn read_total_supply<S: NftSource + ?Sized>(source: &S) -> anyhow::Result<u64> {
    let total_supply = source.total_supply().await?;
    if total_supply > U256::from(u64::MAX) {
        return Err(anyhow!("total supply {} does not fit into u64", total_supply));
    }
    Ok(total_supply.as_u64())
}

/// Read owner and hero code of every token id below `total_supply`.
///
/// Lookups inside one batch run concurrently, batches run one after the other. The first failed
/// read aborts the whole walk.
pub async fn read_tokens<S: NftSource + ?Sized>(
    source: &S,
    total_supply: u64,
    batch_size: u64,
) -> anyhow::Result<Vec<TokenRecord>> {
    if batch_size == 0 {
        return Err(anyhow!("batch size must be greater than zero"));
    }

    let mut tokens = Vec::new();
    for batch in token_batches(total_supply, batch_size) {
        let remaining = total_supply - batch.start;
        let batch_tokens = try_join_all(batch.map(|token_id| async move {
            let token_id = U256::from(token_id);
            let owner = source.owner_of(token_id).await?;
            let hero_code = source.hero_of(token_id).await?;
            Ok::<_, anyhow::Error>(TokenRecord {
                token_id,
                owner,
                hero_code: hero_code.to_string(),
            })
        }))
        .await?;
        tokens.extend(batch_tokens);

        log::info!("Items Remaining: {}", remaining);
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    };

    use mockall::predicate::eq;

    use super::*;
    use crate::explorer::{AccountPage, MockAccountPages};

    fn accounts(start: u64, count: u64) -> Vec<BalanceRecord> {
        (start..start + count)
            .map(|i| BalanceRecord::new(Address::from_low_u64_be(i + 1), U256::from(i + 1)))
            .collect()
    }

    fn pages_of(sizes: Vec<u64>) -> (MockAccountPages, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();
        let mut source = MockAccountPages::new();
        source.expect_fetch_page().returning(move |page, offset| {
            assert_eq!(offset, 250);
            calls_clone.fetch_add(1, Ordering::SeqCst);
            let index = (page - 1) as usize;
            let start: u64 = sizes[..index].iter().sum();
            Ok(AccountPage {
                accounts: accounts(start, sizes[index]),
                has_next: None,
            })
        });
        (source, calls)
    }

    #[tokio::test]
    async fn stops_after_page_without_new_accounts() {
        let (source, calls) = pages_of(vec![250, 250, 130, 0]);

        let collected = collect_account_pages(&source, 250).await.unwrap();

        assert_eq!(collected.len(), 630);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(collected[0].address, Address::from_low_u64_be(1));
        assert_eq!(collected[629].address, Address::from_low_u64_be(630));
    }

    #[tokio::test]
    async fn short_page_does_not_stop_the_walk() {
        // a short page in the middle, the source only runs dry on page 4
        let (source, calls) = pages_of(vec![250, 120, 250, 0]);

        let collected = collect_account_pages(&source, 250).await.unwrap();

        assert_eq!(collected.len(), 620);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn repeated_last_page_terminates() {
        let mut source = MockAccountPages::new();
        source
            .expect_fetch_page()
            .with(eq(1), eq(250))
            .times(1)
            .returning(|_, _| {
                Ok(AccountPage {
                    accounts: accounts(0, 250),
                    has_next: None,
                })
            });
        source
            .expect_fetch_page()
            .with(eq(2), eq(250))
            .times(1)
            .returning(|_, _| {
                Ok(AccountPage {
                    accounts: accounts(200, 40),
                    has_next: None,
                })
            });

        let collected = collect_account_pages(&source, 250).await.unwrap();
        assert_eq!(collected.len(), 250);
    }

    #[tokio::test]
    async fn explicit_last_page_signal_wins() {
        let mut source = MockAccountPages::new();
        source.expect_fetch_page().times(1).returning(|_, _| {
            Ok(AccountPage {
                accounts: accounts(0, 250),
                has_next: Some(false),
            })
        });

        let collected = collect_account_pages(&source, 250).await.unwrap();
        assert_eq!(collected.len(), 250);
    }

    #[tokio::test]
    async fn page_error_aborts() {
        let mut source = MockAccountPages::new();
        source.expect_fetch_page().times(1).returning(|_, _| {
            Err(ExplorerError::StatusError {
                status: 500,
                text: "boom".to_string(),
            })
        });

        assert!(collect_account_pages(&source, 250).await.is_err());
    }

    #[test]
    fn token_batches_cover_supply() {
        let batches = |total, size| token_batches(total, size).collect::<Vec<_>>();
        assert_eq!(batches(250, 100), vec![0..100, 100..200, 200..250]);
        assert_eq!(batches(200, 100), vec![0..100, 100..200]);
        assert!(batches(0, 100).is_empty());
        assert!(batches(10, 0).is_empty());
    }

    #[test]
    fn token_batches_near_u64_max_do_not_overflow() {
        let half = u64::MAX / 2 + 1;
        assert_eq!(
            token_batches(u64::MAX, half).collect::<Vec<_>>(),
            vec![0..half, half..u64::MAX]
        );

        let mut batches = token_batches(u64::MAX, 100);
        assert_eq!(batches.next(), Some(0..100));
        assert_eq!(batches.next(), Some(100..200));
    }

    #[tokio::test]
    async fn huge_supply_fails_on_first_read() {
        let mut source = MockNftSource::new();
        source
            .expect_owner_of()
            .returning(|_| Err(anyhow!("execution reverted")));
        source.expect_hero_of().returning(|_| Ok(U256::one()));

        let err = read_tokens(&source, u64::MAX / 2, 100).await.unwrap_err();
        assert_eq!(err.to_string(), "execution reverted");
    }

    #[tokio::test]
    async fn reads_every_token_in_id_order() {
        let mut source = MockNftSource::new();
        source
            .expect_owner_of()
            .times(250)
            .returning(|token_id| Ok(Address::from_low_u64_be(token_id.as_u64() % 3)));
        source
            .expect_hero_of()
            .times(250)
            .returning(|token_id| Ok(token_id * U256::from(1000)));

        let tokens = read_tokens(&source, 250, 100).await.unwrap();

        assert_eq!(tokens.len(), 250);
        for (index, token) in tokens.iter().enumerate() {
            assert_eq!(token.token_id, U256::from(index));
            assert_eq!(token.hero_code, (index * 1000).to_string());
        }
        assert_eq!(tokens[3].owner, Address::zero());
    }

    #[tokio::test]
    async fn failed_read_aborts_the_walk() {
        let mut source = MockNftSource::new();
        source.expect_owner_of().returning(|token_id| {
            if token_id == U256::from(42) {
                Err(anyhow!("execution reverted"))
            } else {
                Ok(Address::from_low_u64_be(1))
            }
        });
        source.expect_hero_of().returning(|_| Ok(U256::one()));

        let err = read_tokens(&source, 100, 10).await.unwrap_err();
        assert_eq!(err.to_string(), "execution reverted");
    }

    #[tokio::test]
    async fn oversized_total_supply_is_rejected() {
        let mut source = MockNftSource::new();
        source
            .expect_total_supply()
            .returning(|| Ok(U256::from(u64::MAX) + U256::one()));
        assert!(read_total_supply(&source).await.is_err());

        let mut source = MockNftSource::new();
        source.expect_total_supply().returning(|| Ok(U256::from(13_000)));
        assert_eq!(read_total_supply(&source).await.unwrap(), 13_000);
    }
}
