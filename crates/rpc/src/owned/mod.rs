//! Owner directory traversal with resumable cursors.
//!
//! Every account owns a directory: a chain of [`DirectoryPage`]s linked by
//! `next_page`, whose entries are the keys of the objects the account owns.
//! [`traverse_owned_nodes`] walks that chain from a client-supplied marker,
//! resolves up to `limit` objects in a single batched backend read, and
//! returns the [`AccountCursor`] the client passes back to continue.
//!
//! The server holds no state between calls. Everything needed to resume is
//! in the cursor.
//!
//! [`DirectoryPage`]: ledger_types::DirectoryPage

mod error;
pub use error::{TraverseError, TraverseResult};

mod fetch;

mod walker;
use walker::DirectoryChainWalker;

use ledger_backend::LedgerBackend;
use ledger_types::{AccountCursor, AccountId, Blob, LedgerSequence, keylet};
use tracing::{debug, instrument};

/// Traverse the objects owned by `account` as of `sequence`.
///
/// Calls `callback` once per resolved object, in directory order, before
/// returning. At most `limit` objects are delivered. On success returns the
/// cursor to resume from, which is [`AccountCursor::TERMINAL`] once the
/// directory is exhausted.
///
/// The account root is checked on every call, marker or not. The marker
/// is parsed after that check, so an unknown account is reported even if
/// the marker is malformed.
///
/// Backend failures are returned unchanged and never retried. Dropping the
/// returned future abandons the traversal; no callback runs afterwards.
#[instrument(skip(backend, account, callback), fields(account = %account))]
pub async fn traverse_owned_nodes<B, F>(
    backend: &B,
    account: AccountId,
    sequence: LedgerSequence,
    limit: u32,
    marker: Option<&str>,
    mut callback: F,
) -> TraverseResult<AccountCursor>
where
    B: LedgerBackend,
    F: FnMut(Blob),
{
    if backend.fetch_ledger_object(keylet::account(&account), sequence).await?.is_none() {
        return Err(TraverseError::AccountNotFound);
    }

    let start = AccountCursor::parse(marker)?;

    let walker = DirectoryChainWalker::new(backend, keylet::owner_dir(&account), sequence);
    let walk = walker.walk(start, limit as usize).await?;

    let collected = walk.keys.len();
    let delivered = fetch::fetch_objects(backend, walk.keys, sequence, &mut callback).await?;
    debug!(collected, delivered, next = %walk.next, "owned objects traversed");

    Ok(walk.next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_backend::{BackendError, BackendResult, ObjectLoader, mem::MemBackend};
    use alloy::primitives::{B256, b256, hex};
    use ledger_types::{DirectoryPage, MALFORMED_CURSOR, ObjectKey};
    use std::sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    };

    const SEQ: LedgerSequence = 30;

    const INDEX1: B256 = b256!("E6DBAFC99223B42257915A63DFC6B0C032D4070F9A574B255AD97466726FC321");
    const INDEX2: B256 = b256!("E6DBAFC99223B42257915A63DFC6B0C032D4070F9A574B255AD97466726FC322");

    fn account() -> AccountId {
        "rf1BiGeXwwQoi8Z2ueFYTEXSwuJYfV2Jpn".parse().unwrap()
    }

    fn numbered(n: u8) -> ObjectKey {
        ObjectKey::with_last_byte(n)
    }

    /// Counts round trips and can be told to fail single or batched reads.
    #[derive(Clone, Debug, Default)]
    struct FakeBackend {
        inner: MemBackend,
        single_reads: Arc<AtomicUsize>,
        batch_reads: Arc<AtomicUsize>,
        fail_batches: Arc<AtomicBool>,
        /// 1-based index of the single read to fail, `0` for none.
        fail_single_read: Arc<AtomicUsize>,
        /// Fail with `Cancelled` instead of a backend error.
        fail_cancelled: Arc<AtomicBool>,
    }

    impl FakeBackend {
        fn failure(&self) -> BackendError {
            if self.fail_cancelled.load(Ordering::SeqCst) {
                BackendError::Cancelled
            } else {
                BackendError::backend(std::io::Error::other("timed out"))
            }
        }

        fn fail_single_read(&self, nth: usize, cancelled: bool) {
            self.fail_single_read.store(nth, Ordering::SeqCst);
            self.fail_cancelled.store(cancelled, Ordering::SeqCst);
        }

        fn single_reads(&self) -> usize {
            self.single_reads.load(Ordering::SeqCst)
        }

        fn batch_reads(&self) -> usize {
            self.batch_reads.load(Ordering::SeqCst)
        }

        async fn put(&self, key: ObjectKey, blob: Blob) {
            self.inner.put_object(key, SEQ, blob).await.unwrap();
        }

        async fn put_account(&self, account: &AccountId) {
            self.put(keylet::account(account), Blob::from_static(b"account root")).await;
        }

        /// Store page `page_number`, and an object for each of its entries.
        async fn put_page(
            &self,
            account: &AccountId,
            page_number: u64,
            entries: Vec<ObjectKey>,
            next_page: u64,
        ) {
            let root = keylet::owner_dir(account);
            for entry in &entries {
                self.put(*entry, Blob::copy_from_slice(entry.as_slice())).await;
            }
            let page = DirectoryPage::new(*account, root, entries, next_page);
            self.put(keylet::page(&root, page_number), page.encoded()).await;
        }
    }

    impl LedgerBackend for FakeBackend {
        async fn fetch_ledger_object(
            &self,
            key: ObjectKey,
            sequence: LedgerSequence,
        ) -> BackendResult<Option<Blob>> {
            let nth = self.single_reads.fetch_add(1, Ordering::SeqCst) + 1;
            if nth == self.fail_single_read.load(Ordering::SeqCst) {
                return Err(self.failure());
            }
            self.inner.fetch_ledger_object(key, sequence).await
        }

        async fn fetch_ledger_objects(
            &self,
            keys: Vec<ObjectKey>,
            sequence: LedgerSequence,
        ) -> BackendResult<Vec<Option<Blob>>> {
            self.batch_reads.fetch_add(1, Ordering::SeqCst);
            if self.fail_batches.load(Ordering::SeqCst) {
                return Err(self.failure());
            }
            self.inner.fetch_ledger_objects(keys, sequence).await
        }

        async fn latest_sequence(&self) -> BackendResult<Option<LedgerSequence>> {
            self.inner.latest_sequence().await
        }
    }

    async fn traverse(
        backend: &FakeBackend,
        limit: u32,
        marker: Option<&str>,
    ) -> (TraverseResult<AccountCursor>, Vec<Blob>) {
        let mut objects = Vec::new();
        let result =
            traverse_owned_nodes(backend, account(), SEQ, limit, marker, |blob| objects.push(blob))
                .await;
        (result, objects)
    }

    #[tokio::test]
    async fn account_not_found() {
        let backend = FakeBackend::default();
        let (result, objects) = traverse(&backend, 10, None).await;
        assert!(matches!(result, Err(TraverseError::AccountNotFound)));
        assert!(objects.is_empty());
        assert_eq!(backend.batch_reads(), 0);
    }

    #[tokio::test]
    async fn account_checked_before_marker() {
        let backend = FakeBackend::default();
        let (result, _) = traverse(&backend, 10, Some("nothex,10")).await;
        assert!(matches!(result, Err(TraverseError::AccountNotFound)));
    }

    #[tokio::test]
    async fn malformed_markers() {
        let backend = FakeBackend::default();
        backend.put_account(&account()).await;

        for marker in ["nothex,10", "nothex,abc", &format!("{INDEX1},abc"), "123"] {
            let (result, objects) = traverse(&backend, 10, Some(marker)).await;
            let err = result.unwrap_err();
            assert!(matches!(err, TraverseError::MalformedCursor(_)), "{marker}");
            assert_eq!(err.to_string(), MALFORMED_CURSOR);
            assert!(objects.is_empty());
        }
    }

    #[tokio::test]
    async fn single_page_exhausted() {
        let backend = FakeBackend::default();
        backend.put_account(&account()).await;
        backend.put_page(&account(), 0, vec![INDEX1, INDEX2], 0).await;

        let (result, objects) = traverse(&backend, 10, None).await;
        assert_eq!(result.unwrap(), AccountCursor::TERMINAL);
        assert_eq!(
            objects,
            vec![Blob::copy_from_slice(INDEX1.as_slice()), Blob::copy_from_slice(INDEX2.as_slice())]
        );
    }

    #[tokio::test]
    async fn limit_reached_on_first_page() {
        let backend = FakeBackend::default();
        backend.put_account(&account()).await;
        backend.put_page(&account(), 0, vec![INDEX1; 11], 0).await;

        let (result, objects) = traverse(&backend, 10, None).await;
        let cursor = result.unwrap();
        assert_eq!(cursor, AccountCursor::new(INDEX1, 0));
        assert_eq!(cursor.to_marker(), format!("{},0", hex_upper(INDEX1)));
        assert_eq!(objects.len(), 10);
    }

    #[tokio::test]
    async fn limit_reached_on_later_page() {
        let backend = FakeBackend::default();
        backend.put_account(&account()).await;
        backend.put_page(&account(), 0, vec![INDEX1; 10], 99).await;
        backend.put_page(&account(), 99, vec![INDEX1; 10], 0).await;

        let (result, objects) = traverse(&backend, 15, None).await;
        assert_eq!(result.unwrap(), AccountCursor::new(INDEX1, 99));
        assert_eq!(objects.len(), 15);
    }

    // A stale marker reads the same as a finished directory. Kept for
    // client compatibility; a distinct error would be the stricter choice.
    #[tokio::test]
    async fn resume_point_missing_from_page() {
        let backend = FakeBackend::default();
        backend.put_account(&account()).await;
        backend.put_page(&account(), 99, vec![INDEX1; 10], 0).await;

        let marker = format!("{},99", hex_upper(INDEX2));
        let (result, objects) = traverse(&backend, 10, Some(&marker)).await;
        assert_eq!(result.unwrap(), AccountCursor::TERMINAL);
        assert!(objects.is_empty());
        assert_eq!(backend.batch_reads(), 0);
    }

    #[tokio::test]
    async fn resume_from_marker_page() {
        let backend = FakeBackend::default();
        backend.put_account(&account()).await;
        backend.put_page(&account(), 99, vec![INDEX1; 10], 0).await;

        let marker = format!("{},99", hex_upper(INDEX1));
        let (result, objects) = traverse(&backend, 8, Some(&marker)).await;
        assert_eq!(result.unwrap(), AccountCursor::new(INDEX1, 99));
        assert_eq!(objects.len(), 8);
    }

    // Same compatibility choice as a missing resume point: the client
    // cannot tell a vanished page from the end of the directory.
    #[tokio::test]
    async fn start_page_missing() {
        let backend = FakeBackend::default();
        backend.put_account(&account()).await;

        let (result, objects) = traverse(&backend, 10, None).await;
        assert_eq!(result.unwrap(), AccountCursor::TERMINAL);
        assert!(objects.is_empty());

        let marker = format!("{},7", hex_upper(INDEX1));
        let (result, _) = traverse(&backend, 10, Some(&marker)).await;
        assert_eq!(result.unwrap(), AccountCursor::TERMINAL);
    }

    #[tokio::test]
    async fn pages_resume_without_gaps_or_duplicates() {
        let backend = FakeBackend::default();
        backend.put_account(&account()).await;
        backend.put_page(&account(), 0, (1..=4).map(numbered).collect(), 3).await;
        backend.put_page(&account(), 3, (5..=9).map(numbered).collect(), 1).await;
        backend.put_page(&account(), 1, (10..=12).map(numbered).collect(), 0).await;

        let mut seen = Vec::new();
        let mut marker = None;
        loop {
            let (result, objects) = traverse(&backend, 5, marker.as_deref()).await;
            let cursor = result.unwrap();
            assert!(objects.len() <= 5);
            seen.extend(objects);
            if cursor.is_terminal() {
                break;
            }
            marker = Some(cursor.to_marker());
        }

        let expected: Vec<_> =
            (1..=12).map(|n| Blob::copy_from_slice(numbered(n).as_slice())).collect();
        assert_eq!(seen, expected);
    }

    #[tokio::test]
    async fn exact_fill_returns_resumable_cursor() {
        let backend = FakeBackend::default();
        backend.put_account(&account()).await;
        backend.put_page(&account(), 0, vec![numbered(1), numbered(2)], 0).await;

        let (result, objects) = traverse(&backend, 2, None).await;
        let cursor = result.unwrap();
        assert_eq!(cursor, AccountCursor::new(numbered(2), 0));
        assert_eq!(objects.len(), 2);

        let (result, objects) = traverse(&backend, 2, Some(&cursor.to_marker())).await;
        assert_eq!(result.unwrap(), AccountCursor::TERMINAL);
        assert!(objects.is_empty());
    }

    #[tokio::test]
    async fn one_batched_fetch_per_call() {
        let backend = FakeBackend::default();
        backend.put_account(&account()).await;
        backend.put_page(&account(), 0, (1..=3).map(numbered).collect(), 5).await;
        backend.put_page(&account(), 5, (4..=6).map(numbered).collect(), 6).await;
        backend.put_page(&account(), 6, (7..=9).map(numbered).collect(), 0).await;

        let (result, objects) = traverse(&backend, 100, None).await;
        assert!(result.unwrap().is_terminal());
        assert_eq!(objects.len(), 9);
        assert_eq!(backend.batch_reads(), 1);
        // The account root, then each of the three pages.
        assert_eq!(backend.single_reads(), 4);
    }

    #[tokio::test]
    async fn zero_limit_returns_start_cursor() {
        let backend = FakeBackend::default();
        backend.put_account(&account()).await;
        backend.put_page(&account(), 0, vec![INDEX1, INDEX2], 0).await;

        let marker = format!("{},0", hex_upper(INDEX1));
        let (result, objects) = traverse(&backend, 0, Some(&marker)).await;
        assert_eq!(result.unwrap(), AccountCursor::new(INDEX1, 0));
        assert!(objects.is_empty());
        assert_eq!(backend.batch_reads(), 0);
        assert_eq!(backend.single_reads(), 1);
    }

    #[tokio::test]
    async fn absent_objects_are_skipped() {
        let backend = FakeBackend::default();
        let account = account();
        backend.put_account(&account).await;
        backend.put_page(&account, 0, vec![numbered(1), numbered(2), numbered(3)], 0).await;
        backend.inner.put_object(numbered(2), SEQ, Blob::new()).await.unwrap();

        let (result, objects) = traverse(&backend, 10, None).await;
        assert!(result.unwrap().is_terminal());
        assert_eq!(
            objects,
            vec![
                Blob::copy_from_slice(numbered(1).as_slice()),
                Blob::copy_from_slice(numbered(3).as_slice()),
            ]
        );
    }

    #[tokio::test]
    async fn backend_failure_propagates() {
        let backend = FakeBackend::default();
        backend.put_account(&account()).await;
        backend.put_page(&account(), 0, vec![INDEX1], 0).await;
        backend.fail_batches.store(true, Ordering::SeqCst);

        let (result, objects) = traverse(&backend, 10, None).await;
        assert!(matches!(result, Err(TraverseError::Backend(_))));
        assert!(objects.is_empty());
        assert_eq!(backend.batch_reads(), 1);
    }

    #[tokio::test]
    async fn batch_cancellation_propagates() {
        let backend = FakeBackend::default();
        backend.put_account(&account()).await;
        backend.put_page(&account(), 0, vec![INDEX1], 0).await;
        backend.fail_cancelled.store(true, Ordering::SeqCst);
        backend.fail_batches.store(true, Ordering::SeqCst);

        let (result, objects) = traverse(&backend, 10, None).await;
        assert!(matches!(result, Err(TraverseError::Backend(BackendError::Cancelled))));
        assert!(objects.is_empty());
    }

    #[tokio::test]
    async fn account_check_failure_propagates() {
        for cancelled in [false, true] {
            let backend = FakeBackend::default();
            backend.put_account(&account()).await;
            backend.put_page(&account(), 0, vec![INDEX1], 0).await;
            backend.fail_single_read(1, cancelled);

            let (result, objects) = traverse(&backend, 10, None).await;
            assert!(matches!(result, Err(TraverseError::Backend(_))), "cancelled: {cancelled}");
            assert!(objects.is_empty());
            assert_eq!(backend.single_reads(), 1);
            assert_eq!(backend.batch_reads(), 0);
        }
    }

    #[tokio::test]
    async fn page_fetch_failure_mid_walk_is_terminal() {
        for cancelled in [false, true] {
            let backend = FakeBackend::default();
            backend.put_account(&account()).await;
            backend.put_page(&account(), 0, (1..=3).map(numbered).collect(), 5).await;
            backend.put_page(&account(), 5, (4..=6).map(numbered).collect(), 6).await;
            backend.put_page(&account(), 6, (7..=9).map(numbered).collect(), 0).await;
            // Reads: account root, page 0, then page 5 fails.
            backend.fail_single_read(3, cancelled);

            let (result, objects) = traverse(&backend, 100, None).await;
            let err = result.unwrap_err();
            if cancelled {
                assert!(matches!(err, TraverseError::Backend(BackendError::Cancelled)));
            } else {
                assert!(matches!(err, TraverseError::Backend(BackendError::Backend(_))));
            }
            assert!(objects.is_empty());
            assert_eq!(backend.single_reads(), 3);
            assert_eq!(backend.batch_reads(), 0);
        }
    }

    #[tokio::test]
    async fn corrupt_page_is_an_error() {
        let backend = FakeBackend::default();
        backend.put_account(&account()).await;
        let root = keylet::owner_dir(&account());
        backend.put(root, Blob::from_static(b"not a directory page")).await;

        let (result, _) = traverse(&backend, 10, None).await;
        assert!(matches!(result, Err(TraverseError::Corrupt(_))));
    }

    #[tokio::test]
    async fn page_cycle_ends_traversal() {
        let backend = FakeBackend::default();
        backend.put_account(&account()).await;
        backend.put_page(&account(), 0, vec![numbered(1)], 2).await;
        backend.put_page(&account(), 2, vec![numbered(2)], 3).await;
        backend.put_page(&account(), 3, vec![numbered(3)], 2).await;

        let (result, objects) = traverse(&backend, 10, None).await;
        assert_eq!(result.unwrap(), AccountCursor::TERMINAL);
        assert_eq!(objects.len(), 3);
    }

    #[tokio::test]
    async fn dangling_next_page_ends_traversal() {
        let backend = FakeBackend::default();
        backend.put_account(&account()).await;
        backend.put_page(&account(), 0, vec![numbered(1), numbered(2)], 4).await;

        let (result, objects) = traverse(&backend, 10, None).await;
        assert_eq!(result.unwrap(), AccountCursor::TERMINAL);
        assert_eq!(objects.len(), 2);
    }

    #[tokio::test]
    async fn object_order_follows_directory_order() {
        let backend = FakeBackend::default();
        backend.put_account(&account()).await;
        let entries = vec![numbered(9), numbered(3), numbered(7), numbered(1)];
        backend.put_page(&account(), 0, entries.clone(), 0).await;

        let (result, objects) = traverse(&backend, 10, None).await;
        assert!(result.unwrap().is_terminal());
        let expected: Vec<_> =
            entries.iter().map(|key| Blob::copy_from_slice(key.as_slice())).collect();
        assert_eq!(objects, expected);
    }

    fn hex_upper(key: ObjectKey) -> String {
        hex::encode_upper(key)
    }
}
