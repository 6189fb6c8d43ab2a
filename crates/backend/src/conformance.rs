//! Conformance tests for ledger backends.
//!
//! These tests verify that any backend implementation behaves correctly
//! according to the [`LedgerBackend`] trait contract. To use these tests
//! with a custom backend, call the test functions with an empty backend
//! instance. Each test writes to its own keys, so they may run in sequence
//! against one store.

use crate::{BackendResult, LedgerBackend, ObjectLoader};
use ledger_types::{Blob, LedgerSequence, ObjectKey};

/// Run all conformance tests against an empty backend.
///
/// This is the main entry point for testing a custom backend implementation.
pub async fn conformance<B: ObjectLoader>(backend: &B) -> BackendResult<()> {
    test_empty_storage(backend).await?;
    test_versioned_reads(backend).await?;
    test_deletion(backend).await?;
    test_batch_shape(backend).await?;
    test_batch_matches_single_reads(backend).await?;
    test_latest_sequence_tracking(backend).await?;
    Ok(())
}

/// Create a test key distinct for each `(test, n)` pair.
pub fn make_test_key(test: u8, n: u8) -> ObjectKey {
    let mut key = ObjectKey::repeat_byte(test);
    key.0[31] = n;
    key
}

/// Create a test blob tagged with the sequence it was written at.
pub fn make_test_blob(tag: &str, sequence: LedgerSequence) -> Blob {
    Blob::from(format!("{tag}@{sequence}").into_bytes())
}

/// Test that empty storage returns `None` for all lookups.
pub async fn test_empty_storage<B: LedgerBackend>(backend: &B) -> BackendResult<()> {
    assert!(backend.fetch_ledger_object(ObjectKey::ZERO, 0).await?.is_none());
    assert!(backend.fetch_ledger_object(make_test_key(1, 0), u32::MAX).await?.is_none());
    assert!(backend.latest_sequence().await?.is_none());

    let batch = backend.fetch_ledger_objects(vec![ObjectKey::ZERO, make_test_key(1, 1)], 10).await?;
    assert_eq!(batch, vec![None, None]);
    assert!(backend.fetch_ledger_objects(vec![], 10).await?.is_empty());
    Ok(())
}

/// Test that reads see the newest version at or before the read sequence.
pub async fn test_versioned_reads<B: ObjectLoader>(backend: &B) -> BackendResult<()> {
    let key = make_test_key(2, 0);
    backend.put_object(key, 10, make_test_blob("v", 10)).await?;
    backend.put_object(key, 20, make_test_blob("v", 20)).await?;

    assert!(backend.fetch_ledger_object(key, 9).await?.is_none());
    assert_eq!(backend.fetch_ledger_object(key, 10).await?, Some(make_test_blob("v", 10)));
    assert_eq!(backend.fetch_ledger_object(key, 15).await?, Some(make_test_blob("v", 10)));
    assert_eq!(backend.fetch_ledger_object(key, 20).await?, Some(make_test_blob("v", 20)));
    assert_eq!(backend.fetch_ledger_object(key, 1000).await?, Some(make_test_blob("v", 20)));
    Ok(())
}

/// Test that an empty version hides the object until it is rewritten.
pub async fn test_deletion<B: ObjectLoader>(backend: &B) -> BackendResult<()> {
    let key = make_test_key(3, 0);
    backend.put_object(key, 30, make_test_blob("d", 30)).await?;
    backend.put_object(key, 31, Blob::new()).await?;
    backend.put_object(key, 33, make_test_blob("d", 33)).await?;

    assert_eq!(backend.fetch_ledger_object(key, 30).await?, Some(make_test_blob("d", 30)));
    assert!(backend.fetch_ledger_object(key, 31).await?.is_none());
    assert!(backend.fetch_ledger_object(key, 32).await?.is_none());
    assert_eq!(backend.fetch_ledger_object(key, 33).await?, Some(make_test_blob("d", 33)));

    let batch = backend.fetch_ledger_objects(vec![key, key], 32).await?;
    assert_eq!(batch, vec![None, None]);
    Ok(())
}

/// Test that batched reads keep request order, length and duplicates.
pub async fn test_batch_shape<B: ObjectLoader>(backend: &B) -> BackendResult<()> {
    let a = make_test_key(4, 0);
    let b = make_test_key(4, 1);
    let missing = make_test_key(4, 2);
    backend.put_object(a, 40, make_test_blob("a", 40)).await?;
    backend.put_object(b, 41, make_test_blob("b", 41)).await?;

    let batch = backend.fetch_ledger_objects(vec![b, missing, a, b], 41).await?;
    assert_eq!(
        batch,
        vec![
            Some(make_test_blob("b", 41)),
            None,
            Some(make_test_blob("a", 40)),
            Some(make_test_blob("b", 41)),
        ]
    );

    // `b` is not yet written at 40.
    let batch = backend.fetch_ledger_objects(vec![a, b], 40).await?;
    assert_eq!(batch, vec![Some(make_test_blob("a", 40)), None]);
    Ok(())
}

/// Test that a batched read agrees with the equivalent single reads.
pub async fn test_batch_matches_single_reads<B: ObjectLoader>(backend: &B) -> BackendResult<()> {
    let keys: Vec<_> = (0..16).map(|n| make_test_key(5, n)).collect();
    for (n, key) in keys.iter().enumerate() {
        let sequence = 50 + n as LedgerSequence;
        if n % 3 != 0 {
            backend.put_object(*key, sequence, make_test_blob("m", sequence)).await?;
        }
    }

    for sequence in [49, 55, 60, 80] {
        let batch = backend.fetch_ledger_objects(keys.clone(), sequence).await?;
        assert_eq!(batch.len(), keys.len());
        for (key, blob) in keys.iter().zip(batch) {
            assert_eq!(blob, backend.fetch_ledger_object(*key, sequence).await?);
        }
    }
    Ok(())
}

/// Test that the latest sequence tracks the highest written sequence.
pub async fn test_latest_sequence_tracking<B: ObjectLoader>(backend: &B) -> BackendResult<()> {
    let key = make_test_key(6, 0);
    backend.put_object(key, 1_000, make_test_blob("l", 1_000)).await?;
    assert_eq!(backend.latest_sequence().await?, Some(1_000));

    // Writing an older version does not move the latest sequence back.
    backend.put_object(key, 900, make_test_blob("l", 900)).await?;
    assert_eq!(backend.latest_sequence().await?, Some(1_000));

    // A deletion still counts as a write at its sequence.
    backend.put_object(key, 1_001, Blob::new()).await?;
    assert_eq!(backend.latest_sequence().await?, Some(1_001));
    Ok(())
}
