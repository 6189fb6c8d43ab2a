//! Conformance tests for the in-memory ledger backend.

use ledger_backend::{
    BackendTask, LedgerBackend, ObjectLoader,
    conformance::{conformance, make_test_key},
    mem::MemBackend,
};
use ledger_types::Blob;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn mem_backend_conformance() {
    let backend = MemBackend::new();
    conformance(&backend).await.unwrap();
}

#[tokio::test]
async fn handle_reads_agree_with_backend() {
    let backend = MemBackend::new();
    conformance(&backend).await.unwrap();

    let cancel = CancellationToken::new();
    let handle = BackendTask::spawn(backend.clone(), cancel.clone());

    let key = make_test_key(2, 0);
    for sequence in [9, 10, 15, 20] {
        assert_eq!(
            handle.fetch_ledger_object(key, sequence).await.unwrap(),
            backend.fetch_ledger_object(key, sequence).await.unwrap(),
        );
    }
    assert_eq!(
        handle.latest_sequence().await.unwrap(),
        backend.latest_sequence().await.unwrap()
    );

    // Writes through the backend are visible at new sequences via the handle.
    backend.put_object(key, 2_000, Blob::from_static(b"late")).await.unwrap();
    assert_eq!(
        handle.fetch_ledger_object(key, 2_000).await.unwrap(),
        Some(Blob::from_static(b"late"))
    );
    cancel.cancel();
}
