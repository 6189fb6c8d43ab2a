//! In-memory ledger backend for testing.
//!
//! This backend stores all object versions in memory using standard Rust
//! collections. It is primarily intended for testing and development.

use crate::{BackendResult, LedgerBackend, ObjectLoader};
use ledger_types::{Blob, LedgerSequence, ObjectKey};
use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};
use tokio::sync::RwLock;

/// Inner storage state.
#[derive(Default)]
struct MemBackendInner {
    /// Object versions, indexed by key and then by the sequence at which
    /// each version was written.
    objects: HashMap<ObjectKey, BTreeMap<LedgerSequence, Blob>>,
    /// Highest sequence any version was written at.
    latest: Option<LedgerSequence>,
}

impl MemBackendInner {
    /// The newest non-deleted version of `key` visible at `sequence`.
    fn read(&self, key: &ObjectKey, sequence: LedgerSequence) -> Option<Blob> {
        self.objects
            .get(key)?
            .range(..=sequence)
            .next_back()
            .map(|(_, blob)| blob)
            .filter(|blob| !blob.is_empty())
            .cloned()
    }
}

/// In-memory ledger backend.
///
/// This backend is thread-safe and suitable for concurrent access.
/// All operations are protected by an async read-write lock. Clones share
/// the same underlying store.
#[derive(Clone, Default)]
pub struct MemBackend {
    inner: Arc<RwLock<MemBackendInner>>,
}

impl MemBackend {
    /// Create a new empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl std::fmt::Debug for MemBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemBackend").finish_non_exhaustive()
    }
}

impl LedgerBackend for MemBackend {
    async fn fetch_ledger_object(
        &self,
        key: ObjectKey,
        sequence: LedgerSequence,
    ) -> BackendResult<Option<Blob>> {
        Ok(self.inner.read().await.read(&key, sequence))
    }

    async fn fetch_ledger_objects(
        &self,
        keys: Vec<ObjectKey>,
        sequence: LedgerSequence,
    ) -> BackendResult<Vec<Option<Blob>>> {
        let inner = self.inner.read().await;
        Ok(keys.iter().map(|key| inner.read(key, sequence)).collect())
    }

    async fn latest_sequence(&self) -> BackendResult<Option<LedgerSequence>> {
        Ok(self.inner.read().await.latest)
    }
}

impl ObjectLoader for MemBackend {
    async fn put_object(
        &self,
        key: ObjectKey,
        sequence: LedgerSequence,
        blob: Blob,
    ) -> BackendResult<()> {
        let mut inner = self.inner.write().await;
        inner.objects.entry(key).or_default().insert(sequence, blob);
        inner.latest = inner.latest.max(Some(sequence));
        Ok(())
    }
}
