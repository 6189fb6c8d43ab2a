//! LRU cache for backend object lookups.
//!
//! Caches recently read object versions to avoid repeated backend reads for
//! frequently queried objects, such as account roots and directory heads.

use ledger_types::{Blob, LedgerSequence, ObjectKey};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Default capacity of the object cache.
pub(crate) const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1024) {
    Some(cap) => cap,
    None => unreachable!(),
};

/// LRU cache of present objects, keyed by `(key, sequence)`.
///
/// Only present objects are cached. A miss at a sequence the store has not
/// finished loading may become a hit later, so absence is always re-read.
pub(crate) struct ObjectCache {
    objects: LruCache<(ObjectKey, LedgerSequence), Blob>,
}

impl ObjectCache {
    /// Create a new cache with the given capacity.
    pub(crate) fn new(cap: NonZeroUsize) -> Self {
        Self { objects: LruCache::new(cap) }
    }

    /// Look up a cached object.
    pub(crate) fn get(&mut self, key: &ObjectKey, sequence: LedgerSequence) -> Option<Blob> {
        self.objects.get(&(*key, sequence)).cloned()
    }

    /// Insert an object, ignoring absent results.
    pub(crate) fn put(&mut self, key: ObjectKey, sequence: LedgerSequence, blob: &Option<Blob>) {
        if let Some(blob) = blob {
            self.objects.put((key, sequence), blob.clone());
        }
    }

    /// Number of cached objects.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.objects.len()
    }
}
