//! Core trait definitions for ledger backends.
//!
//! The [`LedgerBackend`] trait defines the read interface that all backends
//! must implement. Backends are responsible for physical layout, indexing,
//! connection management and retry policy; callers only see point lookups
//! at a ledger sequence.

use crate::BackendResult;
use ledger_types::{Blob, LedgerSequence, ObjectKey};
use std::{future::Future, sync::Arc};

/// Read interface over a versioned ledger object store.
///
/// All methods are async and return futures that are `Send`.
///
/// # Implementation Guide
///
/// Implementers must ensure:
///
/// - **Versioned reads**: a read at sequence `S` returns the newest version
///   of the object written at or before `S`. A version with an empty blob
///   is a deletion and reads as `None`.
///
/// - **Absence is not an error**: a key with no visible version yields
///   `Ok(None)`, never `Err`.
///
/// - **Batched reads preserve shape**: [`fetch_ledger_objects`] returns one
///   slot per requested key, in request order, including duplicates and
///   missing keys.
///
/// - **Independent reads**: concurrent reads of the same or different keys
///   must be safe without external synchronization.
///
/// [`fetch_ledger_objects`]: LedgerBackend::fetch_ledger_objects
pub trait LedgerBackend: Send + Sync + 'static {
    /// Fetch one object as of `sequence`.
    fn fetch_ledger_object(
        &self,
        key: ObjectKey,
        sequence: LedgerSequence,
    ) -> impl Future<Output = BackendResult<Option<Blob>>> + Send;

    /// Fetch many objects as of `sequence` in a single round trip.
    ///
    /// The result has the same length and order as `keys`.
    fn fetch_ledger_objects(
        &self,
        keys: Vec<ObjectKey>,
        sequence: LedgerSequence,
    ) -> impl Future<Output = BackendResult<Vec<Option<Blob>>>> + Send;

    /// The newest ledger sequence the backend holds, if any.
    fn latest_sequence(&self) -> impl Future<Output = BackendResult<Option<LedgerSequence>>> + Send;
}

impl<B: LedgerBackend> LedgerBackend for Arc<B> {
    fn fetch_ledger_object(
        &self,
        key: ObjectKey,
        sequence: LedgerSequence,
    ) -> impl Future<Output = BackendResult<Option<Blob>>> + Send {
        (**self).fetch_ledger_object(key, sequence)
    }

    fn fetch_ledger_objects(
        &self,
        keys: Vec<ObjectKey>,
        sequence: LedgerSequence,
    ) -> impl Future<Output = BackendResult<Vec<Option<Blob>>>> + Send {
        (**self).fetch_ledger_objects(keys, sequence)
    }

    fn latest_sequence(&self) -> impl Future<Output = BackendResult<Option<LedgerSequence>>> + Send {
        (**self).latest_sequence()
    }
}

/// Loads object versions into a backend.
///
/// Used to seed fixtures and local development stores. This is not an
/// ingestion pipeline: it performs no validation of ledger contents.
pub trait ObjectLoader: LedgerBackend {
    /// Store `blob` as the version of `key` written at `sequence`.
    ///
    /// An empty `blob` records a deletion.
    fn put_object(
        &self,
        key: ObjectKey,
        sequence: LedgerSequence,
        blob: Blob,
    ) -> impl Future<Output = BackendResult<()>> + Send;
}
