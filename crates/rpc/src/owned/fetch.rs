//! Batched resolution of collected keys.

use super::TraverseResult;
use ledger_backend::LedgerBackend;
use ledger_types::{Blob, LedgerSequence, ObjectKey};

/// Resolve `keys` in one backend round trip and hand each present object
/// to `callback`, in key order.
///
/// Keys whose object is absent are skipped. No round trip is made for an
/// empty key list. Returns the number of objects delivered.
pub(crate) async fn fetch_objects<B, F>(
    backend: &B,
    keys: Vec<ObjectKey>,
    sequence: LedgerSequence,
    callback: &mut F,
) -> TraverseResult<usize>
where
    B: LedgerBackend,
    F: FnMut(Blob),
{
    if keys.is_empty() {
        return Ok(0);
    }

    let mut delivered = 0;
    for blob in backend.fetch_ledger_objects(keys, sequence).await?.into_iter().flatten() {
        callback(blob);
        delivered += 1;
    }
    Ok(delivered)
}
