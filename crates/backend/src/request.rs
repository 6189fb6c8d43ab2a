//! Request and response types for the backend task.
//!
//! These types define the messages sent over the channel to the backend
//! task.

use crate::BackendError;
use ledger_types::{Blob, LedgerSequence, ObjectKey};
use tokio::sync::oneshot;

/// Response sender type alias that propagates Result types.
pub type Responder<T, E = BackendError> = oneshot::Sender<Result<T, E>>;

/// Read requests for the backend task.
///
/// These requests are processed concurrently (up to 64 in flight).
#[derive(Debug)]
pub enum BackendRequest {
    /// Fetch a single object.
    FetchObject {
        /// The object key.
        key: ObjectKey,
        /// The ledger sequence to read at.
        sequence: LedgerSequence,
        /// The response channel.
        resp: Responder<Option<Blob>>,
    },
    /// Fetch many objects in one round trip.
    FetchObjects {
        /// The object keys, in the order results are wanted.
        keys: Vec<ObjectKey>,
        /// The ledger sequence to read at.
        sequence: LedgerSequence,
        /// The response channel.
        resp: Responder<Vec<Option<Blob>>>,
    },
    /// Get the newest ledger sequence in the store.
    LatestSequence {
        /// The response channel.
        resp: Responder<Option<LedgerSequence>>,
    },
}
