//! Ergonomic handle for interacting with the backend task.
//!
//! The [`BackendHandle`] provides a convenient API for sending requests to
//! the backend task without needing to construct request types manually.

use crate::{BackendError, BackendRequest, BackendResult, LedgerBackend};
use ledger_types::{Blob, LedgerSequence, ObjectKey};
use tokio::sync::{mpsc, oneshot};

/// Handle for interacting with the backend task.
///
/// This handle can be cloned and shared across tasks. It implements
/// [`LedgerBackend`], so anything written against the trait runs over the
/// task (and its cache) unchanged.
#[derive(Clone, Debug)]
pub struct BackendHandle {
    sender: mpsc::Sender<BackendRequest>,
}

impl BackendHandle {
    /// Create a new handle with the given sender.
    pub(crate) const fn new(sender: mpsc::Sender<BackendRequest>) -> Self {
        Self { sender }
    }

    /// Send a request and wait for the response.
    async fn send<T>(
        &self,
        req: BackendRequest,
        rx: oneshot::Receiver<BackendResult<T>>,
    ) -> BackendResult<T> {
        self.sender.send(req).await.map_err(|_| BackendError::Cancelled)?;
        rx.await.map_err(|_| BackendError::Cancelled)?
    }
}

impl LedgerBackend for BackendHandle {
    async fn fetch_ledger_object(
        &self,
        key: ObjectKey,
        sequence: LedgerSequence,
    ) -> BackendResult<Option<Blob>> {
        let (resp, rx) = oneshot::channel();
        self.send(BackendRequest::FetchObject { key, sequence, resp }, rx).await
    }

    async fn fetch_ledger_objects(
        &self,
        keys: Vec<ObjectKey>,
        sequence: LedgerSequence,
    ) -> BackendResult<Vec<Option<Blob>>> {
        let (resp, rx) = oneshot::channel();
        self.send(BackendRequest::FetchObjects { keys, sequence, resp }, rx).await
    }

    async fn latest_sequence(&self) -> BackendResult<Option<LedgerSequence>> {
        let (resp, rx) = oneshot::channel();
        self.send(BackendRequest::LatestSequence { resp }, rx).await
    }
}
