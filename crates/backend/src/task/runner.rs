//! Backend task runner.
//!
//! The [`BackendTask`] processes requests from a channel and dispatches them
//! to the storage backend. Requests are processed concurrently (up to 64 in
//! flight) via spawned tasks.
//!
//! Object lookups are served from an LRU cache where possible, avoiding
//! repeated backend reads for frequently queried objects. Batched lookups
//! only send the cache misses to the backend, still in a single call.

use super::cache::{DEFAULT_CACHE_CAPACITY, ObjectCache};
use crate::{BackendHandle, BackendRequest, BackendResult, LedgerBackend};
use ledger_types::{Blob, LedgerSequence, ObjectKey};
use std::{num::NonZeroUsize, sync::Arc};
use tokio::sync::{Mutex, Semaphore, mpsc};
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing::{debug, instrument, trace};

/// Channel size for backend read requests.
const READ_CHANNEL_SIZE: usize = 256;

/// Maximum concurrent read request handlers.
const MAX_CONCURRENT_READERS: usize = 64;

/// Shared state for the backend task, holding the backend and cache.
///
/// This is wrapped in an `Arc` so that spawned read handlers can access
/// the backend and cache without moving ownership.
struct BackendTaskInner<B> {
    backend: B,
    cache: Mutex<ObjectCache>,
}

impl<B: LedgerBackend> BackendTaskInner<B> {
    /// Fetch one object, checking the cache first.
    async fn fetch_object(
        &self,
        key: ObjectKey,
        sequence: LedgerSequence,
    ) -> BackendResult<Option<Blob>> {
        if let Some(hit) = self.cache.lock().await.get(&key, sequence) {
            return Ok(Some(hit));
        }
        let blob = self.backend.fetch_ledger_object(key, sequence).await?;
        self.cache.lock().await.put(key, sequence, &blob);
        Ok(blob)
    }

    /// Fetch many objects, sending only cache misses to the backend.
    async fn fetch_objects(
        &self,
        keys: Vec<ObjectKey>,
        sequence: LedgerSequence,
    ) -> BackendResult<Vec<Option<Blob>>> {
        let mut results = Vec::with_capacity(keys.len());
        let mut misses = Vec::new();
        {
            let mut cache = self.cache.lock().await;
            for (position, key) in keys.iter().enumerate() {
                let hit = cache.get(key, sequence);
                if hit.is_none() {
                    misses.push(position);
                }
                results.push(hit);
            }
        }

        if misses.is_empty() {
            return Ok(results);
        }
        trace!(requested = keys.len(), misses = misses.len(), sequence, "batched object fetch");

        let missing_keys = misses.iter().map(|&position| keys[position]).collect();
        let fetched = self.backend.fetch_ledger_objects(missing_keys, sequence).await?;

        let mut cache = self.cache.lock().await;
        for (position, blob) in misses.into_iter().zip(fetched) {
            cache.put(keys[position], sequence, &blob);
            results[position] = blob;
        }
        Ok(results)
    }

    /// Handle a read request.
    async fn handle_read(&self, req: BackendRequest) {
        match req {
            BackendRequest::FetchObject { key, sequence, resp } => {
                let _ = resp.send(self.fetch_object(key, sequence).await);
            }
            BackendRequest::FetchObjects { keys, sequence, resp } => {
                let _ = resp.send(self.fetch_objects(keys, sequence).await);
            }
            BackendRequest::LatestSequence { resp } => {
                let _ = resp.send(self.backend.latest_sequence().await);
            }
        }
    }
}

/// The backend task that processes requests.
///
/// This task receives requests over a channel and dispatches them to the
/// storage backend. It supports graceful shutdown via a cancellation token.
///
/// # Processing Model
///
/// Reads are spawned as concurrent tasks (up to 64 in flight). When the
/// limit is reached the task stops pulling from the channel, which applies
/// backpressure to callers through the bounded channel.
///
/// # Caching
///
/// Present objects are served from an LRU cache keyed by
/// `(key, sequence)`. Ledger state at a loaded sequence never changes, so
/// entries are never invalidated, only evicted.
pub struct BackendTask<B: LedgerBackend> {
    inner: Arc<BackendTaskInner<B>>,
    receiver: mpsc::Receiver<BackendRequest>,
    cancel_token: CancellationToken,
    /// Permits bounding the number of concurrent read handlers.
    reader_permits: Arc<Semaphore>,
    /// Task tracker for concurrent read handlers.
    task_tracker: TaskTracker,
}

impl<B: LedgerBackend> std::fmt::Debug for BackendTask<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendTask").finish_non_exhaustive()
    }
}

impl<B: LedgerBackend> BackendTask<B> {
    /// Create a new backend task with the default cache capacity and return
    /// its handle.
    pub fn new(backend: B, cancel_token: CancellationToken) -> (Self, BackendHandle) {
        Self::with_cache_capacity(backend, cancel_token, DEFAULT_CACHE_CAPACITY)
    }

    /// Create a new backend task with the given cache capacity and return
    /// its handle.
    pub fn with_cache_capacity(
        backend: B,
        cancel_token: CancellationToken,
        cache_capacity: NonZeroUsize,
    ) -> (Self, BackendHandle) {
        let (sender, receiver) = mpsc::channel(READ_CHANNEL_SIZE);
        let task = Self {
            inner: Arc::new(BackendTaskInner {
                backend,
                cache: Mutex::new(ObjectCache::new(cache_capacity)),
            }),
            receiver,
            cancel_token,
            reader_permits: Arc::new(Semaphore::new(MAX_CONCURRENT_READERS)),
            task_tracker: TaskTracker::new(),
        };
        (task, BackendHandle::new(sender))
    }

    /// Spawn the task and return the handle.
    ///
    /// The task will run until the cancellation token is triggered or the
    /// channel is closed.
    pub fn spawn(backend: B, cancel_token: CancellationToken) -> BackendHandle {
        let (task, handle) = Self::new(backend, cancel_token);
        tokio::spawn(task.run());
        handle
    }

    /// Run the task, processing requests until shutdown.
    #[instrument(skip(self), name = "ledger_backend_task")]
    pub async fn run(mut self) {
        debug!("Backend task started");

        'requests: loop {
            tokio::select! {
                biased;

                _ = self.cancel_token.cancelled() => {
                    debug!("Backend task received cancellation signal");
                    break;
                }

                maybe_req = self.receiver.recv() => {
                    let Some(req) = maybe_req else {
                        debug!("Backend request channel closed");
                        break;
                    };

                    // Apply backpressure: wait if we've hit the concurrent reader limit
                    let permit = tokio::select! {
                        _ = self.cancel_token.cancelled() => {
                            debug!("Cancellation while waiting for read task slot");
                            break 'requests;
                        }
                        permit = Arc::clone(&self.reader_permits).acquire_owned() => permit,
                    };
                    let Ok(permit) = permit else {
                        break;
                    };

                    let inner = Arc::clone(&self.inner);
                    self.task_tracker.spawn(async move {
                        let _permit = permit;
                        inner.handle_read(req).await;
                    });
                }
            }
        }

        // Requests still queued are dropped, so their callers observe
        // `BackendError::Cancelled`.
        self.receiver.close();
        debug!("Waiting for in-progress read handlers to complete");
        self.task_tracker.close();
        self.task_tracker.wait().await;
        debug!("Backend task shut down gracefully");
    }
}
