//! Backend selected at runtime.

use ledger_backend::{BackendResult, LedgerBackend, mem::MemBackend};
use ledger_backend_sql::SqlBackend;
use ledger_types::{Blob, LedgerSequence, ObjectKey};

/// Either ledger backend, chosen by [`BackendMode`].
///
/// [`BackendMode`]: crate::config::BackendMode
#[derive(Debug, Clone)]
pub enum EitherBackend {
    /// In-memory backend.
    Memory(MemBackend),
    /// SQL backend (PostgreSQL or SQLite).
    Sql(SqlBackend),
}

impl LedgerBackend for EitherBackend {
    async fn fetch_ledger_object(
        &self,
        key: ObjectKey,
        sequence: LedgerSequence,
    ) -> BackendResult<Option<Blob>> {
        match self {
            Self::Memory(backend) => backend.fetch_ledger_object(key, sequence).await,
            Self::Sql(backend) => backend.fetch_ledger_object(key, sequence).await,
        }
    }

    async fn fetch_ledger_objects(
        &self,
        keys: Vec<ObjectKey>,
        sequence: LedgerSequence,
    ) -> BackendResult<Vec<Option<Blob>>> {
        match self {
            Self::Memory(backend) => backend.fetch_ledger_objects(keys, sequence).await,
            Self::Sql(backend) => backend.fetch_ledger_objects(keys, sequence).await,
        }
    }

    async fn latest_sequence(&self) -> BackendResult<Option<LedgerSequence>> {
        match self {
            Self::Memory(backend) => backend.latest_sequence().await,
            Self::Sql(backend) => backend.latest_sequence().await,
        }
    }
}
