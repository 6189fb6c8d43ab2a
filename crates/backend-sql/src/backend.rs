//! Unified SQL backend for ledger storage.
//!
//! Supports both PostgreSQL and SQLite via [`sqlx::Any`]. The backend
//! auto-detects the database type at construction time and runs the
//! appropriate migration.

use crate::SqlBackendError;
use ledger_backend::{BackendResult, LedgerBackend, ObjectLoader};
use ledger_types::{Blob, LedgerSequence, ObjectKey};
use sqlx::{AnyPool, Row};
use std::collections::HashMap;
use tracing::trace;

/// Column holding the object key.
const COL_KEY: &str = "key";
/// Column holding the object blob.
const COL_OBJECT: &str = "object";
/// Alias for the aggregated maximum sequence.
const COL_MAX_SEQ: &str = "max_seq";

/// Upper bound on keys per batched query, below SQLite's bind limit.
const MAX_KEYS_PER_QUERY: usize = 900;

/// Convert a ledger sequence to its SQL representation.
const fn to_i64(sequence: LedgerSequence) -> i64 {
    sequence as i64
}

/// Convert a SQL sequence back to a ledger sequence.
fn from_i64(value: i64) -> Result<LedgerSequence, SqlBackendError> {
    LedgerSequence::try_from(value)
        .map_err(|_| SqlBackendError::Convert(format!("sequence out of range: {value}")))
}

/// Decode a stored object column. NULL and empty values are deletions.
fn decode_object(object: Option<Vec<u8>>) -> Option<Blob> {
    object.filter(|bytes| !bytes.is_empty()).map(Blob::from)
}

/// Decode a stored key column.
fn decode_key(bytes: &[u8]) -> Result<ObjectKey, SqlBackendError> {
    ObjectKey::try_from(bytes)
        .map_err(|_| SqlBackendError::Convert(format!("invalid key length: {}", bytes.len())))
}

/// Pool size for databases other than in-memory SQLite.
pub const MAX_CONNECTIONS: u32 = 16;

/// Each connection to an in-memory SQLite database opens its own database.
fn is_in_memory_sqlite(url: &str) -> bool {
    url.starts_with("sqlite:") && (url.contains(":memory:") || url.contains("mode=memory"))
}

fn max_connections(url: &str) -> u32 {
    if is_in_memory_sqlite(url) { 1 } else { MAX_CONNECTIONS }
}

/// SQL-based ledger backend.
///
/// Uses [`sqlx::Any`] for database-agnostic access, supporting both
/// PostgreSQL and SQLite through a single implementation. The backend
/// is determined by the connection URL at construction time.
///
/// Every version of every object is one row of the `objects` table. A
/// read at sequence `S` selects the row with the greatest sequence not
/// exceeding `S`.
///
/// # Example
///
/// ```no_run
/// # async fn example() {
/// use ledger_backend_sql::SqlBackend;
///
/// // SQLite (in-memory)
/// let backend = SqlBackend::connect("sqlite::memory:").await.unwrap();
///
/// // PostgreSQL
/// let backend = SqlBackend::connect("postgres://localhost/ledger").await.unwrap();
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SqlBackend {
    pool: AnyPool,
}

impl SqlBackend {
    /// Create a new SQL ledger backend from an existing [`AnyPool`].
    ///
    /// Auto-detects the database backend and creates the tables if they
    /// do not already exist. Callers must ensure
    /// [`sqlx::any::install_default_drivers`] has been called before
    /// constructing the pool.
    pub async fn new(pool: AnyPool) -> Result<Self, SqlBackendError> {
        let conn = pool.acquire().await?;
        let backend = conn.backend_name().to_owned();
        drop(conn);

        let migration = match backend.as_str() {
            "PostgreSQL" => include_str!("../migrations/001_initial_pg.sql"),
            "SQLite" => include_str!("../migrations/001_initial.sql"),
            other => {
                return Err(SqlBackendError::Convert(format!(
                    "unsupported database backend: {other}"
                )));
            }
        };
        sqlx::raw_sql(migration).execute(&pool).await?;
        Ok(Self { pool })
    }

    /// Connect to a database URL and create the backend.
    ///
    /// Installs the default sqlx drivers on the first call. The database
    /// type is inferred from the URL scheme (`sqlite:` or `postgres:`).
    ///
    /// For SQLite in-memory databases (`sqlite::memory:`), the pool is
    /// limited to one connection so all operations share the same database.
    /// Other databases get a pool of [`MAX_CONNECTIONS`].
    pub async fn connect(url: &str) -> Result<Self, SqlBackendError> {
        sqlx::any::install_default_drivers();
        let pool: AnyPool =
            sqlx::pool::PoolOptions::new().max_connections(max_connections(url)).connect(url).await?;
        Self::new(pool).await
    }

    async fn read_object(
        &self,
        key: ObjectKey,
        sequence: LedgerSequence,
    ) -> Result<Option<Blob>, SqlBackendError> {
        let row = sqlx::query(
            "SELECT object FROM objects \
             WHERE key = $1 AND sequence <= $2 \
             ORDER BY sequence DESC LIMIT 1",
        )
        .bind(key.as_slice())
        .bind(to_i64(sequence))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.and_then(|r| decode_object(r.get::<Option<Vec<u8>>, _>(COL_OBJECT))))
    }

    /// Read the visible version of each distinct key in one query.
    async fn read_chunk(
        &self,
        keys: &[ObjectKey],
        sequence: LedgerSequence,
        found: &mut HashMap<ObjectKey, Blob>,
    ) -> Result<(), SqlBackendError> {
        // $1 is the sequence; keys take $2 onwards.
        let placeholders = (0..keys.len())
            .map(|i| format!("${}", i + 2))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT o.key, o.object FROM objects o \
             WHERE o.key IN ({placeholders}) \
               AND o.sequence = (SELECT MAX(i.sequence) FROM objects i \
                                 WHERE i.key = o.key AND i.sequence <= $1)"
        );

        let mut query = sqlx::query(&sql).bind(to_i64(sequence));
        for key in keys {
            query = query.bind(key.as_slice());
        }

        for row in query.fetch_all(&self.pool).await? {
            let key = decode_key(&row.get::<Vec<u8>, _>(COL_KEY))?;
            if let Some(blob) = decode_object(row.get::<Option<Vec<u8>>, _>(COL_OBJECT)) {
                found.insert(key, blob);
            }
        }
        Ok(())
    }

    async fn read_objects(
        &self,
        keys: Vec<ObjectKey>,
        sequence: LedgerSequence,
    ) -> Result<Vec<Option<Blob>>, SqlBackendError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let mut distinct = keys.clone();
        distinct.sort_unstable();
        distinct.dedup();

        let mut found = HashMap::with_capacity(distinct.len());
        for chunk in distinct.chunks(MAX_KEYS_PER_QUERY) {
            self.read_chunk(chunk, sequence, &mut found).await?;
        }
        trace!(requested = keys.len(), found = found.len(), sequence, "batched object read");

        Ok(keys.iter().map(|key| found.get(key).cloned()).collect())
    }

    async fn read_latest_sequence(&self) -> Result<Option<LedgerSequence>, SqlBackendError> {
        let row = sqlx::query("SELECT MAX(sequence) AS max_seq FROM objects")
            .fetch_one(&self.pool)
            .await?;
        row.get::<Option<i64>, _>(COL_MAX_SEQ).map(from_i64).transpose()
    }

    async fn write_object(
        &self,
        key: ObjectKey,
        sequence: LedgerSequence,
        blob: Blob,
    ) -> Result<(), SqlBackendError> {
        let object = (!blob.is_empty()).then_some(&blob[..]);
        sqlx::query(
            "INSERT INTO objects (key, sequence, object) VALUES ($1, $2, $3) \
             ON CONFLICT (key, sequence) DO UPDATE SET object = excluded.object",
        )
        .bind(key.as_slice())
        .bind(to_i64(sequence))
        .bind(object)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

impl LedgerBackend for SqlBackend {
    async fn fetch_ledger_object(
        &self,
        key: ObjectKey,
        sequence: LedgerSequence,
    ) -> BackendResult<Option<Blob>> {
        Ok(self.read_object(key, sequence).await?)
    }

    async fn fetch_ledger_objects(
        &self,
        keys: Vec<ObjectKey>,
        sequence: LedgerSequence,
    ) -> BackendResult<Vec<Option<Blob>>> {
        Ok(self.read_objects(keys, sequence).await?)
    }

    async fn latest_sequence(&self) -> BackendResult<Option<LedgerSequence>> {
        Ok(self.read_latest_sequence().await?)
    }
}

impl ObjectLoader for SqlBackend {
    async fn put_object(
        &self,
        key: ObjectKey,
        sequence: LedgerSequence,
        blob: Blob,
    ) -> BackendResult<()> {
        Ok(self.write_object(key, sequence, blob).await?)
    }
}
