//! # redb-backed Entity Store
//!
//! A single-file store using the redb embedded database, providing:
//! - ACID transactions (one per engine operation)
//! - MVCC (concurrent readers, single writer)
//! - Crash safety (copy-on-write B-trees)
//!
//! ## Layout
//!
//! Every entity bucket is a redb table `&[u8] -> &[u8]` named after the
//! bucket, keyed by the big-endian identifier and valued by the JSON record.
//! redb tables carry no sequence counter of their own, so the next identifier
//! of each bucket lives in the `__sequences` table and is bumped inside the
//! same write transaction that stores the record.

use crate::codec::key_of;
use crate::entities::EntityKind;
use crate::{Id, NaoError};
use redb::{
    Database, ReadTransaction, ReadableDatabase, ReadableTable, ReadableTableMetadata,
    TableDefinition, TableError, WriteTransaction,
};
use std::path::Path;
use std::sync::Arc;

/// Table for sequences: bucket name -> last identifier handed out.
const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("__sequences");

/// Table definition of the bucket for `kind`.
pub(crate) const fn table(kind: EntityKind) -> TableDefinition<'static, &'static [u8], &'static [u8]> {
    TableDefinition::new(kind.bucket())
}

/// Hand out the next identifier of `kind`'s bucket.
///
/// Identifiers start at 1 and are never reused, even after deletes. The bump
/// only becomes visible if `txn` commits.
pub(crate) fn next_sequence(txn: &WriteTransaction, kind: EntityKind) -> Result<Id, NaoError> {
    let mut sequences = txn.open_table(SEQUENCES).map_err(NaoError::store)?;
    let current = sequences
        .get(kind.bucket())
        .map_err(NaoError::store)?
        .map(|v| v.value())
        .unwrap_or(0);
    let next = current.saturating_add(1);
    sequences
        .insert(kind.bucket(), next)
        .map_err(NaoError::store)?;
    Ok(Id(next))
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Point-lookup view of the store as of one transaction.
///
/// Referential validation reads through this so that every lookup of a
/// single create or update sees the same snapshot the write commits against.
pub trait Snapshot {
    /// Whether a record with `id` exists in `kind`'s bucket.
    fn contains(&self, kind: EntityKind, id: Id) -> Result<bool, NaoError>;
}

impl Snapshot for WriteTransaction {
    fn contains(&self, kind: EntityKind, id: Id) -> Result<bool, NaoError> {
        let bucket = self.open_table(table(kind)).map_err(NaoError::store)?;
        let key = key_of(id);
        Ok(bucket
            .get(key.as_slice())
            .map_err(NaoError::store)?
            .is_some())
    }
}

impl Snapshot for ReadTransaction {
    fn contains(&self, kind: EntityKind, id: Id) -> Result<bool, NaoError> {
        let bucket = self.open_table(table(kind)).map_err(|e| missing_bucket(kind, e))?;
        let key = key_of(id);
        Ok(bucket
            .get(key.as_slice())
            .map_err(NaoError::store)?
            .is_some())
    }
}

/// Map a read-side `open_table` failure, singling out buckets never created.
pub(crate) fn missing_bucket(kind: EntityKind, e: TableError) -> NaoError {
    match e {
        TableError::TableDoesNotExist(_) => NaoError::MissingBucket(kind),
        other => NaoError::store(other),
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Shared handle to the entity database.
///
/// Opened once per process and handed to every service that needs it.
/// Cloning is cheap and all clones refer to the same database.
#[derive(Clone)]
pub struct Store {
    db: Arc<Database>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("buckets", &EntityKind::ALL.len())
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Open or create the database at `path`.
    ///
    /// With `create_buckets`, every known bucket is created if missing. This
    /// must happen before concurrent traffic starts.
    pub fn open(path: impl AsRef<Path>, create_buckets: bool) -> Result<Self, NaoError> {
        let db = Database::create(path.as_ref()).map_err(NaoError::store)?;
        let store = Self { db: Arc::new(db) };
        if create_buckets {
            store.create_buckets()?;
        }
        tracing::debug!(path = %path.as_ref().display(), create_buckets, "store opened");
        Ok(store)
    }

    /// Names of every bucket the engine knows about.
    pub fn buckets() -> impl Iterator<Item = &'static str> {
        EntityKind::ALL.into_iter().map(EntityKind::bucket)
    }

    /// Create every missing bucket and the sequence table.
    pub fn create_buckets(&self) -> Result<(), NaoError> {
        let txn = self.begin_write()?;
        for kind in EntityKind::ALL {
            txn.open_table(table(kind)).map_err(NaoError::store)?;
        }
        txn.open_table(SEQUENCES).map_err(NaoError::store)?;
        txn.commit().map_err(NaoError::store)?;
        Ok(())
    }

    /// Drop and recreate every bucket, sequences included.
    ///
    /// Destroys all data. Meant for tests and bootstrap tooling only; no
    /// entity service calls it.
    pub fn reset(&self) -> Result<(), NaoError> {
        let txn = self.begin_write()?;
        for kind in EntityKind::ALL {
            txn.delete_table(table(kind)).map_err(NaoError::store)?;
            txn.open_table(table(kind)).map_err(NaoError::store)?;
        }
        txn.delete_table(SEQUENCES).map_err(NaoError::store)?;
        txn.open_table(SEQUENCES).map_err(NaoError::store)?;
        txn.commit().map_err(NaoError::store)?;
        tracing::warn!("store reset: every bucket dropped and recreated");
        Ok(())
    }

    /// Whether a record exists, looked up in a fresh read transaction.
    pub fn contains(&self, kind: EntityKind, id: Id) -> Result<bool, NaoError> {
        self.begin_read()?.contains(kind, id)
    }

    /// Number of records in each bucket, in bucket order.
    ///
    /// Buckets that were never created count as empty.
    pub fn counts(&self) -> Result<Vec<(EntityKind, u64)>, NaoError> {
        let txn = self.begin_read()?;
        let mut counts = Vec::with_capacity(EntityKind::ALL.len());
        for kind in EntityKind::ALL {
            let count = match txn.open_table(table(kind)) {
                Ok(bucket) => bucket.len().map_err(NaoError::store)?,
                Err(TableError::TableDoesNotExist(_)) => 0,
                Err(e) => return Err(NaoError::store(e)),
            };
            counts.push((kind, count));
        }
        Ok(counts)
    }

    /// Last identifier handed out for `kind`, 0 if none yet.
    pub fn sequence(&self, kind: EntityKind) -> Result<u64, NaoError> {
        let txn = self.begin_read()?;
        let sequences = match txn.open_table(SEQUENCES) {
            Ok(sequences) => sequences,
            Err(TableError::TableDoesNotExist(_)) => return Ok(0),
            Err(e) => return Err(NaoError::store(e)),
        };
        Ok(sequences
            .get(kind.bucket())
            .map_err(NaoError::store)?
            .map(|v| v.value())
            .unwrap_or(0))
    }

    pub(crate) fn begin_read(&self) -> Result<ReadTransaction, NaoError> {
        self.db.begin_read().map_err(NaoError::store)
    }

    pub(crate) fn begin_write(&self) -> Result<WriteTransaction, NaoError> {
        self.db.begin_write().map_err(NaoError::store)
    }
}
