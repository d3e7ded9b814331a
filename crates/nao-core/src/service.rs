//! # Generic Persistence Engine
//!
//! `Service<E>` implements create, update, delete and the scans once, for
//! every [`Entity`]. Each call runs in exactly one store transaction and
//! blocks until it commits or fails; a failure at any step before commit
//! drops the transaction, which redb aborts, so nothing is half-written.
//!
//! ## Create
//!
//! normalize → begin write → validate (same txn) → next sequence →
//! assign identity → encode → put → commit
//!
//! ## Update
//!
//! normalize → begin write → validate (same txn) → read stored record
//! (`NotFound` if absent) → decode → carry forward → encode → put → commit
//!
//! `update` lets the later commit win. `update_checked` additionally rejects
//! a caller whose version is not the stored one.

use crate::codec::{id_of, key_of};
use crate::entity::Entity;
use crate::storage::{Store, missing_bucket, next_sequence, table};
use crate::{Id, NaoError};
use redb::{ReadableTable, ReadableTableMetadata};
use std::marker::PhantomData;

/// Persistence operations for entity type `E`.
pub struct Service<E: Entity> {
    store: Store,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for Service<E> {
    fn clone(&self) -> Self {
        Self::new(self.store.clone())
    }
}

impl<E: Entity> std::fmt::Debug for Service<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Service")
            .field("bucket", &E::KIND.bucket())
            .finish_non_exhaustive()
    }
}

/// How an update treats the caller's version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VersionPolicy {
    /// Overwrite whatever is stored.
    LastWriterWins,
    /// Reject unless the caller saw the stored version.
    MustMatch,
}

impl<E: Entity> Service<E> {
    /// Create a service over the shared store.
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// The store this service writes to.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Persist a new record and return it with its identifier and version 0.
    ///
    /// Any identifier or version on `entity` is ignored.
    pub fn create(&self, mut entity: E) -> Result<E, NaoError> {
        entity.normalize()?;

        let txn = self.store.begin_write()?;
        entity.validate(&txn)?;

        let id = next_sequence(&txn, E::KIND)?;
        entity.assign_identity(id);
        let bytes = entity.encode()?;
        {
            let mut bucket = txn.open_table(table(E::KIND)).map_err(NaoError::store)?;
            let key = key_of(id);
            bucket
                .insert(key.as_slice(), bytes.as_slice())
                .map_err(NaoError::store)?;
        }
        txn.commit().map_err(NaoError::store)?;

        tracing::debug!(bucket = %E::KIND, %id, "created");
        Ok(entity)
    }

    /// Replace the stored record with `entity.id()`.
    ///
    /// The new version is derived from the stored one, never from `entity`.
    /// Concurrent updates of one record serialize at commit and the later
    /// one wins; use [`update_checked`](Self::update_checked) to reject
    /// updates based on a stale read instead.
    pub fn update(&self, entity: E) -> Result<E, NaoError> {
        self.write_update(entity, VersionPolicy::LastWriterWins)
    }

    /// Like [`update`](Self::update), but fails with `VersionConflict` unless
    /// `entity.version()` equals the stored version.
    pub fn update_checked(&self, entity: E) -> Result<E, NaoError> {
        self.write_update(entity, VersionPolicy::MustMatch)
    }

    fn write_update(&self, mut entity: E, policy: VersionPolicy) -> Result<E, NaoError> {
        entity.normalize()?;

        let txn = self.store.begin_write()?;
        entity.validate(&txn)?;

        let id = entity.id();
        let key = key_of(id);
        {
            let mut bucket = txn.open_table(table(E::KIND)).map_err(NaoError::store)?;
            let old = match bucket.get(key.as_slice()).map_err(NaoError::store)? {
                Some(bytes) => E::decode(id, bytes.value())?,
                None => return Err(NaoError::NotFound { kind: E::KIND, id }),
            };

            if policy == VersionPolicy::MustMatch && entity.version() != old.version() {
                return Err(NaoError::VersionConflict {
                    kind: E::KIND,
                    id,
                    expected: entity.version(),
                    found: old.version(),
                });
            }

            entity.carry_forward(&old)?;
            let bytes = entity.encode()?;
            bucket
                .insert(key.as_slice(), bytes.as_slice())
                .map_err(NaoError::store)?;
        }
        txn.commit().map_err(NaoError::store)?;

        tracing::debug!(bucket = %E::KIND, %id, version = %entity.version(), "updated");
        Ok(entity)
    }

    /// Remove the record with `id`. Succeeds whether or not it existed.
    ///
    /// Records referencing it elsewhere are left untouched.
    pub fn delete(&self, id: Id) -> Result<(), NaoError> {
        let txn = self.store.begin_write()?;
        let existed = {
            let mut bucket = txn.open_table(table(E::KIND)).map_err(NaoError::store)?;
            let key = key_of(id);
            bucket
                .remove(key.as_slice())
                .map_err(NaoError::store)?
                .is_some()
        };
        txn.commit().map_err(NaoError::store)?;

        tracing::debug!(bucket = %E::KIND, %id, existed, "deleted");
        Ok(())
    }

    /// The record with `id`.
    pub fn get_by_id(&self, id: Id) -> Result<E, NaoError> {
        let txn = self.store.begin_read()?;
        let bucket = txn
            .open_table(table(E::KIND))
            .map_err(|e| missing_bucket(E::KIND, e))?;
        let key = key_of(id);
        match bucket.get(key.as_slice()).map_err(NaoError::store)? {
            Some(bytes) => E::decode(id, bytes.value()),
            None => Err(NaoError::NotFound { kind: E::KIND, id }),
        }
    }

    /// Every record, in ascending identifier order.
    pub fn get_all(&self) -> Result<Vec<E>, NaoError> {
        self.get_filter(|_| true)
    }

    /// Every record for which `keep` returns true, in ascending identifier
    /// order.
    ///
    /// Scans the whole bucket; any corrupt record fails the scan.
    pub fn get_filter(&self, keep: impl Fn(&E) -> bool) -> Result<Vec<E>, NaoError> {
        let txn = self.store.begin_read()?;
        let bucket = txn
            .open_table(table(E::KIND))
            .map_err(|e| missing_bucket(E::KIND, e))?;

        let mut list = Vec::new();
        for entry in bucket.iter().map_err(NaoError::store)? {
            let (key, value) = entry.map_err(NaoError::store)?;
            let id = id_of(key.value()).unwrap_or_default();
            let entity = E::decode(id, value.value())?;
            if keep(&entity) {
                list.push(entity);
            }
        }
        Ok(list)
    }

    /// Number of stored records.
    pub fn count(&self) -> Result<u64, NaoError> {
        let txn = self.store.begin_read()?;
        let bucket = txn
            .open_table(table(E::KIND))
            .map_err(|e| missing_bucket(E::KIND, e))?;
        bucket.len().map_err(NaoError::store)
    }
}
