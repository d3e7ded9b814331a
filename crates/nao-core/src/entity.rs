//! # Entity Contract
//!
//! The capability set every stored type provides so that one generic
//! [`Service`](crate::Service) can persist all of them.
//!
//! - `normalize`: idempotent cleanup before anything else runs
//! - `validate`: own constraints plus referential lookups via a [`Snapshot`]
//! - `assign_identity`: identifier and initial version on create
//! - `carry_forward`: version bump and immutable fields on update
//! - `encode` / `decode`: the JSON record form

use crate::codec;
use crate::entities::EntityKind;
use crate::storage::Snapshot;
use crate::{Id, NaoError, Version};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// A record type persisted in its own bucket.
pub trait Entity: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    /// The bucket this type lives in.
    const KIND: EntityKind;

    /// Identifier of this record.
    fn id(&self) -> Id;

    /// Current version of this record.
    fn version(&self) -> Version;

    /// Overwrite identifier and version. Only the engine's hooks call this.
    fn set_identity(&mut self, id: Id, version: Version);

    /// Clean the record in place before validation.
    ///
    /// Must be idempotent: normalizing twice equals normalizing once.
    fn normalize(&mut self) -> Result<(), NaoError> {
        Ok(())
    }

    /// Check the record's own constraints and every foreign identifier.
    ///
    /// Foreign lookups must go through `snapshot`, which is bound to the
    /// transaction the write will commit in.
    fn validate(&self, _snapshot: &dyn Snapshot) -> Result<(), NaoError> {
        Ok(())
    }

    /// Give a new record its identifier; the version restarts at 0.
    fn assign_identity(&mut self, id: Id) {
        self.set_identity(id, Version::INITIAL);
    }

    /// Prepare `self` to replace the stored `old` record.
    ///
    /// The version becomes `old`'s plus one. Types with fields that are
    /// frozen after creation override this to copy them back from `old`.
    fn carry_forward(&mut self, old: &Self) -> Result<(), NaoError> {
        self.set_identity(old.id(), old.version().next());
        Ok(())
    }

    /// JSON record form.
    fn encode(&self) -> Result<Vec<u8>, NaoError> {
        codec::encode(Self::KIND, self.id(), self)
    }

    /// Parse the record stored under `id`.
    fn decode(id: Id, bytes: &[u8]) -> Result<Self, NaoError> {
        codec::decode(Self::KIND, id, bytes)
    }

    /// Shorthand for an intrinsic validation failure of this type.
    fn invalid(reason: impl Into<String>) -> NaoError {
        NaoError::Invalid {
            kind: Self::KIND,
            reason: reason.into(),
        }
    }
}

/// Fail unless `id` exists in `target`'s bucket.
///
/// `kind` and `field` name the referencing record and its field in the error.
pub fn ensure_exists(
    snapshot: &dyn Snapshot,
    kind: EntityKind,
    field: &'static str,
    target: EntityKind,
    id: Id,
) -> Result<(), NaoError> {
    if snapshot.contains(target, id)? {
        Ok(())
    } else {
        Err(NaoError::MissingReference {
            kind,
            field,
            target,
            id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    /// Snapshot over a fixed set of (bucket, id) pairs.
    struct Fixed(BTreeSet<(EntityKind, Id)>);

    impl Snapshot for Fixed {
        fn contains(&self, kind: EntityKind, id: Id) -> Result<bool, NaoError> {
            Ok(self.0.contains(&(kind, id)))
        }
    }

    #[test]
    fn ensure_exists_passes_for_present_record() {
        let snapshot = Fixed([(EntityKind::Media, Id(1))].into_iter().collect());
        ensure_exists(
            &snapshot,
            EntityKind::MediaGenre,
            "MediaID",
            EntityKind::Media,
            Id(1),
        )
        .expect("present");
    }

    #[test]
    fn ensure_exists_names_field_and_target() {
        let snapshot = Fixed(BTreeSet::new());
        let err = ensure_exists(
            &snapshot,
            EntityKind::MediaGenre,
            "GenreID",
            EntityKind::Genre,
            Id(8),
        )
        .expect_err("absent");

        assert!(matches!(
            err,
            NaoError::MissingReference {
                kind: EntityKind::MediaGenre,
                field: "GenreID",
                target: EntityKind::Genre,
                id: Id(8),
            }
        ));
    }

    #[test]
    fn ensure_exists_checks_the_right_bucket() {
        let snapshot = Fixed([(EntityKind::Person, Id(2))].into_iter().collect());
        let result = ensure_exists(
            &snapshot,
            EntityKind::MediaCharacter,
            "CharacterID",
            EntityKind::Character,
            Id(2),
        );
        assert!(result.is_err());
    }
}
