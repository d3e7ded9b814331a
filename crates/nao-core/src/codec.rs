//! # Record Codec
//!
//! Canonical byte forms for stored records.
//!
//! - Values are the entity's JSON object (`serde_json`)
//! - Keys are the identifier as 8 big-endian bytes, so byte order of keys
//!   equals numeric order of identifiers and a bucket scan yields ascending ids

use crate::entities::EntityKind;
use crate::{Id, NaoError};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Width of every record key.
pub const KEY_LEN: usize = 8;

/// Key under which the record with `id` is stored.
#[must_use]
pub const fn key_of(id: Id) -> [u8; KEY_LEN] {
    id.0.to_be_bytes()
}

/// Identifier stored under `key`, if the key has the record key width.
#[must_use]
pub fn id_of(key: &[u8]) -> Option<Id> {
    let bytes: [u8; KEY_LEN] = key.try_into().ok()?;
    Some(Id(u64::from_be_bytes(bytes)))
}

/// Encode a record as JSON.
pub fn encode<T: Serialize>(kind: EntityKind, id: Id, value: &T) -> Result<Vec<u8>, NaoError> {
    serde_json::to_vec(value).map_err(|source| NaoError::Encode { kind, id, source })
}

/// Decode a stored JSON record.
///
/// Failure here means the bytes under `id` are not a valid `kind` record.
pub fn decode<T: DeserializeOwned>(kind: EntityKind, id: Id, bytes: &[u8]) -> Result<T, NaoError> {
    serde_json::from_slice(bytes).map_err(|source| {
        tracing::warn!(bucket = %kind, %id, error = %source, "corrupt record");
        NaoError::Decode { kind, id, source }
    })
}
