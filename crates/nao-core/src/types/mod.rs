//! # Core Type Definitions
//!
//! Types shared by every entity and by the engine:
//! - Record identity (`Id`, `Version`)
//! - Language-tagged text (`Info`)
//! - Error types (`NaoError`)

use crate::entities::EntityKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// IDENTITY
// =============================================================================

/// Identifier of a record inside its bucket.
///
/// Assigned by the engine from the bucket sequence; the first record of a
/// bucket gets `Id(1)`. Serialized as a bare number.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Id(pub u64);

impl Id {
    /// Get the raw identifier value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-record update counter.
///
/// Starts at 0 on create and moves forward by exactly one per update.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Version(pub u64);

impl Version {
    /// Version of a freshly created record.
    pub const INITIAL: Self = Self(0);

    /// The version following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Get the raw version value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// LANGUAGE-TAGGED TEXT
// =============================================================================

/// A piece of text with the language it is written in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Info {
    /// The text itself.
    pub data: String,
    /// Language tag, e.g. `en` or `ja`.
    pub language: String,
}

impl Info {
    /// Create a new piece of text.
    #[must_use]
    pub fn new(data: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            language: language.into(),
        }
    }
}

/// Trim every entry and drop the ones left without text.
pub fn clean_infos(list: &mut Vec<Info>) {
    for info in list.iter_mut() {
        trim_in_place(&mut info.data);
        trim_in_place(&mut info.language);
    }
    list.retain(|info| !info.data.is_empty());
}

/// Trim optional text, dropping it entirely when nothing is left.
pub fn clean_optional(value: &mut Option<String>) {
    if let Some(s) = value.as_mut() {
        trim_in_place(s);
    }
    if value.as_deref().is_some_and(str::is_empty) {
        *value = None;
    }
}

/// Trim surrounding whitespace without reallocating when nothing changes.
pub fn trim_in_place(s: &mut String) {
    let trimmed = s.trim();
    if trimmed.len() != s.len() {
        *s = trimmed.to_string();
    }
}

/// Whether `s` is a calendar date written `YYYY-MM-DD`.
///
/// Checks shape and month/day ranges; does not know month lengths.
pub fn is_date(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }
    let digits = |range: std::ops::Range<usize>| -> Option<u32> {
        s.get(range)?
            .chars()
            .try_fold(0u32, |acc, c| Some(acc * 10 + c.to_digit(10)?))
    };
    matches!(
        (digits(0..4), digits(5..7), digits(8..10)),
        (Some(_), Some(1..=12), Some(1..=31))
    )
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Nao engine.
///
/// - Validation failures (`Invalid`, `MissingReference`) are caller-correctable
/// - `NotFound` is reported distinctly so callers can map it separately
/// - `Encode`/`Decode` point at corrupt records or programmer error
/// - `Store` carries the redb failure unchanged; nothing here retries
#[derive(Debug, Error)]
pub enum NaoError {
    /// The entity failed one of its own constraints.
    #[error("invalid {kind}: {reason}")]
    Invalid {
        /// Bucket of the rejected entity.
        kind: EntityKind,
        /// What was wrong.
        reason: String,
    },

    /// A foreign identifier points at a record that does not exist.
    #[error("invalid {kind}: {field} references {target} {id}, which was not found")]
    MissingReference {
        /// Bucket of the rejected entity.
        kind: EntityKind,
        /// Name of the offending field.
        field: &'static str,
        /// Bucket the field points into.
        target: EntityKind,
        /// The identifier that was looked up.
        id: Id,
    },

    /// The operation addressed an identifier that is not stored.
    #[error("{kind} with id {id} not found")]
    NotFound {
        /// Bucket that was searched.
        kind: EntityKind,
        /// Identifier that was searched for.
        id: Id,
    },

    /// A checked update carried a stale version.
    #[error("{kind} {id} is at version {found}, update was based on version {expected}")]
    VersionConflict {
        /// Bucket of the record.
        kind: EntityKind,
        /// Identifier of the record.
        id: Id,
        /// Version the caller based its update on.
        expected: Version,
        /// Version currently stored.
        found: Version,
    },

    /// An entity could not be encoded as JSON.
    #[error("failed to encode {kind} {id}: {source}")]
    Encode {
        /// Bucket of the entity.
        kind: EntityKind,
        /// Identifier of the entity.
        id: Id,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// A stored record could not be decoded.
    #[error("corrupt {kind} record {id}: {source}")]
    Decode {
        /// Bucket of the record.
        kind: EntityKind,
        /// Key of the record.
        id: Id,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// The bucket was never created in this database.
    #[error("bucket {0} does not exist")]
    MissingBucket(EntityKind),

    /// The underlying store failed.
    #[error("store error: {0}")]
    Store(#[from] redb::Error),
}

impl NaoError {
    /// Wrap any redb failure.
    pub(crate) fn store(e: impl Into<redb::Error>) -> Self {
        Self::Store(e.into())
    }

    /// True for failures the caller can fix by changing the entity.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Invalid { .. } | Self::MissingReference { .. })
    }

    /// True when the addressed record does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_advances_by_one() {
        assert_eq!(Version::INITIAL.next(), Version(1));
        assert_eq!(Version(41).next().value(), 42);
    }

    #[test]
    fn version_saturates() {
        assert_eq!(Version(u64::MAX).next(), Version(u64::MAX));
    }

    #[test]
    fn id_serializes_as_bare_number() {
        let json = serde_json::to_string(&Id(7)).expect("encode");
        assert_eq!(json, "7");
    }

    #[test]
    fn clean_infos_trims_and_drops_blank() {
        let mut list = vec![
            Info::new("  Cowboy Bebop ", " en"),
            Info::new("   ", "ja"),
            Info::new("カウボーイビバップ", "ja"),
        ];
        clean_infos(&mut list);

        assert_eq!(
            list,
            vec![
                Info::new("Cowboy Bebop", "en"),
                Info::new("カウボーイビバップ", "ja"),
            ]
        );
    }

    #[test]
    fn clean_infos_is_idempotent() {
        let mut once = vec![Info::new(" a ", "en"), Info::new("", "en")];
        clean_infos(&mut once);
        let mut twice = once.clone();
        clean_infos(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn clean_optional_drops_blank() {
        let mut blank = Some("  ".to_string());
        clean_optional(&mut blank);
        assert_eq!(blank, None);

        let mut padded = Some(" TV ".to_string());
        clean_optional(&mut padded);
        assert_eq!(padded.as_deref(), Some("TV"));
    }

    #[test]
    fn date_shape() {
        assert!(is_date("1998-04-03"));
        assert!(!is_date("1998-4-3"));
        assert!(!is_date("1998-13-01"));
        assert!(!is_date("1998-00-10"));
        assert!(!is_date("1998-01-32"));
        assert!(!is_date("19x8-01-01"));
        assert!(!is_date(""));
    }

    #[test]
    fn error_classification() {
        let missing = NaoError::MissingReference {
            kind: EntityKind::MediaProducer,
            field: "ProducerID",
            target: EntityKind::Producer,
            id: Id(99),
        };
        assert!(missing.is_validation());
        assert!(!missing.is_not_found());

        let not_found = NaoError::NotFound {
            kind: EntityKind::Media,
            id: Id(3),
        };
        assert!(not_found.is_not_found());
        assert!(!not_found.is_validation());
    }

    #[test]
    fn missing_reference_names_field_and_bucket() {
        let err = NaoError::MissingReference {
            kind: EntityKind::MediaProducer,
            field: "ProducerID",
            target: EntityKind::Producer,
            id: Id(99),
        };
        let msg = err.to_string();
        assert!(msg.contains("ProducerID"));
        assert!(msg.contains("Producer 99"));
    }
}
