//! # nao-core
//!
//! The persistence engine for Nao - THE ENGINE.
//!
//! Entities of many shapes (media titles, episodes, people, characters,
//! producers, the junctions between them, per-user annotations) live in a
//! single embedded redb file. Each entity type implements the [`Entity`]
//! contract once; the generic [`Service`] turns that contract into
//! create, update, delete and scan operations.
//!
//! ## Layout
//!
//! - `types`    → identifiers, versions, shared value types, `NaoError`
//! - `codec`    → JSON records and big-endian keys
//! - `storage`  → the shared `Store` handle, buckets and sequences
//! - `entity`   → the `Entity` contract and referential helpers
//! - `service`  → the generic engine
//! - `entities` → the concrete entity types
//!
//! ## Architectural Constraints
//!
//! - Every operation runs inside exactly one store transaction
//! - Referential checks read through the same transaction that writes
//! - No async, no network dependencies (pure Rust)

// =============================================================================
// MODULES
// =============================================================================

pub mod codec;
pub mod entities;
pub mod entity;
pub mod service;
pub mod storage;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{Id, Info, NaoError, Version};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use entity::{Entity, ensure_exists};
pub use service::Service;
pub use storage::{Snapshot, Store};

// =============================================================================
// RE-EXPORTS: Entities
// =============================================================================

pub use entities::{
    Character, EntityKind, Episode, Genre, KindVisitor, Media, MediaCharacter, MediaGenre,
    MediaProducer, MediaRelation, Person, Producer, Quarter, Season, User, UserMedia,
    UserMediaList, WatchStatus, WatchedInstance,
};
