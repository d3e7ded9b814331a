//! # Storage
//!
//! The redb adapter: one shared [`Store`] handle, one table per entity
//! bucket, and per-bucket sequence counters.

mod redb_store;

pub use redb_store::{Snapshot, Store};

pub(crate) use redb_store::{missing_bucket, next_sequence, table};
