//! SQLite-backed versioned cache store.
//!
//! One named store per cache version; each store maps a request identity to
//! an immutable response snapshot. It supports:
//!
//! - Whole-store creation and deletion (one generation at a time)
//! - Last-write-wins upsert per request identity
//! - Exact-identity lookups, no partial matching
//! - Automatic schema migrations and WAL mode

pub mod connection;
pub mod identity;
pub mod migrations;
pub mod snapshot;
pub mod store;

pub use crate::Error;

pub use connection::CacheDb;
pub use snapshot::Snapshot;
pub use store::CacheStorage;
