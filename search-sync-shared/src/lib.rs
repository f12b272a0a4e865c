//! # Search Sync Shared
//!
//! Plain data types shared by the search sync crates: entity keys, documents,
//! filter predicates, ordering clauses and the search parameter object sent to
//! the engine.

mod key;
mod ordering;
mod params;
mod predicates;

pub use key::EntityKey;
pub use ordering::{OrderClause, SortDirection};
pub use params::SearchParams;
pub use predicates::Predicates;

/// A flattened record pushed to an index.
///
/// Field order is preserved so that documents and hits round-trip in the
/// order the engine returns them.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Metadata field carrying the soft-delete state of a pushed document.
pub const SOFT_DELETE_FIELD: &str = "__soft_deleted";
