//! # Search Sync
//!
//! Keeps an application's records and a hosted full-text search index in
//! sync, and translates search results back into records.
//!
//! ## Architecture
//!
//! The engine has three entry points, all on [`SearchSyncEngine`]:
//!
//! 1. **Sync**: pushes entity documents to their indexes and deletes them
//! 2. **Query**: translates predicates and ordering into a search call
//! 3. **Mapper**: turns ranked hits back into keys and entities
//!
//! Entities implement [`Searchable`]; records are loaded back through an
//! [`EntitySource`]. The remote engine sits behind
//! [`SearchTransport`](search_sync_repository::SearchTransport).

pub mod config;
pub mod engine;
pub mod interfaces;

pub use config::{Dependencies, EngineConfig};
pub use engine::query::{RawQueryCallback, RawQueryFuture, SearchQuery};
pub use engine::response::{RawQueryOutput, SearchResponse};
pub use engine::SearchSyncEngine;
pub use interfaces::{EntitySource, Searchable};
pub use search_sync_repository::{IndexHandle, SearchError};
pub use search_sync_shared::{EntityKey, OrderClause, Predicates, SearchParams, SortDirection};

use thiserror::Error;

/// Errors that can occur while setting up the engine.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Search error.
    #[error("Search error: {0}")]
    SearchError(#[from] search_sync_repository::SearchError),
}

impl SyncError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
