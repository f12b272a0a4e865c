//! The search sync engine.
//!
//! `SearchSyncEngine` is the single entry point used by higher-level search
//! builders. Its operations are split by concern:
//!
//! - [`sync`]: pushing and deleting entity documents
//! - [`query`]: building and dispatching search calls
//! - [`mapper`]: turning raw search responses back into keys and entities
//!
//! Index lifecycle operations live here.

pub mod mapper;
pub mod query;
pub mod response;
pub mod sync;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::config::{Dependencies, EngineConfig};
use crate::interfaces::Searchable;
use crate::SyncError;
use search_sync_repository::meilisearch::configure_soft_delete_filter;
use search_sync_repository::{IndexHandle, SearchError, SearchTransport};

/// Driver between the application's records and the remote search index.
///
/// The engine holds no mutable state; every call is an independent exchange
/// with the transport, so one engine can be shared across tasks.
///
/// # Example
///
/// ```ignore
/// let transport = Arc::new(MeilisearchClient::new(&MeilisearchConfig::from_env())?);
/// let engine = SearchSyncEngine::with_config(transport, EngineConfig::from_env());
///
/// engine.push(&books).await?;
///
/// let raw = engine.search::<Book>(&SearchQuery::new("dune").take(20)).await?;
/// let books = engine.map(&raw, "id", &book_repository).await?;
/// ```
#[derive(Clone)]
pub struct SearchSyncEngine {
    transport: Arc<dyn SearchTransport>,
    config: EngineConfig,
}

impl SearchSyncEngine {
    /// Create a new engine with default configuration.
    pub fn new(transport: Arc<dyn SearchTransport>) -> Self {
        Self {
            transport,
            config: EngineConfig::default(),
        }
    }

    /// Create a new engine with custom configuration.
    pub fn with_config(transport: Arc<dyn SearchTransport>, config: EngineConfig) -> Self {
        Self { transport, config }
    }

    /// Connect to the engine configured in the environment.
    ///
    /// Reads `MEILISEARCH_HOST`, `MEILISEARCH_KEY`, `SCOUT_SOFT_DELETE` and
    /// `SCOUT_PREFIX`, then health-checks the engine before returning.
    ///
    /// # Returns
    ///
    /// * `Ok(SearchSyncEngine)` - Engine connected to a healthy search engine
    /// * `Err(SyncError::ConfigError)` - If the host is invalid, unreachable
    ///   or unhealthy
    pub async fn from_env() -> Result<Self, SyncError> {
        Ok(Dependencies::new().await?.engine)
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Handle on the index called `name`. The name is used verbatim.
    pub fn index(&self, name: &str) -> IndexHandle {
        IndexHandle::new(Arc::clone(&self.transport), name)
    }

    /// Index name of an entity type, prefix applied.
    pub fn index_name_for<E: Searchable>(&self) -> String {
        self.config.prefixed(&E::index_name())
    }

    /// Destination index of one entity, prefix applied.
    pub(crate) fn destination_of<E: Searchable>(&self, entity: &E) -> String {
        self.config.prefixed(&entity.searchable_as())
    }

    /// Create an index.
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the index
    /// * `options` - Engine-defined creation options (e.g. `primaryKey`)
    pub async fn create_index(
        &self,
        name: &str,
        options: &Map<String, Value>,
    ) -> Result<(), SearchError> {
        self.transport.create_index(name, options).await
    }

    /// Delete an index and its documents.
    pub async fn delete_index(&self, name: &str) -> Result<(), SearchError> {
        self.transport.delete_index(name).await
    }

    /// Delete every index on the engine.
    ///
    /// Indexes are deleted one round-trip at a time; a failure stops the loop
    /// and leaves the remaining indexes in place.
    #[instrument(skip(self))]
    pub async fn delete_all_indexes(&self) -> Result<(), SearchError> {
        let indexes = self.transport.list_indexes().await?;
        info!(count = indexes.len(), "Deleting all indexes");

        for index in &indexes {
            self.transport.delete_index(index).await?;
        }

        Ok(())
    }

    /// Push index settings to the engine.
    ///
    /// With soft deletes enabled the soft-delete field is added to the
    /// filterable attributes first.
    #[instrument(skip(self, settings))]
    pub async fn update_index_settings(
        &self,
        name: &str,
        settings: Value,
    ) -> Result<(), SearchError> {
        let settings = if self.config.soft_delete {
            configure_soft_delete_filter(settings)
        } else {
            settings
        };

        self.transport.update_index_settings(name, &settings).await
    }
}
