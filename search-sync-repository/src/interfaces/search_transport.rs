//! Search transport trait definition.
//!
//! This module defines the typed interface to the remote search engine. Only
//! the operations the sync layer needs are exposed; there is no open-ended
//! forwarding to the underlying client.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::errors::SearchError;
use search_sync_shared::{Document, EntityKey, SearchParams};

/// Abstract interface for the remote search engine.
///
/// Implementations can be swapped for different backends (Meilisearch, mock,
/// etc.) enabling easy testing.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` so one transport can be shared by
/// concurrent callers.
///
/// # Error Handling
///
/// Every method issues at most one request and returns its failure unchanged.
/// Implementations must not retry.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// Insert or replace documents in an index.
    ///
    /// # Arguments
    ///
    /// * `index` - Name of the destination index
    /// * `documents` - The documents to upsert, in order
    /// * `primary_key` - Field name identifying each document
    async fn upsert_documents(
        &self,
        index: &str,
        documents: &[Document],
        primary_key: &str,
    ) -> Result<(), SearchError>;

    /// Delete the documents with the given ids from an index.
    async fn delete_documents(&self, index: &str, ids: &[EntityKey]) -> Result<(), SearchError>;

    /// Delete every document in an index, keeping the index itself.
    async fn delete_all_documents(&self, index: &str) -> Result<(), SearchError>;

    /// Run a query against an index and return the engine's raw response.
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - The response body, unmodified
    /// * `Err(SearchError)` - If the request fails or is rejected
    async fn search(
        &self,
        index: &str,
        query: &str,
        params: &SearchParams,
    ) -> Result<Value, SearchError>;

    /// Create an index. `options` is passed to the engine as-is.
    async fn create_index(&self, name: &str, options: &Map<String, Value>)
        -> Result<(), SearchError>;

    /// Delete an index and all of its documents.
    async fn delete_index(&self, name: &str) -> Result<(), SearchError>;

    /// List the names of all indexes.
    async fn list_indexes(&self) -> Result<Vec<String>, SearchError>;

    /// Replace (merge) the settings of an index.
    async fn update_index_settings(&self, index: &str, settings: &Value)
        -> Result<(), SearchError>;

    /// Check if the search engine is healthy and reachable.
    ///
    /// * `Ok(true)` - If the search engine is healthy
    /// * `Ok(false)` - If the search engine answered but is unhealthy
    /// * `Err(SearchError)` - If the health check fails to execute
    async fn health_check(&self) -> Result<bool, SearchError>;
}

/// A transport bound to one index.
///
/// Cheap to clone; this is the value handed to raw query callbacks.
#[derive(Clone)]
pub struct IndexHandle {
    transport: Arc<dyn SearchTransport>,
    name: String,
}

impl IndexHandle {
    /// Bind `transport` to the index called `name`.
    pub fn new(transport: Arc<dyn SearchTransport>, name: impl Into<String>) -> Self {
        Self {
            transport,
            name: name.into(),
        }
    }

    /// Name of the bound index.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn upsert(&self, documents: &[Document], primary_key: &str) -> Result<(), SearchError> {
        self.transport
            .upsert_documents(&self.name, documents, primary_key)
            .await
    }

    pub async fn delete_by_ids(&self, ids: &[EntityKey]) -> Result<(), SearchError> {
        self.transport.delete_documents(&self.name, ids).await
    }

    pub async fn delete_all(&self) -> Result<(), SearchError> {
        self.transport.delete_all_documents(&self.name).await
    }

    pub async fn query(&self, query: &str, params: &SearchParams) -> Result<Value, SearchError> {
        self.transport.search(&self.name, query, params).await
    }
}

impl std::fmt::Debug for IndexHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexHandle").field("name", &self.name).finish()
    }
}
