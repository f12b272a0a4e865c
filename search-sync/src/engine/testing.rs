//! Mock collaborators shared by the engine tests.

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use serde_json::{json, Map, Value};
use tokio::sync::Mutex;

use crate::interfaces::{EntitySource, Searchable};
use search_sync_repository::{SearchError, SearchTransport};
use search_sync_shared::{Document, EntityKey, SearchParams};

/// A transport call as seen by the mock.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Upsert {
        index: String,
        documents: Vec<Document>,
        primary_key: String,
    },
    Delete {
        index: String,
        ids: Vec<EntityKey>,
    },
    DeleteAll {
        index: String,
    },
    Search {
        index: String,
        query: String,
        params: SearchParams,
    },
    CreateIndex {
        name: String,
        options: Map<String, Value>,
    },
    DeleteIndex {
        name: String,
    },
    ListIndexes,
    UpdateSettings {
        index: String,
        settings: Value,
    },
}

/// Mock transport recording every call.
pub struct MockTransport {
    calls: Arc<Mutex<Vec<Call>>>,
    search_response: Value,
    indexes: Vec<String>,
    failing_index: Option<String>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            search_response: json!({ "hits": [], "nbHits": 0 }),
            indexes: Vec::new(),
            failing_index: None,
        }
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_response(mut self, response: Value) -> Self {
        self.search_response = response;
        self
    }

    pub fn with_indexes(mut self, indexes: &[&str]) -> Self {
        self.indexes = indexes.iter().map(|i| i.to_string()).collect();
        self
    }

    /// Make every write against `index` fail.
    pub fn failing_on(mut self, index: &str) -> Self {
        self.failing_index = Some(index.to_string());
        self
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, call: Call) {
        self.calls.lock().await.push(call);
    }

    fn check(&self, index: &str) -> Result<(), SearchError> {
        if self.failing_index.as_deref() == Some(index) {
            return Err(SearchError::index("Mock failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl SearchTransport for MockTransport {
    async fn upsert_documents(
        &self,
        index: &str,
        documents: &[Document],
        primary_key: &str,
    ) -> Result<(), SearchError> {
        self.check(index)?;
        self.record(Call::Upsert {
            index: index.to_string(),
            documents: documents.to_vec(),
            primary_key: primary_key.to_string(),
        })
        .await;
        Ok(())
    }

    async fn delete_documents(&self, index: &str, ids: &[EntityKey]) -> Result<(), SearchError> {
        self.check(index)?;
        self.record(Call::Delete {
            index: index.to_string(),
            ids: ids.to_vec(),
        })
        .await;
        Ok(())
    }

    async fn delete_all_documents(&self, index: &str) -> Result<(), SearchError> {
        self.check(index)?;
        self.record(Call::DeleteAll {
            index: index.to_string(),
        })
        .await;
        Ok(())
    }

    async fn search(
        &self,
        index: &str,
        query: &str,
        params: &SearchParams,
    ) -> Result<Value, SearchError> {
        self.record(Call::Search {
            index: index.to_string(),
            query: query.to_string(),
            params: params.clone(),
        })
        .await;
        Ok(self.search_response.clone())
    }

    async fn create_index(
        &self,
        name: &str,
        options: &Map<String, Value>,
    ) -> Result<(), SearchError> {
        self.record(Call::CreateIndex {
            name: name.to_string(),
            options: options.clone(),
        })
        .await;
        Ok(())
    }

    async fn delete_index(&self, name: &str) -> Result<(), SearchError> {
        self.record(Call::DeleteIndex {
            name: name.to_string(),
        })
        .await;
        Ok(())
    }

    async fn list_indexes(&self) -> Result<Vec<String>, SearchError> {
        self.record(Call::ListIndexes).await;
        Ok(self.indexes.clone())
    }

    async fn update_index_settings(
        &self,
        index: &str,
        settings: &Value,
    ) -> Result<(), SearchError> {
        self.record(Call::UpdateSettings {
            index: index.to_string(),
            settings: settings.clone(),
        })
        .await;
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, SearchError> {
        Ok(true)
    }
}

/// Soft-deleting entity, optionally routed to a custom index.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub trashed: bool,
    pub index: Option<&'static str>,
}

impl Book {
    pub fn new(id: i64, title: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            trashed: false,
            index: None,
        }
    }

    pub fn in_index(mut self, index: &'static str) -> Self {
        self.index = Some(index);
        self
    }

    pub fn trashed(mut self) -> Self {
        self.trashed = true;
        self
    }
}

impl Searchable for Book {
    const SOFT_DELETES: bool = true;

    fn index_name() -> String {
        "books".to_string()
    }

    fn searchable_as(&self) -> String {
        self.index.map(str::to_string).unwrap_or_else(Self::index_name)
    }

    fn key(&self) -> EntityKey {
        self.id.into()
    }

    fn to_searchable_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        if !self.title.is_empty() {
            fields.insert("title".to_string(), json!(self.title));
        }
        fields
    }

    fn is_trashed(&self) -> bool {
        self.trashed
    }
}

/// Plain entity with a string key and metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    pub slug: String,
    pub name: String,
}

impl Author {
    pub fn new(slug: &str, name: &str) -> Self {
        Self {
            slug: slug.to_string(),
            name: name.to_string(),
        }
    }
}

impl Searchable for Author {
    fn index_name() -> String {
        "authors".to_string()
    }

    fn key_name(&self) -> &str {
        "slug"
    }

    fn key(&self) -> EntityKey {
        self.slug.clone().into()
    }

    fn to_searchable_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("name".to_string(), json!(self.name));
        fields
    }

    fn metadata(&self) -> Map<String, Value> {
        let mut metadata = Map::new();
        metadata.insert("kind".to_string(), json!("author"));
        metadata
    }
}

/// Mock data source returning stored entities in reverse storage order.
pub struct MockSource<E> {
    entities: Vec<E>,
    requested: Arc<Mutex<Vec<Vec<EntityKey>>>>,
}

impl<E: Searchable + Clone> MockSource<E> {
    pub fn new(entities: Vec<E>) -> Self {
        Self {
            entities,
            requested: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn requested(&self) -> Vec<Vec<EntityKey>> {
        self.requested.lock().await.clone()
    }

    fn matching(&self, keys: &[EntityKey]) -> Vec<E> {
        self.entities
            .iter()
            .rev()
            .filter(|entity| keys.contains(&entity.key()))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl<E: Searchable + Clone + 'static> EntitySource<E> for MockSource<E> {
    async fn get_by_keys(&self, keys: &[EntityKey]) -> Result<Vec<E>, SearchError> {
        self.requested.lock().await.push(keys.to_vec());
        Ok(self.matching(keys))
    }

    fn stream_by_keys(&self, keys: Vec<EntityKey>) -> BoxStream<'_, Result<E, SearchError>> {
        if let Ok(mut requested) = self.requested.try_lock() {
            requested.push(keys.clone());
        }
        stream::iter(self.matching(&keys).into_iter().map(Ok)).boxed()
    }
}

/// Data source returning whatever it holds, regardless of the keys asked for.
pub struct StaleSource<E> {
    pub entities: Vec<E>,
}

#[async_trait]
impl<E: Searchable + Clone + 'static> EntitySource<E> for StaleSource<E> {
    async fn get_by_keys(&self, _keys: &[EntityKey]) -> Result<Vec<E>, SearchError> {
        Ok(self.entities.clone())
    }

    fn stream_by_keys(&self, _keys: Vec<EntityKey>) -> BoxStream<'_, Result<E, SearchError>> {
        stream::iter(self.entities.clone().into_iter().map(Ok)).boxed()
    }
}
