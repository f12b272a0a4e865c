//! Building and dispatching search calls.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;
use tracing::{debug, instrument};

use super::response::RawQueryOutput;
use super::{mapper, SearchSyncEngine};
use crate::interfaces::Searchable;
use search_sync_repository::meilisearch::queries::build_search_params;
use search_sync_repository::{IndexHandle, SearchError};
use search_sync_shared::{EntityKey, OrderClause, Predicates, SearchParams, SortDirection};

/// Future returned by a raw query callback.
pub type RawQueryFuture = BoxFuture<'static, Result<RawQueryOutput, SearchError>>;

/// Caller-supplied replacement for the search call.
///
/// Receives the index handle, the query string and the prepared parameters,
/// and returns its own response.
pub type RawQueryCallback =
    Arc<dyn Fn(IndexHandle, String, SearchParams) -> RawQueryFuture + Send + Sync>;

/// A search request: query text, optional index override, predicates, limit
/// and ordering.
///
/// # Example
///
/// ```ignore
/// let query = SearchQuery::new("dune")
///     .where_eq("published", true)
///     .where_in("genre", ["sf", "fantasy"])
///     .order_by("rank", SortDirection::Desc)
///     .take(20);
/// ```
#[derive(Clone, Default)]
pub struct SearchQuery {
    /// Full-text query.
    pub query: String,
    /// Index to search instead of the entity type's own index, used verbatim.
    pub index: Option<String>,
    pub predicates: Predicates,
    pub limit: Option<usize>,
    pub orders: Vec<OrderClause>,
    callback: Option<RawQueryCallback>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Search `index` instead of the entity type's index.
    pub fn within(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.predicates = self.predicates.where_eq(field, value);
        self
    }

    pub fn where_in<I, V>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.predicates = self.predicates.where_in(field, values);
        self
    }

    pub fn take(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.orders.push(OrderClause::new(field, direction));
        self
    }

    /// Replace the search call with `callback`.
    ///
    /// Its result is returned as the raw response; a structured
    /// [`SearchResponse`](super::response::SearchResponse) is unwrapped to
    /// its raw body first.
    pub fn with_raw_callback<F, Fut>(mut self, callback: F) -> Self
    where
        F: Fn(IndexHandle, String, SearchParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<RawQueryOutput, SearchError>> + Send + 'static,
    {
        self.callback = Some(Arc::new(
            move |index: IndexHandle, query: String, params: SearchParams| -> RawQueryFuture {
                callback(index, query, params).boxed()
            },
        ));
        self
    }

    pub fn has_raw_callback(&self) -> bool {
        self.callback.is_some()
    }
}

impl fmt::Debug for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchQuery")
            .field("query", &self.query)
            .field("index", &self.index)
            .field("predicates", &self.predicates)
            .field("limit", &self.limit)
            .field("orders", &self.orders)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

impl SearchSyncEngine {
    /// Run a search and return the engine's raw response.
    ///
    /// The filter, limit and sort parameters are each omitted when unset.
    #[instrument(skip(self, query), fields(query = %query.query))]
    pub async fn search<E: Searchable>(&self, query: &SearchQuery) -> Result<Value, SearchError> {
        let params = build_search_params(&query.predicates, query.limit, None, &query.orders);
        self.perform_search::<E>(query, params).await
    }

    /// Run a search for one page of results.
    ///
    /// Pages are 1-based: page 1 starts at offset 0. `per_page` replaces the
    /// query's own limit. Page 0 is treated like page 1 and an offset past
    /// `usize::MAX` saturates.
    #[instrument(skip(self, query), fields(query = %query.query))]
    pub async fn paginate<E: Searchable>(
        &self,
        query: &SearchQuery,
        per_page: usize,
        page: usize,
    ) -> Result<Value, SearchError> {
        let offset = page.saturating_sub(1).saturating_mul(per_page);
        let params = build_search_params(
            &query.predicates,
            Some(per_page),
            Some(offset),
            &query.orders,
        );
        self.perform_search::<E>(query, params).await
    }

    /// Run a search and return the keys of its hits.
    pub async fn keys<E: Searchable>(&self, query: &SearchQuery) -> Result<Vec<EntityKey>, SearchError> {
        let raw = self.search::<E>(query).await?;
        mapper::map_ids(&raw)
    }

    async fn perform_search<E: Searchable>(
        &self,
        query: &SearchQuery,
        params: SearchParams,
    ) -> Result<Value, SearchError> {
        let index = match &query.index {
            Some(index) => index.clone(),
            None => self.index_name_for::<E>(),
        };
        let handle = self.index(&index);

        debug!(index = %index, params = ?params, "Dispatching search");

        match &query.callback {
            Some(callback) => {
                let output = callback(handle, query.query.clone(), params).await?;
                Ok(output.into_raw())
            }
            None => handle.query(&query.query, &params).await,
        }
    }
}
