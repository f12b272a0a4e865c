//! Meilisearch client implementation.
//!
//! This module provides the concrete implementation of `SearchTransport`
//! speaking the Meilisearch HTTP protocol.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde_json::{json, Map, Value};
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::config::MeilisearchConfig;
use crate::errors::SearchError;
use crate::interfaces::SearchTransport;
use search_sync_shared::{Document, EntityKey, SearchParams};

/// Page size used when listing indexes.
const LIST_INDEXES_LIMIT: usize = 1000;

/// Meilisearch client implementation.
///
/// Every method issues exactly one HTTP request. Write operations return as
/// soon as the engine has enqueued them; the resulting engine tasks are not
/// awaited.
///
/// # Example
///
/// ```ignore
/// let config = MeilisearchConfig::new("http://localhost:7700").with_api_key("masterKey");
/// let client = MeilisearchClient::new(&config)?;
///
/// let raw = client.search("books", "dune", &SearchParams::default()).await?;
/// println!("{}", raw["nbHits"]);
/// ```
pub struct MeilisearchClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
}

impl MeilisearchClient {
    /// Create a new client for the configured host.
    ///
    /// # Returns
    ///
    /// * `Ok(MeilisearchClient)` - A new client instance
    /// * `Err(SearchError)` - If the host is not a valid base URL
    pub fn new(config: &MeilisearchConfig) -> Result<Self, SearchError> {
        let base_url =
            Url::parse(&config.host).map_err(|e| SearchError::connection(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(SearchError::connection(format!(
                "Invalid Meilisearch host: {}",
                config.host
            )));
        }

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| SearchError::connection(e.to_string()))?;

        info!(host = %config.host, authenticated = config.api_key.is_some(), "Created Meilisearch client");

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    /// Build the URL of an API endpoint. Segments are percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, SearchError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| SearchError::connection("Meilisearch host cannot be a base URL"))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    /// Send a request, turning non-success statuses into `on_error`.
    async fn send(
        &self,
        builder: RequestBuilder,
        on_error: fn(String) -> SearchError,
    ) -> Result<Response, SearchError> {
        let response = builder
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Meilisearch request failed");
            return Err(on_error(format!(
                "Request failed with status {}: {}",
                status, error_body
            )));
        }

        Ok(response)
    }

    /// Body of a search request: the query string followed by the parameters.
    fn search_body(query: &str, params: &SearchParams) -> Result<Value, SearchError> {
        let mut body = Map::new();
        body.insert("q".to_string(), json!(query));
        if let Value::Object(params) = serde_json::to_value(params)? {
            body.extend(params);
        }
        Ok(Value::Object(body))
    }

    /// Extract index names from a `GET /indexes` response.
    fn parse_index_list(body: &Value) -> Result<Vec<String>, SearchError> {
        let results = body
            .get("results")
            .and_then(Value::as_array)
            .ok_or_else(|| SearchError::parse("Index list response has no results array"))?;

        results
            .iter()
            .map(|index| {
                index
                    .get("uid")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| SearchError::parse("Index entry has no uid"))
            })
            .collect()
    }
}

#[async_trait]
impl SearchTransport for MeilisearchClient {
    #[instrument(skip(self, documents), fields(count = documents.len()))]
    async fn upsert_documents(
        &self,
        index: &str,
        documents: &[Document],
        primary_key: &str,
    ) -> Result<(), SearchError> {
        let mut url = self.endpoint(&["indexes", index, "documents"])?;
        url.query_pairs_mut().append_pair("primaryKey", primary_key);

        self.send(
            self.request(Method::POST, url).json(documents),
            SearchError::IndexError,
        )
        .await?;

        debug!(index = %index, count = documents.len(), "Documents upserted");
        Ok(())
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn delete_documents(&self, index: &str, ids: &[EntityKey]) -> Result<(), SearchError> {
        let url = self.endpoint(&["indexes", index, "documents", "delete-batch"])?;

        self.send(
            self.request(Method::POST, url).json(ids),
            SearchError::DeleteError,
        )
        .await?;

        debug!(index = %index, count = ids.len(), "Documents deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_all_documents(&self, index: &str) -> Result<(), SearchError> {
        let url = self.endpoint(&["indexes", index, "documents"])?;

        self.send(self.request(Method::DELETE, url), SearchError::DeleteError)
            .await?;

        info!(index = %index, "All documents deleted");
        Ok(())
    }

    #[instrument(skip(self, params))]
    async fn search(
        &self,
        index: &str,
        query: &str,
        params: &SearchParams,
    ) -> Result<Value, SearchError> {
        let url = self.endpoint(&["indexes", index, "search"])?;
        let body = Self::search_body(query, params)?;

        let response = self
            .send(
                self.request(Method::POST, url).json(&body),
                SearchError::QueryError,
            )
            .await?;

        response
            .json::<Value>()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))
    }

    #[instrument(skip(self, options))]
    async fn create_index(
        &self,
        name: &str,
        options: &Map<String, Value>,
    ) -> Result<(), SearchError> {
        let url = self.endpoint(&["indexes"])?;

        let mut body = Map::new();
        body.insert("uid".to_string(), json!(name));
        body.extend(options.clone());

        self.send(
            self.request(Method::POST, url).json(&body),
            SearchError::IndexCreationError,
        )
        .await?;

        info!(index = %name, "Index created");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_index(&self, name: &str) -> Result<(), SearchError> {
        let url = self.endpoint(&["indexes", name])?;

        self.send(
            self.request(Method::DELETE, url),
            SearchError::IndexCreationError,
        )
        .await?;

        info!(index = %name, "Index deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_indexes(&self) -> Result<Vec<String>, SearchError> {
        let mut url = self.endpoint(&["indexes"])?;
        url.query_pairs_mut()
            .append_pair("limit", &LIST_INDEXES_LIMIT.to_string());

        let response = self
            .send(self.request(Method::GET, url), SearchError::QueryError)
            .await?;
        let body = response
            .json::<Value>()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        Self::parse_index_list(&body)
    }

    #[instrument(skip(self, settings))]
    async fn update_index_settings(
        &self,
        index: &str,
        settings: &Value,
    ) -> Result<(), SearchError> {
        let url = self.endpoint(&["indexes", index, "settings"])?;

        self.send(
            self.request(Method::PATCH, url).json(settings),
            SearchError::IndexCreationError,
        )
        .await?;

        info!(index = %index, "Index settings updated");
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, SearchError> {
        let url = self.endpoint(&["health"])?;

        let response = self
            .request(Method::GET, url)
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        if !response.status().is_success() {
            return Ok(false);
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        Ok(body.get("status").and_then(Value::as_str) == Some("available"))
    }
}
