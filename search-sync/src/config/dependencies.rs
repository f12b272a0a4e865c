//! Dependency initialization and wiring for the search sync engine.

use std::sync::Arc;
use tracing::info;

use super::EngineConfig;
use crate::engine::SearchSyncEngine;
use crate::SyncError;
use search_sync_repository::{MeilisearchClient, MeilisearchConfig, SearchTransport};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured engine, connected to a healthy search engine.
    pub engine: SearchSyncEngine,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `MEILISEARCH_HOST`: Meilisearch URL (default: http://localhost:7700)
    /// - `MEILISEARCH_KEY`: API key (default: none)
    /// - `SCOUT_SOFT_DELETE`: enable soft-delete metadata (default: off)
    /// - `SCOUT_PREFIX`: index name prefix (default: none)
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(SyncError)` - If the client cannot be built or the engine is unhealthy
    pub async fn new() -> Result<Self, SyncError> {
        let meilisearch_config = MeilisearchConfig::from_env();
        let engine_config = EngineConfig::from_env();

        info!(
            meilisearch_host = %meilisearch_config.host,
            soft_delete = engine_config.soft_delete,
            index_prefix = ?engine_config.index_prefix,
            "Initializing dependencies"
        );

        let client = MeilisearchClient::new(&meilisearch_config).map_err(|e| {
            SyncError::config(format!("Failed to create Meilisearch client: {}", e))
        })?;

        Self::connect(Arc::new(client), engine_config).await
    }

    /// Build the engine on top of `transport` once it reports healthy.
    pub async fn connect(
        transport: Arc<dyn SearchTransport>,
        engine_config: EngineConfig,
    ) -> Result<Self, SyncError> {
        let healthy = transport
            .health_check()
            .await
            .map_err(|e| SyncError::config(format!("Search engine health check failed: {}", e)))?;

        if !healthy {
            return Err(SyncError::config("Search engine is unhealthy"));
        }

        info!("Search engine connection verified");

        Ok(Self {
            engine: SearchSyncEngine::with_config(transport, engine_config),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::MockTransport;
    use async_trait::async_trait;
    use search_sync_repository::SearchError;
    use search_sync_shared::{Document, EntityKey, SearchParams};
    use serde_json::{Map, Value};

    /// Transport whose engine is reachable but not available.
    struct UnhealthyTransport;

    #[async_trait]
    impl SearchTransport for UnhealthyTransport {
        async fn upsert_documents(&self, _: &str, _: &[Document], _: &str) -> Result<(), SearchError> {
            Ok(())
        }

        async fn delete_documents(&self, _: &str, _: &[EntityKey]) -> Result<(), SearchError> {
            Ok(())
        }

        async fn delete_all_documents(&self, _: &str) -> Result<(), SearchError> {
            Ok(())
        }

        async fn search(&self, _: &str, _: &str, _: &SearchParams) -> Result<Value, SearchError> {
            Ok(Value::Null)
        }

        async fn create_index(&self, _: &str, _: &Map<String, Value>) -> Result<(), SearchError> {
            Ok(())
        }

        async fn delete_index(&self, _: &str) -> Result<(), SearchError> {
            Ok(())
        }

        async fn list_indexes(&self) -> Result<Vec<String>, SearchError> {
            Ok(Vec::new())
        }

        async fn update_index_settings(&self, _: &str, _: &Value) -> Result<(), SearchError> {
            Ok(())
        }

        async fn health_check(&self) -> Result<bool, SearchError> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn test_connect_healthy() {
        let config = EngineConfig::default().with_index_prefix("dev_");
        let dependencies = Dependencies::connect(Arc::new(MockTransport::new()), config.clone())
            .await
            .unwrap();

        assert_eq!(dependencies.engine.config(), &config);
    }

    #[tokio::test]
    async fn test_connect_unhealthy() {
        let result = Dependencies::connect(Arc::new(UnhealthyTransport), EngineConfig::default()).await;
        assert!(matches!(result, Err(SyncError::ConfigError(_))));
    }
}
