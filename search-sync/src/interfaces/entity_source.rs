//! Entity data source trait definition.

use async_trait::async_trait;
use futures::stream::BoxStream;

use search_sync_repository::SearchError;
use search_sync_shared::EntityKey;

/// The application's record store, seen from the search layer.
///
/// Implementations may return records in any order and may omit keys they
/// cannot find (for example when a record was deleted after it was indexed,
/// or a read replica lags behind). Callers reorder and filter the results.
#[async_trait]
pub trait EntitySource<E: Send>: Send + Sync {
    /// Load the records with the given keys.
    async fn get_by_keys(&self, keys: &[EntityKey]) -> Result<Vec<E>, SearchError>;

    /// Lazily load the records with the given keys, for large result sets.
    fn stream_by_keys(&self, keys: Vec<EntityKey>) -> BoxStream<'_, Result<E, SearchError>>;
}
