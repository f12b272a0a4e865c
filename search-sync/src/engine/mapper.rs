//! Mapping raw search responses back to keys and entities.
//!
//! Responses look like `{ "hits": [{..}, ..], "nbHits": n, .. }`. Hits keep
//! the engine's relevance order, and that order is preserved all the way to
//! the returned entities. Entities the data source no longer has are dropped
//! silently: a record deleted between indexing and read-back is expected, not
//! an error.

use std::collections::HashMap;

use futures::stream::{self, Stream, TryStreamExt};
use serde_json::Value;
use tracing::{debug, instrument};

use super::SearchSyncEngine;
use crate::interfaces::{EntitySource, Searchable};
use search_sync_repository::SearchError;
use search_sync_shared::EntityKey;

/// Hit-count fields, newest engine versions last.
const TOTAL_COUNT_FIELDS: [&str; 3] = ["nbHits", "totalHits", "estimatedTotalHits"];

/// The hit list of a raw response.
pub fn hits(raw: &Value) -> Result<&Vec<Value>, SearchError> {
    raw.get("hits")
        .and_then(Value::as_array)
        .ok_or_else(|| SearchError::parse("Search response has no hits array"))
}

/// Keys of all hits, taking each hit's first field as its key.
///
/// Depends on the engine returning the key field first; prefer
/// [`map_ids_from`] when the key field name is known.
pub fn map_ids(raw: &Value) -> Result<Vec<EntityKey>, SearchError> {
    Ok(hits(raw)?
        .iter()
        .filter_map(|hit| {
            hit.as_object()
                .and_then(|fields| fields.values().next())
                .and_then(EntityKey::from_value)
        })
        .collect())
}

/// Keys of all hits, read from `key_field`.
///
/// Hits without a usable key (missing, null, or not a number or string)
/// are skipped.
pub fn map_ids_from(raw: &Value, key_field: &str) -> Result<Vec<EntityKey>, SearchError> {
    Ok(hits(raw)?
        .iter()
        .filter_map(|hit| hit.get(key_field).and_then(EntityKey::from_value))
        .collect())
}

/// Total hit count of a raw response.
pub fn get_total_count(raw: &Value) -> Result<u64, SearchError> {
    TOTAL_COUNT_FIELDS
        .iter()
        .find_map(|field| raw.get(*field).and_then(Value::as_u64))
        .ok_or_else(|| SearchError::parse("Search response has no hit count"))
}

/// Rank position of every key, by canonical form. The first occurrence wins.
fn positions(keys: &[EntityKey]) -> HashMap<String, usize> {
    let mut positions = HashMap::with_capacity(keys.len());
    for (position, key) in keys.iter().enumerate() {
        positions.entry(key.canonical()).or_insert(position);
    }
    positions
}

/// Keep the entities whose key is in `keys` and order them by rank.
///
/// Keys are compared by canonical form, so an entity keyed `5` matches a hit
/// keyed `"5"`.
pub fn order_by_keys<E, I>(keys: &[EntityKey], entities: I) -> Vec<E>
where
    E: Searchable,
    I: IntoIterator<Item = E>,
{
    let positions = positions(keys);

    let mut ranked: Vec<(usize, E)> = entities
        .into_iter()
        .filter_map(|entity| {
            positions
                .get(&entity.key().canonical())
                .map(|position| (*position, entity))
        })
        .collect();

    ranked.sort_by_key(|(position, _)| *position);
    ranked.into_iter().map(|(_, entity)| entity).collect()
}

impl SearchSyncEngine {
    /// Keys of all hits, taking each hit's first field as its key.
    pub fn map_ids(&self, raw: &Value) -> Result<Vec<EntityKey>, SearchError> {
        map_ids(raw)
    }

    /// Keys of all hits, read from `key_field`.
    pub fn map_ids_from(&self, raw: &Value, key_field: &str) -> Result<Vec<EntityKey>, SearchError> {
        map_ids_from(raw, key_field)
    }

    /// Total hit count of a raw response.
    pub fn get_total_count(&self, raw: &Value) -> Result<u64, SearchError> {
        get_total_count(raw)
    }

    /// Load the entities behind a response's hits, in rank order.
    ///
    /// # Arguments
    ///
    /// * `raw` - Raw search response
    /// * `key_field` - Field of each hit holding the entity key
    /// * `source` - Data source the entities are loaded from
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<E>)` - Entities ordered like the hits; hits whose entity the
    ///   source did not return are absent
    /// * `Err(SearchError)` - If the response is malformed or the source fails
    #[instrument(skip(self, raw, source))]
    pub async fn map<E, S>(
        &self,
        raw: &Value,
        key_field: &str,
        source: &S,
    ) -> Result<Vec<E>, SearchError>
    where
        E: Searchable,
        S: EntitySource<E> + ?Sized,
    {
        let keys = map_ids_from(raw, key_field)?;
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let entities = source.get_by_keys(&keys).await?;
        let fetched = entities.len();
        let ranked = order_by_keys(&keys, entities);

        debug!(
            hits = keys.len(),
            fetched = fetched,
            mapped = ranked.len(),
            "Mapped search hits to entities"
        );

        Ok(ranked)
    }

    /// Like [`map`](Self::map), but consumes the source lazily.
    ///
    /// Only entities matching a hit are kept while the source is read, then
    /// they are put in rank order and returned as a stream.
    #[instrument(skip(self, raw, source))]
    pub async fn lazy_map<E, S>(
        &self,
        raw: &Value,
        key_field: &str,
        source: &S,
    ) -> Result<impl Stream<Item = E>, SearchError>
    where
        E: Searchable,
        S: EntitySource<E> + ?Sized,
    {
        let keys = map_ids_from(raw, key_field)?;
        let mut ranked: Vec<(usize, E)> = Vec::new();

        if !keys.is_empty() {
            let positions = positions(&keys);
            let mut entities = source.stream_by_keys(keys);
            while let Some(entity) = entities.try_next().await? {
                if let Some(position) = positions.get(&entity.key().canonical()) {
                    ranked.push((*position, entity));
                }
            }
        }

        ranked.sort_by_key(|(position, _)| *position);
        debug!(mapped = ranked.len(), "Lazily mapped search hits to entities");

        Ok(stream::iter(ranked.into_iter().map(|(_, entity)| entity)))
    }
}
