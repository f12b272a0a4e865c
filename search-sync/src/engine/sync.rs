//! Pushing and deleting entity documents.
//!
//! Entities are batched by destination index: one remote call per index per
//! invocation. Batches are sent one after another with no atomicity across
//! indexes; a failing call stops the loop and is returned as-is, leaving the
//! indexes already written updated.

use serde_json::json;
use tracing::{debug, instrument};

use super::SearchSyncEngine;
use crate::interfaces::Searchable;
use search_sync_repository::SearchError;
use search_sync_shared::{Document, EntityKey, SOFT_DELETE_FIELD};

/// Documents bound for one index.
#[derive(Debug)]
struct IndexBatch {
    index: String,
    primary_key: String,
    documents: Vec<Document>,
}

impl SearchSyncEngine {
    /// Upsert entities into their destination indexes.
    ///
    /// Entities are partitioned by destination index, keeping their relative
    /// order; each non-empty partition is sent in one call keyed by the
    /// partition's primary-key field name. Entities without searchable fields
    /// are left out. An empty input makes no remote call.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If every batch was accepted
    /// * `Err(SearchError)` - The first failing batch's error; earlier batches
    ///   stay applied
    #[instrument(skip(self, entities), fields(entity_count = entities.len()))]
    pub async fn push<E: Searchable>(&self, entities: &[E]) -> Result<(), SearchError> {
        if entities.is_empty() {
            return Ok(());
        }

        let soft_delete = self.config.soft_delete && E::SOFT_DELETES;

        for batch in self.partition(entities, soft_delete) {
            if batch.documents.is_empty() {
                debug!(index = %batch.index, "No searchable documents in batch, skipping");
                continue;
            }

            debug!(
                index = %batch.index,
                count = batch.documents.len(),
                "Pushing documents"
            );

            self.index(&batch.index)
                .upsert(&batch.documents, &batch.primary_key)
                .await?;
        }

        Ok(())
    }

    /// Delete entities' documents from their index.
    ///
    /// The index is taken from the first entity; every entity must belong to
    /// that same index. Keys are sent in input order in one call. An empty
    /// input makes no remote call.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the delete was accepted (or there was nothing to delete)
    /// * `Err(SearchError::InvalidInput)` - If the entities span several indexes
    /// * `Err(SearchError)` - If the remote call fails
    #[instrument(skip(self, entities), fields(entity_count = entities.len()))]
    pub async fn delete<E: Searchable>(&self, entities: &[E]) -> Result<(), SearchError> {
        let Some(first) = entities.first() else {
            return Ok(());
        };

        let index = self.destination_of(first);
        if let Some(stray) = entities
            .iter()
            .map(|entity| self.destination_of(entity))
            .find(|destination| *destination != index)
        {
            return Err(SearchError::invalid_input(format!(
                "Cannot delete from several indexes in one call: {} and {}",
                index, stray
            )));
        }

        let ids: Vec<EntityKey> = entities.iter().map(Searchable::key).collect();
        debug!(index = %index, count = ids.len(), "Deleting documents");

        self.index(&index).delete_by_ids(&ids).await
    }

    /// Delete every document in an entity type's index.
    #[instrument(skip(self))]
    pub async fn flush<E: Searchable>(&self) -> Result<(), SearchError> {
        let index = self.index_name_for::<E>();
        debug!(index = %index, "Flushing index");
        self.index(&index).delete_all().await
    }

    /// Group documents by destination index in order of first appearance.
    fn partition<E: Searchable>(&self, entities: &[E], soft_delete: bool) -> Vec<IndexBatch> {
        let mut batches: Vec<IndexBatch> = Vec::new();

        for entity in entities {
            let index = self.destination_of(entity);
            let position = match batches.iter().position(|batch| batch.index == index) {
                Some(position) => position,
                None => {
                    batches.push(IndexBatch {
                        index,
                        primary_key: entity.key_name().to_string(),
                        documents: Vec::new(),
                    });
                    batches.len() - 1
                }
            };

            match build_document(entity, soft_delete) {
                Some(document) => batches[position].documents.push(document),
                None => debug!(key = %entity.key(), "Skipping entity without searchable fields"),
            }
        }

        batches
    }
}

/// Flatten an entity into its document: the primary key, then searchable
/// fields, then metadata. A later field of the same name replaces the value
/// but keeps the earlier position. `None` when there are no searchable fields.
fn build_document<E: Searchable>(entity: &E, soft_delete: bool) -> Option<Document> {
    let fields = entity.to_searchable_fields();
    if fields.is_empty() {
        return None;
    }

    let mut document = Document::new();
    document.insert(entity.key_name().to_string(), entity.key().into());
    document.extend(fields);
    document.extend(entity.metadata());

    if soft_delete {
        let state = if entity.is_trashed() { 1 } else { 0 };
        document.insert(SOFT_DELETE_FIELD.to_string(), json!(state));
    }

    Some(document)
}
