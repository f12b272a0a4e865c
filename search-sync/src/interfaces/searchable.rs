//! Searchable entity trait definition.

use serde_json::{Map, Value};

use search_sync_shared::EntityKey;

/// A record that can be pushed to a search index.
///
/// # Example
///
/// ```ignore
/// struct Book { id: i64, title: String, deleted: bool }
///
/// impl Searchable for Book {
///     const SOFT_DELETES: bool = true;
///
///     fn index_name() -> String {
///         "books".to_string()
///     }
///
///     fn key(&self) -> EntityKey {
///         self.id.into()
///     }
///
///     fn to_searchable_fields(&self) -> Map<String, Value> {
///         let mut fields = Map::new();
///         fields.insert("title".to_string(), self.title.clone().into());
///         fields
///     }
///
///     fn is_trashed(&self) -> bool {
///         self.deleted
///     }
/// }
/// ```
pub trait Searchable: Send + Sync {
    /// Whether records of this type use soft deletes. Pushed documents carry
    /// soft-delete metadata only when this is set and the engine is configured
    /// for soft deletes.
    const SOFT_DELETES: bool = false;

    /// Index name for this entity type, before any configured prefix.
    fn index_name() -> String;

    /// Destination index of this record, before any configured prefix.
    fn searchable_as(&self) -> String {
        Self::index_name()
    }

    /// Name of the primary-key field.
    fn key_name(&self) -> &str {
        "id"
    }

    /// Primary-key value.
    fn key(&self) -> EntityKey;

    /// Searchable fields. An empty map keeps the record out of the index.
    fn to_searchable_fields(&self) -> Map<String, Value>;

    /// Extra fields appended to the pushed document.
    fn metadata(&self) -> Map<String, Value> {
        Map::new()
    }

    /// Whether the record is soft deleted.
    fn is_trashed(&self) -> bool {
        false
    }
}
