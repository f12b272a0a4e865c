//! Meilisearch index settings helpers.

use serde_json::{json, Value};

use search_sync_shared::SOFT_DELETE_FIELD;

/// Settings key listing the attributes usable in filter expressions.
pub const FILTERABLE_ATTRIBUTES: &str = "filterableAttributes";

/// Add the soft-delete metadata field to an index's filterable attributes.
///
/// Existing settings are kept; the field is appended once, whatever the number
/// of calls. A non-array `filterableAttributes` entry is replaced.
pub fn configure_soft_delete_filter(mut settings: Value) -> Value {
    if !settings.is_object() {
        settings = json!({});
    }

    let attributes = &mut settings[FILTERABLE_ATTRIBUTES];
    if !attributes.is_array() {
        *attributes = json!([]);
    }

    if let Some(list) = attributes.as_array_mut() {
        if !list.iter().any(|attr| attr == SOFT_DELETE_FIELD) {
            list.push(json!(SOFT_DELETE_FIELD));
        }
    }

    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_soft_delete_attribute() {
        let settings = configure_soft_delete_filter(json!({
            "filterableAttributes": ["status"],
            "sortableAttributes": ["rank"]
        }));

        assert_eq!(
            settings["filterableAttributes"],
            json!(["status", "__soft_deleted"])
        );
        assert_eq!(settings["sortableAttributes"], json!(["rank"]));
    }

    #[test]
    fn test_is_idempotent() {
        let once = configure_soft_delete_filter(json!({}));
        let twice = configure_soft_delete_filter(once.clone());

        assert_eq!(once, twice);
        assert_eq!(twice["filterableAttributes"], json!(["__soft_deleted"]));
    }

    #[test]
    fn test_non_object_settings() {
        let settings = configure_soft_delete_filter(Value::Null);
        assert_eq!(settings, json!({ "filterableAttributes": ["__soft_deleted"] }));
    }
}
