use serde_json::Value;

/// Equality and inclusion criteria for a search.
///
/// Every entry is combined with AND; the values of one inclusion entry are
/// combined with OR. Entries keep the order they were added in, and adding a
/// field twice replaces the earlier value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicates {
    /// `field = value` entries.
    pub wheres: Vec<(String, Value)>,
    /// `field IN (values)` entries.
    pub where_ins: Vec<(String, Vec<Value>)>,
}

impl Predicates {
    /// Create an empty predicate set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value`.
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        let field = field.into();
        let value = value.into();
        match self.wheres.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = value,
            None => self.wheres.push((field, value)),
        }
        self
    }

    /// Require `field` to equal one of `values`.
    pub fn where_in<I, V>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let field = field.into();
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        match self.where_ins.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = values,
            None => self.where_ins.push((field, values)),
        }
        self
    }

    /// True when no criteria are set.
    pub fn is_empty(&self) -> bool {
        self.wheres.is_empty() && self.where_ins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_preserves_order() {
        let predicates = Predicates::new()
            .where_eq("status", "active")
            .where_eq("published", true)
            .where_in("category", [1, 2]);

        assert_eq!(predicates.wheres[0].0, "status");
        assert_eq!(predicates.wheres[1].0, "published");
        assert_eq!(predicates.where_ins[0], ("category".to_string(), vec![json!(1), json!(2)]));
        assert!(!predicates.is_empty());
    }

    #[test]
    fn test_repeated_field_replaces_value() {
        let predicates = Predicates::new()
            .where_eq("status", "draft")
            .where_eq("rank", 1)
            .where_eq("status", "active");

        assert_eq!(predicates.wheres.len(), 2);
        assert_eq!(predicates.wheres[0], ("status".to_string(), json!("active")));
    }

    #[test]
    fn test_empty() {
        assert!(Predicates::new().is_empty());
    }
}
