//! Configuration of the sync engine itself.

use std::env;

/// Behaviour switches of the sync engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Annotate documents of soft-deleting entity types with their
    /// soft-delete state.
    pub soft_delete: bool,
    /// Prefix applied to every index name derived from an entity type.
    pub index_prefix: Option<String>,
}

impl EngineConfig {
    /// Enable or disable soft-delete metadata.
    pub fn with_soft_delete(mut self, soft_delete: bool) -> Self {
        self.soft_delete = soft_delete;
        self
    }

    /// Set the index name prefix.
    pub fn with_index_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.index_prefix = Some(prefix.into());
        self
    }

    /// Read the config from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SCOUT_SOFT_DELETE`: `true` or `1` enables soft-delete metadata (default: off)
    /// - `SCOUT_PREFIX`: index name prefix (default: none)
    pub fn from_env() -> Self {
        let soft_delete = env::var("SCOUT_SOFT_DELETE")
            .map(|value| parse_flag(&value))
            .unwrap_or(false);
        let index_prefix = env::var("SCOUT_PREFIX").ok().filter(|p| !p.is_empty());

        Self {
            soft_delete,
            index_prefix,
        }
    }

    /// Apply the configured prefix to an index name.
    pub fn prefixed(&self, index: &str) -> String {
        match &self.index_prefix {
            Some(prefix) => format!("{}{}", prefix, index),
            None => index.to_string(),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = EngineConfig::default();
        assert!(!config.soft_delete);
        assert_eq!(config.prefixed("books"), "books");
    }

    #[test]
    fn test_prefix() {
        let config = EngineConfig::default().with_index_prefix("staging_");
        assert_eq!(config.prefixed("books"), "staging_books");
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" TRUE "));
        assert!(parse_flag("1"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("yes"));
    }
}
