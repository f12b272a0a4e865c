use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Primary-key value of a searchable entity.
///
/// Serialized untagged so ids travel to the engine as plain JSON numbers or
/// strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityKey {
    /// Integer key.
    Int(i64),
    /// String key (including UUIDs and integers too large for `i64`).
    Str(String),
}

impl EntityKey {
    /// Convert a JSON value taken from a hit into a key.
    ///
    /// Returns `None` for values that cannot identify a document
    /// (null, booleans, arrays, objects).
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Self::Int(i)),
                None => Some(Self::Str(n.to_string())),
            },
            Value::String(s) => Some(Self::Str(s.clone())),
            _ => None,
        }
    }

    /// Canonical textual form, used when comparing keys of mixed
    /// representation (`5` and `"5"` are the same document).
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{}", i),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntityKey {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for EntityKey {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for EntityKey {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<String> for EntityKey {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&str> for EntityKey {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<Uuid> for EntityKey {
    fn from(value: Uuid) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<EntityKey> for Value {
    fn from(key: EntityKey) -> Self {
        match key {
            EntityKey::Int(i) => Value::from(i),
            EntityKey::Str(s) => Value::String(s),
        }
    }
}
