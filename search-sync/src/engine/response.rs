//! Structured search responses.

use serde_json::Value;

use super::mapper;
use search_sync_repository::SearchError;
use search_sync_shared::Document;

/// A validated search response.
///
/// Keeps the raw body next to the parsed parts so it can be handed back
/// unchanged with [`SearchResponse::into_raw`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResponse {
    hits: Vec<Document>,
    total_hits: u64,
    raw: Value,
}

impl SearchResponse {
    /// Ranked hits, in engine order.
    pub fn hits(&self) -> &[Document] {
        &self.hits
    }

    /// Total number of matching documents.
    pub fn total_hits(&self) -> u64 {
        self.total_hits
    }

    /// The raw response body.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }
}

impl TryFrom<Value> for SearchResponse {
    type Error = SearchError;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        let hits = mapper::hits(&raw)?
            .iter()
            .filter_map(|hit| hit.as_object().cloned())
            .collect();
        let total_hits = mapper::get_total_count(&raw)?;

        Ok(Self {
            hits,
            total_hits,
            raw,
        })
    }
}

/// What a raw query callback may return.
#[derive(Debug, Clone, PartialEq)]
pub enum RawQueryOutput {
    /// A raw response body, used verbatim.
    Raw(Value),
    /// A structured response, unwrapped to its raw body.
    Response(SearchResponse),
}

impl RawQueryOutput {
    pub fn into_raw(self) -> Value {
        match self {
            Self::Raw(raw) => raw,
            Self::Response(response) => response.into_raw(),
        }
    }
}

impl From<Value> for RawQueryOutput {
    fn from(raw: Value) -> Self {
        Self::Raw(raw)
    }
}

impl From<SearchResponse> for RawQueryOutput {
    fn from(response: SearchResponse) -> Self {
        Self::Response(response)
    }
}
