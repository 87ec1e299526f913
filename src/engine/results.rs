//! Search result envelope.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine::facet::FacetResult;

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Document identifier.
    pub id: String,
    /// Relevance score.
    #[serde(default)]
    pub score: f32,
    /// Document body; `None` once the hit has been denied to the viewer.
    #[serde(default)]
    pub data: Option<Value>,
}

impl SearchHit {
    /// Create a new hit.
    pub fn new<S: Into<String>>(id: S, score: f32, data: Value) -> Self {
        SearchHit {
            id: id.into(),
            score,
            data: Some(data),
        }
    }
}

/// Results of a search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Time taken in milliseconds.
    #[serde(default)]
    pub took: u64,
    /// Number of documents matching before pagination.
    pub total: u64,
    /// Highest score over the returned hits.
    #[serde(default)]
    pub max_score: f32,
    /// Returned hits, in order.
    pub results: Vec<SearchHit>,
    /// Facet counts keyed by field.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub facets: BTreeMap<String, FacetResult>,
    /// Hits removed because the viewer may not see them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_denied_count: Option<usize>,
}

impl SearchResults {
    /// Create empty search results.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Drop hits whose data was nulled and record how many were dropped.
    ///
    /// Both a missing body and a JSON `null` body count as denied.
    pub fn remove_denied(&mut self) -> usize {
        let before = self.results.len();
        self.results
            .retain(|hit| hit.data.as_ref().is_some_and(|data| !data.is_null()));
        let denied = before - self.results.len();
        self.access_denied_count = Some(denied);
        denied
    }
}
