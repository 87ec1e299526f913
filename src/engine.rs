//! Search engine abstraction.
//!
//! The search layer never talks to an index directly. It resolves a
//! [`SearchEngine`] for an index name through a [`SearchEngineRegistry`] and
//! hands it a [`SearchQuery`]. [`MemorySearchEngine`] is a small in-process
//! engine used by the CLI and the tests.

pub mod facet;
pub mod memory;
pub mod query;
pub mod registry;
pub mod results;

pub use self::facet::*;
pub use self::memory::MemorySearchEngine;
pub use self::query::*;
pub use self::registry::*;
pub use self::results::*;

use std::fmt::Debug;

use serde_json::Value;

use crate::error::Result;
use crate::filter::FieldFilters;

/// A full-text search backend bound to one index.
pub trait SearchEngine: Send + Sync + Debug {
    /// Name of the index this engine serves.
    fn index_name(&self) -> &str;

    /// Execute a query.
    fn search(&self, query: &SearchQuery) -> Result<SearchResults>;

    /// Execute a plain text query with the given dictionaries and pagination.
    fn search_string(
        &self,
        term: &str,
        filters: FieldFilters,
        size: usize,
        from: usize,
        doc_type: &str,
    ) -> Result<SearchResults> {
        let query = SearchQuery::new(term)
            .filters(filters)
            .size(size)
            .from(from)
            .doc_type(doc_type);
        self.search(&query)
    }

    /// Add or replace documents of a document type.
    fn index(&self, doc_type: &str, documents: Vec<Value>) -> Result<()>;

    /// Remove documents of a document type by id.
    fn remove(&self, doc_type: &str, ids: &[String]) -> Result<()>;
}
