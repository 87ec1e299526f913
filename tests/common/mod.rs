//! Shared fixtures for the search API integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use serde_json::Value;

use coursearch::engine::{
    MemorySearchEngine, SearchEngine, SearchEngineRegistry, SearchQuery, SearchResults,
};
use coursearch::error::Result;

/// Engine wrapper that records every query it receives.
#[derive(Debug)]
pub struct RecordingEngine {
    inner: MemorySearchEngine,
    queries: Mutex<Vec<SearchQuery>>,
    calls: AtomicUsize,
}

impl RecordingEngine {
    pub fn new(index_name: &str) -> Self {
        RecordingEngine {
            inner: MemorySearchEngine::new(index_name),
            queries: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<SearchQuery> {
        self.queries.lock().last().cloned()
    }
}

impl SearchEngine for RecordingEngine {
    fn index_name(&self) -> &str {
        self.inner.index_name()
    }

    fn search(&self, query: &SearchQuery) -> Result<SearchResults> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().push(query.clone());
        self.inner.search(query)
    }

    fn index(&self, doc_type: &str, documents: Vec<Value>) -> Result<()> {
        self.inner.index(doc_type, documents)
    }

    fn remove(&self, doc_type: &str, ids: &[String]) -> Result<()> {
        self.inner.remove(doc_type, ids)
    }
}

/// A recording engine registered under the default index name.
pub fn recording_registry() -> (Arc<RecordingEngine>, SearchEngineRegistry) {
    let engine = Arc::new(RecordingEngine::new("courseware_index"));
    let registry = SearchEngineRegistry::new().with_engine(engine.clone());
    (engine, registry)
}
