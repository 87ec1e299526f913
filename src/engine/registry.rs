//! Resolution of the configured search engine for an index name.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::engine::SearchEngine;

/// Builds an engine for an index name, or declines with `None`.
pub type EngineFactory = Arc<dyn Fn(&str) -> Option<Arc<dyn SearchEngine>> + Send + Sync>;

/// Registry of search engines keyed by index name.
///
/// An empty registry is the "no search engine configured" state; both search
/// entry points fail fast on it.
#[derive(Clone, Default)]
pub struct SearchEngineRegistry {
    /// Engines registered for a specific index.
    engines: HashMap<String, Arc<dyn SearchEngine>>,
    /// Fallback for index names with no registered engine.
    factory: Option<EngineFactory>,
}

impl SearchEngineRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an engine under its own index name.
    pub fn register(&mut self, engine: Arc<dyn SearchEngine>) {
        self.engines.insert(engine.index_name().to_string(), engine);
    }

    /// Register an engine and return the registry for chaining.
    pub fn with_engine(mut self, engine: Arc<dyn SearchEngine>) -> Self {
        self.register(engine);
        self
    }

    /// Set the fallback factory.
    pub fn with_factory(mut self, factory: EngineFactory) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Look up the engine for an index name.
    pub fn get_search_engine(&self, index_name: &str) -> Option<Arc<dyn SearchEngine>> {
        if let Some(engine) = self.engines.get(index_name) {
            return Some(Arc::clone(engine));
        }
        self.factory.as_ref().and_then(|factory| factory(index_name))
    }

    /// Check whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty() && self.factory.is_none()
    }
}

impl fmt::Debug for SearchEngineRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.engines.keys().collect();
        names.sort();
        f.debug_struct("SearchEngineRegistry")
            .field("engines", &names)
            .field("factory", &self.factory.is_some())
            .finish()
    }
}
