//! # coursearch
//!
//! Search layer for courseware content and course discovery on top of a
//! pluggable full-text search engine.
//!
//! ## Features
//!
//! - Access-controlled courseware search with denied-hit accounting
//! - Course discovery with year, run state and classification filters
//! - Catalog visibility backed by SQLite
//! - Optional classification capability with a no-op default
//! - In-memory engine for tests and the CLI

pub mod api;
pub mod catalog;
pub mod classification;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod result_processor;
pub mod user;

pub mod prelude {
    pub use crate::api::{CourseState, DiscoveryRequest, OrderBy, SearchApi, SearchRequest};
    pub use crate::catalog::{CatalogVisibility, CourseCatalog, SqliteCourseCatalog};
    pub use crate::classification::{CourseClassifier, NoOpClassifier, StaticClassifier};
    pub use crate::config::SearchSettings;
    pub use crate::engine::{
        MemorySearchEngine, SearchEngine, SearchEngineRegistry, SearchHit, SearchQuery,
        SearchResults,
    };
    pub use crate::error::{Result, SearchApiError};
    pub use crate::filter::{DateRange, FieldFilters, FilterDictionary, FilterValue};
    pub use crate::user::SearchUser;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
