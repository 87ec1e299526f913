//! Search entry points.
//!
//! [`SearchApi`] turns user-facing search requests into engine queries:
//!
//! - [`SearchApi::perform_search`] searches courseware content, restricting
//!   hits to what the requesting user may see and counting the hits denied.
//! - [`SearchApi::course_discovery_search`] searches course descriptions,
//!   applying year/state/classification filters and hiding courses whose
//!   catalog visibility forbids discovery.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use coursearch::api::{DiscoveryRequest, SearchApi, SearchRequest};
//! use coursearch::catalog::SqliteCourseCatalog;
//! use coursearch::config::SearchSettings;
//! use coursearch::engine::{MemorySearchEngine, SearchEngine, SearchEngineRegistry};
//! use serde_json::json;
//!
//! # fn main() -> coursearch::error::Result<()> {
//! let engine = Arc::new(MemorySearchEngine::new("courseware_index"));
//! engine.index("course_info", vec![json!({"id": "c1", "org": "edX", "name": "Rust"})])?;
//!
//! let registry = SearchEngineRegistry::new().with_engine(engine);
//! let catalog = Arc::new(SqliteCourseCatalog::open_in_memory()?);
//! let api = SearchApi::new(SearchSettings::default(), registry, catalog);
//!
//! let results = api.course_discovery_search(&DiscoveryRequest::new().search_term("rust"))?;
//! assert_eq!(results.total, 1);
//!
//! let results = api.perform_search(&SearchRequest::new("rust"))?;
//! assert_eq!(results.access_denied_count, Some(0));
//! # Ok(())
//! # }
//! ```

pub mod request;

pub use self::request::*;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::catalog::CourseCatalog;
use crate::classification::{CourseClassifier, NoOpClassifier};
use crate::config::SearchSettings;
use crate::engine::{SearchEngine, SearchEngineRegistry, SearchQuery, SearchResults};
use crate::error::{Result, SearchApiError};
use crate::filter::{
    DefaultFilterGenerator, FieldFilters, FilterDictionary, FilterValue, SearchFilterGenerator,
    ID_FIELD,
};
use crate::result_processor::{DefaultResultProcessor, SearchResultProcessor};

/// Document type partition of courseware content.
pub const COURSEWARE_CONTENT_DOC_TYPE: &str = "courseware_content";

/// Document type partition of course descriptions.
pub const COURSE_INFO_DOC_TYPE: &str = "course_info";

/// Generated field constraints that course discovery keeps.
pub const DISCOVERY_SEARCH_FIELDS: [&str; 1] = ["org"];

/// Coordinates filter generation, engine lookup and result post-processing.
#[derive(Debug, Clone)]
pub struct SearchApi {
    settings: SearchSettings,
    engines: SearchEngineRegistry,
    filter_generator: Arc<dyn SearchFilterGenerator>,
    result_processor: Arc<dyn SearchResultProcessor>,
    catalog: Arc<dyn CourseCatalog>,
    classifier: Arc<dyn CourseClassifier>,
}

impl SearchApi {
    /// Create a search API with the stock filter generator, result processor
    /// and no classification support.
    pub fn new(
        settings: SearchSettings,
        engines: SearchEngineRegistry,
        catalog: Arc<dyn CourseCatalog>,
    ) -> Self {
        SearchApi {
            settings,
            engines,
            filter_generator: Arc::new(DefaultFilterGenerator::new()),
            result_processor: Arc::new(DefaultResultProcessor::new()),
            catalog,
            classifier: Arc::new(NoOpClassifier::new()),
        }
    }

    /// Replace the filter generator.
    pub fn with_filter_generator(mut self, generator: Arc<dyn SearchFilterGenerator>) -> Self {
        self.filter_generator = generator;
        self
    }

    /// Replace the result processor.
    pub fn with_result_processor(mut self, processor: Arc<dyn SearchResultProcessor>) -> Self {
        self.result_processor = processor;
        self
    }

    /// Enable a classification backend.
    pub fn with_classifier(mut self, classifier: Arc<dyn CourseClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// The settings in use.
    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    fn searcher(&self) -> Result<Arc<dyn SearchEngine>> {
        let index_name = &self.settings.courseware_index_name;
        self.engines.get_search_engine(index_name).ok_or_else(|| {
            log::error!(
                "no search engine registered for index '{}' (backend: {})",
                index_name,
                self.settings.search_engine.as_deref().unwrap_or("unset")
            );
            SearchApiError::no_search_engine(index_name.as_str())
        })
    }

    /// Search courseware content on behalf of a user.
    ///
    /// Hits the user may not see are removed; `access_denied_count` holds how
    /// many. Size and offset go to the engine unchecked.
    pub fn perform_search(&self, request: &SearchRequest) -> Result<SearchResults> {
        let filters = self
            .filter_generator
            .generate_field_filters(request.user.as_ref(), request.course_id.as_deref())?;
        let searcher = self.searcher()?;

        log::debug!(
            "courseware search term={:?} course={:?} size={} from={}",
            request.search_term,
            request.course_id,
            request.size,
            request.from
        );

        let mut results = searcher.search_string(
            &request.search_term,
            filters,
            request.size,
            request.from,
            COURSEWARE_CONTENT_DOC_TYPE,
        )?;

        for hit in &mut results.results {
            if let Some(data) = hit.data.take() {
                hit.data = self.result_processor.process_result(
                    data,
                    &request.search_term,
                    request.user.as_ref(),
                )?;
            }
        }
        let denied = results.remove_denied();
        if denied > 0 {
            log::debug!("courseware search denied {denied} hit(s)");
        }

        Ok(results)
    }

    /// Search course descriptions for the course discovery page.
    pub fn course_discovery_search(&self, request: &DiscoveryRequest) -> Result<SearchResults> {
        let generated = self.filter_generator.generate_field_filters(None, None)?;
        let mut field_dictionary: FilterDictionary = generated
            .field_dictionary
            .into_iter()
            .filter(|(field, _)| DISCOVERY_SEARCH_FIELDS.contains(&field.as_str()))
            .collect();
        field_dictionary.extend(request.field_dictionary.clone());
        let mut exclude_dictionary = generated.exclude_dictionary;

        let searcher = self.searcher()?;

        apply_date_filters(&mut field_dictionary, request, Utc::now());

        let hidden = self.catalog.hidden_from_discovery()?;
        exclude_dictionary.insert(ID_FIELD.to_string(), FilterValue::list(hidden));

        if let Some(classification) = request
            .classification
            .as_deref()
            .filter(|c| !c.trim().is_empty())
        {
            match self.classification_exclusions(classification) {
                Ok(Some(ids)) => {
                    if let Some(excluded) = exclude_dictionary.get_mut(ID_FIELD) {
                        excluded.extend(ids);
                    }
                }
                Ok(None) => {
                    log::debug!("classification {classification} requested but not supported");
                }
                Err(e) => {
                    log::error!(
                        "Course Discovery - error resolving courses of classification {classification}: {e}"
                    );
                }
            }
        }

        let query = SearchQuery {
            query_string: request.search_term.clone(),
            doc_type: Some(COURSE_INFO_DOC_TYPE.to_string()),
            size: request.size,
            from: request.from,
            filters: FieldFilters {
                field_dictionary,
                filter_dictionary: FilterDictionary::new(),
                exclude_dictionary,
            },
            facet_terms: self.settings.course_discovery_facets(),
            sort: request.order_by.sort(),
        };
        log::debug!("course discovery query: {query:?}");

        let mut results = searcher.search(&query)?;

        let hits = std::mem::take(&mut results.results);
        results.results = match self.classifier.set_data_courses(hits.clone()) {
            Ok(enriched) => enriched,
            Err(e) => {
                log::error!("Course Discovery - error adding classification data: {e}");
                hits
            }
        };

        Ok(results)
    }

    /// Course ids outside a classification, or `None` without classification support.
    fn classification_exclusions(&self, classification: &str) -> Result<Option<Vec<String>>> {
        let classification_id: i64 = classification.trim().parse().map_err(|e| {
            SearchApiError::classification(format!(
                "invalid classification id '{classification}': {e}"
            ))
        })?;

        let Some(courses) = self.classifier.courses_by_classification(classification_id)? else {
            return Ok(None);
        };
        Ok(Some(self.catalog.course_ids_not_in(&courses)?))
    }
}

/// Add the year and state constraints of a discovery request.
fn apply_date_filters(
    field_dictionary: &mut FilterDictionary,
    request: &DiscoveryRequest,
    now: DateTime<Utc>,
) {
    match request.year_range() {
        Some(range) => {
            field_dictionary.insert(START_FIELD.to_string(), range.into());
        }
        None => {
            if let Some(year) = request.year.as_deref().filter(|y| !y.is_empty()) {
                log::debug!("ignoring non-numeric year filter {year:?}");
            }
        }
    }

    if let Some(state) = request.state {
        field_dictionary.insert(END_FIELD.to_string(), state.end_range(now).into());
    }
}
