mod common;

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::json;

use coursearch::api::{COURSE_INFO_DOC_TYPE, CourseState, DiscoveryRequest, OrderBy, SearchApi};
use coursearch::catalog::{CatalogVisibility, SqliteCourseCatalog};
use coursearch::classification::{Classification, CourseClassifier, StaticClassifier};
use coursearch::config::SearchSettings;
use coursearch::engine::{SearchEngine, SearchEngineRegistry, SearchHit, SortSpec};
use coursearch::error::{Result, SearchApiError};
use coursearch::filter::{FilterValue, ID_FIELD};

use common::{RecordingEngine, recording_registry};

/// Classifier whose every call fails.
#[derive(Debug)]
struct BrokenClassifier;

impl CourseClassifier for BrokenClassifier {
    fn courses_by_classification(&self, _: i64) -> Result<Option<HashSet<String>>> {
        Err(SearchApiError::classification("classification store unavailable"))
    }

    fn set_data_courses(&self, _: Vec<SearchHit>) -> Result<Vec<SearchHit>> {
        Err(SearchApiError::classification("classification store unavailable"))
    }
}

fn setup() -> (Arc<RecordingEngine>, SearchApi) {
    let (engine, registry) = recording_registry();
    engine
        .index(
            COURSE_INFO_DOC_TYPE,
            vec![
                json!({"id": "c1", "org": "edX", "name": "Rust 101", "start": "2024-03-01T00:00:00Z", "end": "2024-06-01T00:00:00Z"}),
                json!({"id": "c2", "org": "MITx", "name": "Rust Systems", "start": "2023-09-01T00:00:00Z", "end": "2999-01-01T00:00:00Z"}),
                json!({"id": "c3", "org": "edX", "name": "Rust Internal", "start": "2022-01-01T00:00:00Z", "end": "2022-06-01T00:00:00Z"}),
            ],
        )
        .unwrap();

    let catalog = SqliteCourseCatalog::open_in_memory().unwrap();
    catalog.upsert_course("c1", CatalogVisibility::Both).unwrap();
    catalog.upsert_course("c2", CatalogVisibility::Both).unwrap();
    catalog.upsert_course("c3", CatalogVisibility::None).unwrap();

    let api = SearchApi::new(SearchSettings::default(), registry, Arc::new(catalog));
    (engine, api)
}

fn result_ids(results: &coursearch::engine::SearchResults) -> Vec<&str> {
    results.results.iter().map(|hit| hit.id.as_str()).collect()
}

fn excluded_ids(engine: &RecordingEngine) -> Vec<String> {
    let query = engine.last_query().unwrap();
    let mut ids: Vec<String> = query.filters.exclude_dictionary[ID_FIELD]
        .as_list()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect();
    ids.sort();
    ids
}

#[test]
fn test_hidden_courses_are_excluded() {
    let (engine, api) = setup();

    let results = api.course_discovery_search(&DiscoveryRequest::new()).unwrap();

    let mut ids = result_ids(&results);
    ids.sort();
    assert_eq!(ids, vec!["c1", "c2"]);
    assert_eq!(excluded_ids(&engine), vec!["c3"]);

    let query = engine.last_query().unwrap();
    assert_eq!(query.doc_type.as_deref(), Some(COURSE_INFO_DOC_TYPE));
    assert_eq!(query.size, 20);
    assert!(query.filters.filter_dictionary.is_empty());
    assert!(query.sort.is_none());

    let org = &results.facets["org"];
    assert_eq!(org.terms.get("edX"), Some(&1));
    assert_eq!(org.terms.get("MITx"), Some(&1));
}

#[test]
fn test_year_filter() {
    let (engine, api) = setup();

    let results = api
        .course_discovery_search(&DiscoveryRequest::new().year("2024"))
        .unwrap();

    assert_eq!(result_ids(&results), vec!["c1"]);
    let query = engine.last_query().unwrap();
    assert!(query.filters.field_dictionary["start"].as_range().is_some());
}

#[test]
fn test_state_filter() {
    let (_engine, api) = setup();

    let active = api
        .course_discovery_search(&DiscoveryRequest::new().state(CourseState::Active))
        .unwrap();
    assert_eq!(result_ids(&active), vec!["c2"]);

    let finished = api
        .course_discovery_search(&DiscoveryRequest::new().state(CourseState::Finished))
        .unwrap();
    assert_eq!(result_ids(&finished), vec!["c1"]);
}

#[test]
fn test_order_by() {
    let (engine, api) = setup();

    let newer = api
        .course_discovery_search(&DiscoveryRequest::new().order_by(OrderBy::Newer))
        .unwrap();
    assert_eq!(result_ids(&newer), vec!["c1", "c2"]);
    assert_eq!(engine.last_query().unwrap().sort, Some(SortSpec::descending("start")));

    let older = api
        .course_discovery_search(&DiscoveryRequest::new().order_by(OrderBy::from("older")))
        .unwrap();
    assert_eq!(result_ids(&older), vec!["c2", "c1"]);
    assert_eq!(engine.last_query().unwrap().sort, Some(SortSpec::ascending("start")));
}

#[test]
fn test_caller_fields_and_search_term() {
    let (engine, api) = setup();

    let results = api
        .course_discovery_search(&DiscoveryRequest::new().search_term("rust").field("org", "edX"))
        .unwrap();

    assert_eq!(result_ids(&results), vec!["c1"]);
    let query = engine.last_query().unwrap();
    assert_eq!(query.query_string.as_deref(), Some("rust"));
    assert_eq!(
        query.filters.field_dictionary.get("org"),
        Some(&FilterValue::from("edX"))
    );
}

#[test]
fn test_classification_narrows_and_enriches() {
    let (engine, api) = setup();
    let classifier = StaticClassifier::new(vec![Classification {
        id: 7,
        name: "Programming".to_string(),
        course_ids: ["c1".to_string()].into_iter().collect(),
    }]);
    let api = api.with_classifier(Arc::new(classifier));

    let results = api
        .course_discovery_search(&DiscoveryRequest::new().classification("7"))
        .unwrap();

    // Hidden courses stay excluded alongside the courses outside the classification.
    assert_eq!(excluded_ids(&engine), vec!["c2", "c3", "c3"]);
    assert_eq!(result_ids(&results), vec!["c1"]);
    let data = results.results[0].data.as_ref().unwrap();
    assert_eq!(data["classifications"], json!([{"id": 7, "name": "Programming"}]));
}

#[test]
fn test_unknown_or_malformed_classification_is_ignored() {
    let (engine, api) = setup();
    let api = api.with_classifier(Arc::new(StaticClassifier::default()));

    let results = api
        .course_discovery_search(&DiscoveryRequest::new().classification("42"))
        .unwrap();
    assert_eq!(results.results.len(), 2);
    assert_eq!(excluded_ids(&engine), vec!["c3"]);

    let results = api
        .course_discovery_search(&DiscoveryRequest::new().classification("programming"))
        .unwrap();
    assert_eq!(results.results.len(), 2);
    assert_eq!(excluded_ids(&engine), vec!["c3"]);
}

#[test]
fn test_failing_classifier_still_returns_results() {
    let (engine, api) = setup();
    let api = api.with_classifier(Arc::new(BrokenClassifier));

    let results = api
        .course_discovery_search(&DiscoveryRequest::new().classification("1"))
        .unwrap();

    assert_eq!(results.results.len(), 2);
    assert_eq!(excluded_ids(&engine), vec!["c3"]);
    assert!(
        results
            .results
            .iter()
            .all(|hit| hit.data.as_ref().unwrap().get("classifications").is_none())
    );
}

#[test]
fn test_missing_engine_fails_before_searching() {
    let engine = Arc::new(RecordingEngine::new("some_other_index"));
    let registry = SearchEngineRegistry::new().with_engine(engine.clone());
    let catalog = Arc::new(SqliteCourseCatalog::open_in_memory().unwrap());
    let api = SearchApi::new(SearchSettings::default(), registry, catalog);

    let err = api
        .course_discovery_search(&DiscoveryRequest::new())
        .unwrap_err();
    assert!(err.is_no_search_engine());
    assert_eq!(engine.calls(), 0);
}
