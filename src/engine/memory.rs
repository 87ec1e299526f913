//! In-memory search engine.
//!
//! Documents are JSON objects kept per document type. Text matching is a
//! case-insensitive substring test of every query term (or quoted phrase)
//! against the string values of a document; the score is the number of
//! term occurrences. This is enough to exercise the search layer end to end
//! without an external index.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

use parking_lot::RwLock;
use serde_json::Value;

use crate::engine::facet::FacetCollector;
use crate::engine::query::{SearchQuery, SortOrder, SortSpec};
use crate::engine::results::{SearchHit, SearchResults};
use crate::engine::SearchEngine;
use crate::error::{Result, SearchApiError};
use crate::filter::range::parse_datetime;

#[derive(Debug, Clone)]
struct StoredDocument {
    id: String,
    body: Value,
}

/// A search engine holding its documents in memory.
#[derive(Debug)]
pub struct MemorySearchEngine {
    /// Name of the index.
    index_name: String,
    /// Documents grouped by document type, in insertion order.
    documents: RwLock<BTreeMap<String, Vec<StoredDocument>>>,
}

impl MemorySearchEngine {
    /// Create an empty engine for an index.
    pub fn new<S: Into<String>>(index_name: S) -> Self {
        MemorySearchEngine {
            index_name: index_name.into(),
            documents: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of documents stored under a document type.
    pub fn doc_count(&self, doc_type: &str) -> usize {
        self.documents
            .read()
            .get(doc_type)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl SearchEngine for MemorySearchEngine {
    fn index_name(&self) -> &str {
        &self.index_name
    }

    fn search(&self, query: &SearchQuery) -> Result<SearchResults> {
        let start_time = Instant::now();
        let terms = match query.text() {
            Some(text) => parse_terms(text)?,
            None => Vec::new(),
        };

        let documents = self.documents.read();
        let partitions: Vec<&Vec<StoredDocument>> = match &query.doc_type {
            Some(doc_type) => documents.get(doc_type).into_iter().collect(),
            None => documents.values().collect(),
        };

        let mut matches: Vec<(f32, &StoredDocument)> = Vec::new();
        for doc in partitions.into_iter().flatten() {
            if !query.filters.accepts(&doc.id, &doc.body) {
                continue;
            }
            if let Some(score) = score_document(&doc.body, &terms) {
                matches.push((score, doc));
            }
        }

        let mut collector = FacetCollector::new(query.facet_terms.clone());
        for (_, doc) in &matches {
            collector.collect_doc(&doc.body);
        }

        match &query.sort {
            Some(sort) => matches.sort_by(|a, b| compare_by_field(&a.1.body, &b.1.body, sort)),
            None => matches.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal)),
        }

        let total = matches.len() as u64;
        let results: Vec<SearchHit> = matches
            .into_iter()
            .skip(query.from)
            .take(query.size)
            .map(|(score, doc)| SearchHit::new(doc.id.clone(), score, doc.body.clone()))
            .collect();
        let max_score = results.iter().map(|hit| hit.score).fold(0.0_f32, f32::max);

        log::debug!(
            "memory engine '{}' matched {} document(s) for {:?}",
            self.index_name,
            total,
            query.query_string
        );

        Ok(SearchResults {
            took: start_time.elapsed().as_millis() as u64,
            total,
            max_score,
            results,
            facets: collector.finalize(),
            access_denied_count: None,
        })
    }

    fn index(&self, doc_type: &str, documents: Vec<Value>) -> Result<()> {
        let mut stored = self.documents.write();
        let partition = stored.entry(doc_type.to_string()).or_default();

        for body in documents {
            let id = document_id(&body)?;
            match partition.iter_mut().find(|doc| doc.id == id) {
                Some(existing) => existing.body = body,
                None => partition.push(StoredDocument { id, body }),
            }
        }

        Ok(())
    }

    fn remove(&self, doc_type: &str, ids: &[String]) -> Result<()> {
        let ids: HashSet<&str> = ids.iter().map(String::as_str).collect();
        if let Some(partition) = self.documents.write().get_mut(doc_type) {
            partition.retain(|doc| !ids.contains(doc.id.as_str()));
        }
        Ok(())
    }
}

fn document_id(body: &Value) -> Result<String> {
    match body.get("id") {
        Some(Value::String(id)) => Ok(id.clone()),
        Some(Value::Number(id)) => Ok(id.to_string()),
        _ => Err(SearchApiError::engine(
            "document has no string or numeric 'id' field",
        )),
    }
}

/// Split a query into lowercase terms; double-quoted runs stay together as phrases.
fn parse_terms(query: &str) -> Result<Vec<String>> {
    if query.matches('"').count() % 2 == 1 {
        return Err(SearchApiError::query_parse(format!(
            "mismatched quotes in query '{query}'"
        )));
    }

    let mut terms = Vec::new();
    for (i, segment) in query.split('"').enumerate() {
        if i % 2 == 1 {
            let phrase = segment.trim();
            if !phrase.is_empty() {
                terms.push(phrase.to_lowercase());
            }
        } else {
            terms.extend(segment.split_whitespace().map(str::to_lowercase));
        }
    }
    Ok(terms)
}

fn score_document(body: &Value, terms: &[String]) -> Option<f32> {
    if terms.is_empty() {
        return Some(1.0);
    }

    let mut text = String::new();
    collect_text(body, &mut text);
    let text = text.to_lowercase();

    let mut score = 0usize;
    for term in terms {
        let occurrences = text.matches(term.as_str()).count();
        if occurrences == 0 {
            return None;
        }
        score += occurrences;
    }
    Some(score as f32)
}

fn collect_text(value: &Value, out: &mut String) {
    match value {
        Value::String(s) => {
            out.push_str(s);
            out.push('\n');
        }
        Value::Array(items) => items.iter().for_each(|item| collect_text(item, out)),
        Value::Object(map) => map.values().for_each(|item| collect_text(item, out)),
        _ => {}
    }
}

// Documents missing the sort field go last in either direction.
fn compare_by_field(a: &Value, b: &Value, sort: &SortSpec) -> Ordering {
    let a = a.get(&sort.field).filter(|v| !v.is_null());
    let b = b.get(&sort.field).filter(|v| !v.is_null());
    match (a, b) {
        (Some(a), Some(b)) => {
            let ordering = compare_values(a, b);
            match sort.order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    if let (Some(x), Some(y)) = (parse_datetime(a), parse_datetime(b)) {
        return x.cmp(&y);
    }
    match (a.as_str(), b.as_str()) {
        (Some(x), Some(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::facet::FacetSpec;
    use crate::filter::{FilterDictionary, FilterValue, ID_FIELD};
    use serde_json::json;

    fn engine_with_courses() -> MemorySearchEngine {
        let engine = MemorySearchEngine::new("courseware_index");
        engine
            .index(
                "course_info",
                vec![
                    json!({"id": "c1", "org": "edX", "start": "2023-09-01T00:00:00Z",
                           "content": {"display_name": "Intro to Rust"}}),
                    json!({"id": "c2", "org": "MITx", "start": "2024-02-01T00:00:00Z",
                           "content": {"display_name": "Advanced Rust Patterns"}}),
                    json!({"id": "c3", "org": "edX", "start": "2024-09-01T00:00:00Z",
                           "content": {"display_name": "Python for Everyone"}}),
                ],
            )
            .unwrap();
        engine
    }

    #[test]
    fn test_text_matching() {
        let engine = engine_with_courses();
        let results = engine
            .search(&SearchQuery::new("rust").doc_type("course_info"))
            .unwrap();
        assert_eq!(results.total, 2);

        let results = engine
            .search(&SearchQuery::new("\"advanced rust\"").doc_type("course_info"))
            .unwrap();
        assert_eq!(results.total, 1);
        assert_eq!(results.results[0].id, "c2");

        let results = engine
            .search(&SearchQuery::default().doc_type("course_info"))
            .unwrap();
        assert_eq!(results.total, 3);
    }

    #[test]
    fn test_unbalanced_quotes() {
        let engine = engine_with_courses();
        let err = engine
            .search(&SearchQuery::new("\"intro to"))
            .unwrap_err();
        assert!(matches!(err, SearchApiError::QueryParse(_)));
    }

    #[test]
    fn test_doc_type_partition() {
        let engine = engine_with_courses();
        let results = engine
            .search(&SearchQuery::new("rust").doc_type("courseware_content"))
            .unwrap();
        assert_eq!(results.total, 0);

        let results = engine.search(&SearchQuery::new("rust")).unwrap();
        assert_eq!(results.total, 2);
    }

    #[test]
    fn test_dictionaries_and_sort() {
        let engine = engine_with_courses();

        let mut fields = FilterDictionary::new();
        fields.insert("org".to_string(), FilterValue::from("edX"));
        let mut excludes = FilterDictionary::new();
        excludes.insert(ID_FIELD.to_string(), FilterValue::list(["c3"]));

        let query = SearchQuery::default()
            .doc_type("course_info")
            .field_dictionary(fields.clone())
            .exclude_dictionary(excludes);
        let results = engine.search(&query).unwrap();
        assert_eq!(results.total, 1);
        assert_eq!(results.results[0].id, "c1");

        let query = SearchQuery::default()
            .doc_type("course_info")
            .sort(SortSpec::parse("start:desc"));
        let ids: Vec<String> = engine
            .search(&query)
            .unwrap()
            .results
            .into_iter()
            .map(|hit| hit.id)
            .collect();
        assert_eq!(ids, vec!["c3", "c2", "c1"]);

        let query = SearchQuery::default()
            .doc_type("course_info")
            .sort(SortSpec::parse("start"));
        let first = engine.search(&query).unwrap().results[0].id.clone();
        assert_eq!(first, "c1");
    }

    #[test]
    fn test_pagination_and_facets() {
        let engine = engine_with_courses();
        let mut facets = BTreeMap::new();
        facets.insert("org".to_string(), FacetSpec::unsized_terms());

        let query = SearchQuery::default()
            .doc_type("course_info")
            .size(1)
            .from(1)
            .sort(SortSpec::parse("start"))
            .facet_terms(facets);
        let results = engine.search(&query).unwrap();

        assert_eq!(results.total, 3);
        assert_eq!(results.results.len(), 1);
        assert_eq!(results.results[0].id, "c2");
        assert_eq!(results.facets["org"].terms["edX"], 2);
        assert_eq!(results.facets["org"].terms["MITx"], 1);
    }

    #[test]
    fn test_index_replaces_and_remove() {
        let engine = engine_with_courses();
        engine
            .index("course_info", vec![json!({"id": "c1", "org": "HarvardX"})])
            .unwrap();
        assert_eq!(engine.doc_count("course_info"), 3);

        engine
            .remove("course_info", &["c1".to_string(), "c2".to_string()])
            .unwrap();
        assert_eq!(engine.doc_count("course_info"), 1);

        let err = engine.index("course_info", vec![json!({"org": "edX"})]);
        assert!(err.is_err());
    }
}
