//! Search query description handed to a [`SearchEngine`](crate::engine::SearchEngine).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::facet::FacetSpec;
use crate::filter::{FieldFilters, FilterDictionary};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

/// A sort on a single document field.
///
/// The textual form is `field` for ascending and `field:desc` for descending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Field to sort on.
    pub field: String,
    /// Sort direction.
    pub order: SortOrder,
}

impl SortSpec {
    /// Ascending sort on a field.
    pub fn ascending<S: Into<String>>(field: S) -> Self {
        SortSpec {
            field: field.into(),
            order: SortOrder::Ascending,
        }
    }

    /// Descending sort on a field.
    pub fn descending<S: Into<String>>(field: S) -> Self {
        SortSpec {
            field: field.into(),
            order: SortOrder::Descending,
        }
    }

    /// Parse a sort expression. An empty expression means no sort.
    pub fn parse(expr: &str) -> Option<Self> {
        let expr = expr.trim();
        if expr.is_empty() {
            return None;
        }
        match expr.split_once(':') {
            Some((field, "desc")) => Some(Self::descending(field)),
            Some((field, "asc")) => Some(Self::ascending(field)),
            Some(_) => None,
            None => Some(Self::ascending(expr)),
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.order {
            SortOrder::Ascending => write!(f, "{}", self.field),
            SortOrder::Descending => write!(f, "{}:desc", self.field),
        }
    }
}

/// Everything a search engine needs to run one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free text to match; `None` or empty matches every document.
    pub query_string: Option<String>,
    /// Document type partition to search in; `None` searches all.
    pub doc_type: Option<String>,
    /// Maximum number of hits to return.
    pub size: usize,
    /// Number of hits to skip.
    pub from: usize,
    /// Field, filter and exclude dictionaries.
    pub filters: FieldFilters,
    /// Facets to count, keyed by field.
    pub facet_terms: BTreeMap<String, FacetSpec>,
    /// Optional explicit sort; relevance order otherwise.
    pub sort: Option<SortSpec>,
}

impl Default for SearchQuery {
    fn default() -> Self {
        SearchQuery {
            query_string: None,
            doc_type: None,
            size: 10,
            from: 0,
            filters: FieldFilters::default(),
            facet_terms: BTreeMap::new(),
            sort: None,
        }
    }
}

impl SearchQuery {
    /// Create a new query for the given text.
    pub fn new<S: Into<String>>(query_string: S) -> Self {
        SearchQuery {
            query_string: Some(query_string.into()),
            ..Default::default()
        }
    }

    /// Set the document type partition.
    pub fn doc_type<S: Into<String>>(mut self, doc_type: S) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    /// Set the maximum number of hits to return.
    pub fn size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Set the pagination offset.
    pub fn from(mut self, from: usize) -> Self {
        self.from = from;
        self
    }

    /// Set all three dictionaries.
    pub fn filters(mut self, filters: FieldFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Set the field dictionary.
    pub fn field_dictionary(mut self, dictionary: FilterDictionary) -> Self {
        self.filters.field_dictionary = dictionary;
        self
    }

    /// Set the filter dictionary.
    pub fn filter_dictionary(mut self, dictionary: FilterDictionary) -> Self {
        self.filters.filter_dictionary = dictionary;
        self
    }

    /// Set the exclude dictionary.
    pub fn exclude_dictionary(mut self, dictionary: FilterDictionary) -> Self {
        self.filters.exclude_dictionary = dictionary;
        self
    }

    /// Set the facets to count.
    pub fn facet_terms(mut self, facet_terms: BTreeMap<String, FacetSpec>) -> Self {
        self.facet_terms = facet_terms;
        self
    }

    /// Set the sort.
    pub fn sort(mut self, sort: Option<SortSpec>) -> Self {
        self.sort = sort;
        self
    }

    /// The query text, treating an empty string as absent.
    pub fn text(&self) -> Option<&str> {
        self.query_string
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_parse_and_display() {
        let desc = SortSpec::parse("start:desc").unwrap();
        assert_eq!(desc, SortSpec::descending("start"));
        assert_eq!(desc.to_string(), "start:desc");

        let asc = SortSpec::parse("start").unwrap();
        assert_eq!(asc, SortSpec::ascending("start"));
        assert_eq!(asc.to_string(), "start");

        assert_eq!(SortSpec::parse("start:asc"), Some(SortSpec::ascending("start")));
        assert!(SortSpec::parse("").is_none());
        assert!(SortSpec::parse("start:sideways").is_none());
    }

    #[test]
    fn test_query_builder() {
        let query = SearchQuery::new("rust").doc_type("course_info").size(5).from(10);
        assert_eq!(query.text(), Some("rust"));
        assert_eq!(query.doc_type.as_deref(), Some("course_info"));
        assert_eq!(query.size, 5);
        assert_eq!(query.from, 10);

        assert_eq!(SearchQuery::new("   ").text(), None);
        assert_eq!(SearchQuery::default().size, 10);
    }
}
