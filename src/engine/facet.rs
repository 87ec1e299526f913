//! Term facets: per-field value counts returned alongside search results.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request for one facet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetSpec {
    /// Maximum number of terms to return; all terms when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
}

impl FacetSpec {
    /// A facet returning every term.
    pub fn unsized_terms() -> Self {
        Self::default()
    }

    /// A facet returning at most `size` terms.
    pub fn with_size(size: usize) -> Self {
        FacetSpec { size: Some(size) }
    }
}

/// Counts for one facet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacetResult {
    /// Number of documents that carried a value for the field.
    pub total: u64,
    /// Term counts, limited to the requested size.
    pub terms: BTreeMap<String, u64>,
    /// Sum of counts for terms cut by the size limit.
    pub other: u64,
}

/// Accumulates facet counts over matching documents.
#[derive(Debug)]
pub struct FacetCollector {
    /// Requested facets.
    specs: BTreeMap<String, FacetSpec>,
    /// Term counts per field.
    counts: AHashMap<String, AHashMap<String, u64>>,
    /// Documents with a value per field.
    totals: AHashMap<String, u64>,
}

impl FacetCollector {
    /// Create a new facet collector.
    pub fn new(specs: BTreeMap<String, FacetSpec>) -> Self {
        FacetCollector {
            specs,
            counts: AHashMap::new(),
            totals: AHashMap::new(),
        }
    }

    /// Add a document to the facet counts.
    pub fn collect_doc(&mut self, document: &Value) {
        for field in self.specs.keys() {
            let terms = facet_terms(document.get(field));
            if terms.is_empty() {
                continue;
            }
            *self.totals.entry(field.clone()).or_insert(0) += 1;
            let field_counts = self.counts.entry(field.clone()).or_default();
            for term in terms {
                *field_counts.entry(term).or_insert(0) += 1;
            }
        }
    }

    /// Finalize and return the collected facet counts.
    pub fn finalize(self) -> BTreeMap<String, FacetResult> {
        let mut results = BTreeMap::new();
        let mut counts = self.counts;

        for (field, spec) in self.specs {
            let mut terms: Vec<(String, u64)> = counts
                .remove(&field)
                .map(|c| c.into_iter().collect())
                .unwrap_or_default();

            // Highest count first, ties alphabetically.
            terms.sort_by(|a, b| match b.1.cmp(&a.1) {
                Ordering::Equal => a.0.cmp(&b.0),
                other => other,
            });

            let mut other = 0;
            if let Some(size) = spec.size {
                if terms.len() > size {
                    other = terms.drain(size..).map(|(_, count)| count).sum();
                }
            }

            results.insert(
                field.clone(),
                FacetResult {
                    total: self.totals.get(&field).copied().unwrap_or(0),
                    terms: terms.into_iter().collect(),
                    other,
                },
            );
        }

        results
    }
}

fn facet_terms(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().filter_map(term_string).collect(),
        Some(value) => term_string(value).into_iter().collect(),
    }
}

fn term_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
