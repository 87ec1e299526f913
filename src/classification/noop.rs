//! No-operation classifier.
//!
//! [`NoOpClassifier`] is the default when no classification backend is
//! configured: lookups report the capability as absent and enrichment
//! returns hits untouched.

use std::collections::HashSet;

use crate::classification::CourseClassifier;
use crate::engine::SearchHit;
use crate::error::Result;

/// A classifier that knows no classifications.
#[derive(Debug, Clone, Default)]
pub struct NoOpClassifier;

impl NoOpClassifier {
    /// Creates a new `NoOpClassifier`.
    pub fn new() -> Self {
        Self
    }
}

impl CourseClassifier for NoOpClassifier {
    fn courses_by_classification(
        &self,
        _classification_id: i64,
    ) -> Result<Option<HashSet<String>>> {
        Ok(None)
    }

    fn set_data_courses(&self, results: Vec<SearchHit>) -> Result<Vec<SearchHit>> {
        Ok(results)
    }
}
