//! Classifier over a fixed set of classifications.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::classification::CourseClassifier;
use crate::engine::SearchHit;
use crate::error::{Result, SearchApiError};

/// Field written into enriched hits.
pub const CLASSIFICATIONS_FIELD: &str = "classifications";

/// A named group of courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Numeric identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Member course ids.
    #[serde(default)]
    pub course_ids: HashSet<String>,
}

/// A classifier holding its classifications in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticClassifier {
    classifications: BTreeMap<i64, Classification>,
}

impl StaticClassifier {
    /// Create a classifier from a list of classifications.
    pub fn new(classifications: Vec<Classification>) -> Self {
        StaticClassifier {
            classifications: classifications.into_iter().map(|c| (c.id, c)).collect(),
        }
    }

    /// Load classifications from a JSON array file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let classifications: Vec<Classification> = serde_json::from_str(&content)?;
        Ok(Self::new(classifications))
    }

    /// Classifications containing a course, ordered by id.
    pub fn classifications_of(&self, course_id: &str) -> Vec<&Classification> {
        self.classifications
            .values()
            .filter(|c| c.course_ids.contains(course_id))
            .collect()
    }
}

impl CourseClassifier for StaticClassifier {
    fn courses_by_classification(
        &self,
        classification_id: i64,
    ) -> Result<Option<HashSet<String>>> {
        self.classifications
            .get(&classification_id)
            .map(|c| Some(c.course_ids.clone()))
            .ok_or_else(|| {
                SearchApiError::classification(format!(
                    "classification {classification_id} does not exist"
                ))
            })
    }

    fn set_data_courses(&self, mut results: Vec<SearchHit>) -> Result<Vec<SearchHit>> {
        for hit in &mut results {
            let tags: Vec<Value> = self
                .classifications_of(&hit.id)
                .into_iter()
                .map(|c| json!({"id": c.id, "name": c.name}))
                .collect();
            if let Some(Value::Object(map)) = hit.data.as_mut() {
                map.insert(CLASSIFICATIONS_FIELD.to_string(), Value::Array(tags));
            }
        }
        Ok(results)
    }
}
