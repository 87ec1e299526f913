//! Search settings.
//!
//! Every value has a default and can be overridden from a JSON file and then
//! from the environment.
//!
//! # Examples
//!
//! ```
//! use coursearch::config::SearchSettings;
//!
//! let settings = SearchSettings::default();
//! assert_eq!(settings.courseware_index_name, "courseware_index");
//! assert_eq!(settings.course_discovery_filter_fields(), ["org", "modes", "language"]);
//! assert_eq!(settings.course_discovery_facets().len(), 3);
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::FacetSpec;
use crate::error::{Result, SearchApiError};

/// Default index holding courseware and course documents.
pub const DEFAULT_INDEX_NAME: &str = "courseware_index";

/// Default filterable fields for course discovery.
pub const DEFAULT_FILTER_FIELDS: [&str; 3] = ["org", "modes", "language"];

/// Environment variable overriding the index name.
pub const ENV_INDEX_NAME: &str = "COURSEARCH_INDEX_NAME";

/// Environment variable overriding the discovery filter fields (comma-separated).
pub const ENV_DISCOVERY_FILTERS: &str = "COURSEARCH_DISCOVERY_FILTERS";

/// Configuration for the search layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Index searched by both entry points.
    pub courseware_index_name: String,
    /// Fields course discovery can filter and facet on.
    pub course_discovery_filters: Vec<String>,
    /// Explicit facet specification; derived from the filter fields when unset.
    pub course_discovery_facets: Option<BTreeMap<String, FacetSpec>>,
    /// Name of the configured engine backend, for diagnostics.
    pub search_engine: Option<String>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings {
            courseware_index_name: DEFAULT_INDEX_NAME.to_string(),
            course_discovery_filters: DEFAULT_FILTER_FIELDS
                .iter()
                .map(|f| f.to_string())
                .collect(),
            course_discovery_facets: None,
            search_engine: None,
        }
    }
}

impl SearchSettings {
    /// Load settings from a JSON file; missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let settings: SearchSettings = serde_json::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(self) -> Result<Self> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_env_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(index_name) = lookup(ENV_INDEX_NAME) {
            self.courseware_index_name = index_name.trim().to_string();
        }
        if let Some(filters) = lookup(ENV_DISCOVERY_FILTERS) {
            self.course_discovery_filters = filters
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string)
                .collect();
        }
        self.validate()?;
        Ok(self)
    }

    /// Check the settings for values that cannot work.
    pub fn validate(&self) -> Result<()> {
        if self.courseware_index_name.trim().is_empty() {
            return Err(SearchApiError::config("courseware_index_name is empty"));
        }
        Ok(())
    }

    /// Fields course discovery can filter on.
    pub fn course_discovery_filter_fields(&self) -> &[String] {
        &self.course_discovery_filters
    }

    /// Facets requested by course discovery.
    ///
    /// Defaults to one facet of unspecified size per filter field.
    pub fn course_discovery_facets(&self) -> BTreeMap<String, FacetSpec> {
        match &self.course_discovery_facets {
            Some(facets) => facets.clone(),
            None => self
                .course_discovery_filters
                .iter()
                .map(|field| (field.clone(), FacetSpec::unsized_terms()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let settings = SearchSettings::default();
        assert_eq!(settings.courseware_index_name, DEFAULT_INDEX_NAME);
        assert_eq!(settings.course_discovery_filter_fields(), DEFAULT_FILTER_FIELDS);

        let facets = settings.course_discovery_facets();
        assert_eq!(facets.len(), 3);
        assert!(facets.values().all(|spec| spec.size.is_none()));
    }

    #[test]
    fn test_from_file_partial() {
        let file = NamedTempFile::new().unwrap();
        fs::write(
            file.path(),
            r#"{"course_discovery_filters": ["org"], "course_discovery_facets": {"org": {"size": 5}}}"#,
        )
        .unwrap();

        let settings = SearchSettings::from_file(file.path()).unwrap();
        assert_eq!(settings.courseware_index_name, DEFAULT_INDEX_NAME);
        assert_eq!(settings.course_discovery_filter_fields(), ["org"]);
        assert_eq!(
            settings.course_discovery_facets()["org"],
            FacetSpec::with_size(5)
        );
    }

    #[test]
    fn test_from_file_rejects_empty_index() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), r#"{"courseware_index_name": " "}"#).unwrap();
        assert!(matches!(
            SearchSettings::from_file(file.path()),
            Err(SearchApiError::Config(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_INDEX_NAME, "staging_index"),
            (ENV_DISCOVERY_FILTERS, "org, language,,"),
        ]
        .into_iter()
        .collect();

        let settings = SearchSettings::default()
            .apply_env_from(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(settings.courseware_index_name, "staging_index");
        assert_eq!(settings.course_discovery_filter_fields(), ["org", "language"]);
    }
}
