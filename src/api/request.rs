//! Request types for the two search entry points.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::engine::SortSpec;
use crate::filter::{DateRange, FilterDictionary, FilterValue};
use crate::user::SearchUser;

/// Field holding a course's start date in course documents.
pub const START_FIELD: &str = "start";

/// Field holding a course's end date in course documents.
pub const END_FIELD: &str = "end";

/// Result ordering for course discovery.
///
/// Deserializes through [`OrderBy::from_flag`], so unknown flags mean relevance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum OrderBy {
    /// Engine relevance order; no explicit sort.
    #[default]
    Relevance,
    /// Most recent start date first.
    Newer,
    /// Oldest start date first.
    Older,
}

impl OrderBy {
    /// Map a free-form flag; anything other than `newer`/`older` is relevance.
    pub fn from_flag(flag: &str) -> Self {
        match flag {
            "newer" => OrderBy::Newer,
            "older" => OrderBy::Older,
            _ => OrderBy::Relevance,
        }
    }

    /// The sort this ordering asks of the engine.
    pub fn sort(&self) -> Option<SortSpec> {
        match self {
            OrderBy::Relevance => None,
            OrderBy::Newer => Some(SortSpec::descending(START_FIELD)),
            OrderBy::Older => Some(SortSpec::ascending(START_FIELD)),
        }
    }
}

impl From<&str> for OrderBy {
    fn from(flag: &str) -> Self {
        OrderBy::from_flag(flag)
    }
}

impl From<String> for OrderBy {
    fn from(flag: String) -> Self {
        OrderBy::from_flag(&flag)
    }
}

/// Course run state for course discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseState {
    /// Courses that have not ended yet.
    Active,
    /// Courses that have ended.
    Finished,
}

impl CourseState {
    /// Map a free-form flag; unrecognized values yield `None`.
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "active" => Some(CourseState::Active),
            "finished" => Some(CourseState::Finished),
            _ => None,
        }
    }

    /// Deserialize an optional state flag; unknown flags yield `None`.
    fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<Self>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let flag: Option<String> = Option::deserialize(deserializer)?;
        Ok(flag.as_deref().and_then(CourseState::from_flag))
    }

    /// Constraint on the course end date at time `now`.
    pub fn end_range(&self, now: DateTime<Utc>) -> DateRange {
        match self {
            CourseState::Active => DateRange::starting_at(now),
            CourseState::Finished => DateRange::ending_at(now),
        }
    }
}

/// A courseware content search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Text to search for.
    pub search_term: String,
    /// Requesting user; `None` for anonymous.
    pub user: Option<SearchUser>,
    /// Maximum number of hits to return.
    pub size: usize,
    /// Number of hits to skip.
    pub from: usize,
    /// Restrict to a single course.
    pub course_id: Option<String>,
}

impl SearchRequest {
    /// Create a request with default pagination (10 hits from offset 0).
    pub fn new<S: Into<String>>(search_term: S) -> Self {
        SearchRequest {
            search_term: search_term.into(),
            user: None,
            size: 10,
            from: 0,
            course_id: None,
        }
    }

    /// Set the requesting user.
    pub fn user(mut self, user: SearchUser) -> Self {
        self.user = Some(user);
        self
    }

    /// Set the maximum number of hits.
    pub fn size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Set the pagination offset.
    pub fn from(mut self, from: usize) -> Self {
        self.from = from;
        self
    }

    /// Restrict the search to a course.
    pub fn course_id<S: Into<String>>(mut self, course_id: S) -> Self {
        self.course_id = Some(course_id.into());
        self
    }
}

/// A course discovery search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryRequest {
    /// Text to search for; `None` lists everything.
    pub search_term: Option<String>,
    /// Maximum number of hits to return.
    pub size: usize,
    /// Number of hits to skip.
    pub from: usize,
    /// Caller-supplied field constraints, overlaid on the generated ones.
    pub field_dictionary: FilterDictionary,
    /// Result ordering.
    pub order_by: OrderBy,
    /// Start year, applied only when it is a numeric string.
    pub year: Option<String>,
    /// Course run state.
    #[serde(deserialize_with = "CourseState::deserialize_flag")]
    pub state: Option<CourseState>,
    /// Classification id, as given by the caller.
    pub classification: Option<String>,
}

impl Default for DiscoveryRequest {
    fn default() -> Self {
        DiscoveryRequest {
            search_term: None,
            size: 20,
            from: 0,
            field_dictionary: FilterDictionary::new(),
            order_by: OrderBy::Relevance,
            year: None,
            state: None,
            classification: None,
        }
    }
}

impl DiscoveryRequest {
    /// Create a request with default pagination (20 hits from offset 0).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search text.
    pub fn search_term<S: Into<String>>(mut self, search_term: S) -> Self {
        self.search_term = Some(search_term.into());
        self
    }

    /// Set the maximum number of hits.
    pub fn size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Set the pagination offset.
    pub fn from(mut self, from: usize) -> Self {
        self.from = from;
        self
    }

    /// Add a caller-supplied field constraint.
    pub fn field<K: Into<String>, V: Into<FilterValue>>(mut self, field: K, value: V) -> Self {
        self.field_dictionary.insert(field.into(), value.into());
        self
    }

    /// Set the ordering.
    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = order_by;
        self
    }

    /// Set the start year.
    pub fn year<S: Into<String>>(mut self, year: S) -> Self {
        self.year = Some(year.into());
        self
    }

    /// Set the course run state.
    pub fn state(mut self, state: CourseState) -> Self {
        self.state = Some(state);
        self
    }

    /// Set the classification id.
    pub fn classification<S: Into<String>>(mut self, classification: S) -> Self {
        self.classification = Some(classification.into());
        self
    }

    /// The start-date window for the requested year, if the year is numeric.
    pub fn year_range(&self) -> Option<DateRange> {
        let year = self.year.as_deref()?;
        if year.is_empty() || !year.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        DateRange::for_year(year.parse().ok()?)
    }
}
