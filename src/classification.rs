//! Optional course classification capability.
//!
//! Discovery search can narrow results to one classification and decorate
//! hits with the classifications they belong to. Both steps are best effort:
//! the search layer logs classifier errors and carries on without the step.
//! Deployments without classification support use [`NoOpClassifier`].

pub mod noop;
pub mod static_map;

pub use self::noop::NoOpClassifier;
pub use self::static_map::{Classification, StaticClassifier};

use std::collections::HashSet;
use std::fmt::Debug;

use crate::engine::SearchHit;
use crate::error::Result;

/// Lookup and enrichment of course classifications.
pub trait CourseClassifier: Send + Sync + Debug {
    /// Course ids belonging to a classification.
    ///
    /// `Ok(None)` means the capability is absent and no filter applies.
    fn courses_by_classification(&self, classification_id: i64)
    -> Result<Option<HashSet<String>>>;

    /// Attach classification data to discovery hits.
    fn set_data_courses(&self, results: Vec<SearchHit>) -> Result<Vec<SearchHit>>;
}
