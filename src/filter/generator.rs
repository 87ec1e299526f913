//! Generation of the per-request field, filter and exclude dictionaries.

use std::fmt::Debug;

use chrono::Utc;

use crate::error::Result;
use crate::filter::dictionary::{FieldFilters, FilterValue};
use crate::filter::range::DateRange;
use crate::user::SearchUser;

/// Field holding the course identifier of courseware documents.
pub const COURSE_FIELD: &str = "course";

/// Field holding the date from which a document may be shown.
pub const START_DATE_FIELD: &str = "start_date";

/// Produces the dictionaries that restrict a search to what the caller may see.
pub trait SearchFilterGenerator: Send + Sync + Debug {
    /// Build field, filter and exclude dictionaries for a user and optional course.
    fn generate_field_filters(
        &self,
        user: Option<&SearchUser>,
        course_id: Option<&str>,
    ) -> Result<FieldFilters>;
}

/// The stock filter generator.
///
/// - With a course id, hits are restricted to that course.
/// - Without a course id but with a non-staff user, hits are restricted to
///   the courses the user is enrolled in.
/// - Documents whose `start_date` lies in the future are filtered out.
/// - Nothing is excluded.
#[derive(Debug, Clone, Default)]
pub struct DefaultFilterGenerator;

impl DefaultFilterGenerator {
    /// Creates a new `DefaultFilterGenerator`.
    pub fn new() -> Self {
        Self
    }
}

impl SearchFilterGenerator for DefaultFilterGenerator {
    fn generate_field_filters(
        &self,
        user: Option<&SearchUser>,
        course_id: Option<&str>,
    ) -> Result<FieldFilters> {
        let mut filters = FieldFilters::new();

        match (course_id.filter(|id| !id.is_empty()), user) {
            (Some(course_id), _) => {
                filters
                    .field_dictionary
                    .insert(COURSE_FIELD.to_string(), FilterValue::from(course_id));
            }
            (None, Some(user)) if !user.is_staff => {
                let mut enrolled: Vec<&String> = user.enrolled_courses.iter().collect();
                enrolled.sort();
                filters.field_dictionary.insert(
                    COURSE_FIELD.to_string(),
                    FilterValue::list(enrolled.into_iter().cloned()),
                );
            }
            _ => {}
        }

        filters.filter_dictionary.insert(
            START_DATE_FIELD.to_string(),
            DateRange::ending_at(Utc::now()).into(),
        );

        Ok(filters)
    }
}
