//! The requesting user, as far as search access control is concerned.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A user issuing a search.
///
/// Anonymous requests pass `None` wherever a user is accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchUser {
    /// Login name, used for logging only.
    pub username: String,
    /// Staff users may see content from every course.
    #[serde(default)]
    pub is_staff: bool,
    /// Course identifiers the user is enrolled in.
    #[serde(default)]
    pub enrolled_courses: HashSet<String>,
}

impl SearchUser {
    /// Create a non-staff user with no enrollments.
    pub fn new<S: Into<String>>(username: S) -> Self {
        SearchUser {
            username: username.into(),
            ..Default::default()
        }
    }

    /// Mark the user as staff.
    pub fn staff(mut self, is_staff: bool) -> Self {
        self.is_staff = is_staff;
        self
    }

    /// Add a course enrollment.
    pub fn enrolled_in<S: Into<String>>(mut self, course_id: S) -> Self {
        self.enrolled_courses.insert(course_id.into());
        self
    }

    /// Check whether the user may view content of a course.
    pub fn can_view_course(&self, course_id: &str) -> bool {
        self.is_staff || self.enrolled_courses.contains(course_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_visibility() {
        let student = SearchUser::new("alice").enrolled_in("course-v1:edX+DemoX+2024");
        assert!(student.can_view_course("course-v1:edX+DemoX+2024"));
        assert!(!student.can_view_course("course-v1:MITx+6.00x+2024"));

        let staff = SearchUser::new("bob").staff(true);
        assert!(staff.can_view_course("course-v1:MITx+6.00x+2024"));
    }
}
