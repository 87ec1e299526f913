//! Per-hit post-processing and access control.
//!
//! Every hit returned by the engine for a courseware search goes through a
//! [`SearchResultProcessor`]. The processor either returns the (possibly
//! enriched) document data, or `None` to deny the hit to the viewer.

pub mod excerpt;

pub use self::excerpt::*;

use std::fmt::Debug;

use serde_json::Value;

use crate::error::Result;
use crate::filter::COURSE_FIELD;
use crate::user::SearchUser;

/// Shapes or redacts a single hit for the requesting user.
pub trait SearchResultProcessor: Send + Sync + Debug {
    /// Process one hit's data; `None` denies the hit.
    fn process_result(
        &self,
        data: Value,
        search_term: &str,
        user: Option<&SearchUser>,
    ) -> Result<Option<Value>>;
}

/// The stock result processor.
///
/// Denies hits flagged `hidden` and hits from courses a known user cannot
/// view. Surviving hits get an `excerpt` with highlighted terms taken from
/// their `content`, and a `url` when both `course` and `id` are present.
#[derive(Debug, Clone, Default)]
pub struct DefaultResultProcessor {
    excerpt_config: ExcerptConfig,
}

impl DefaultResultProcessor {
    /// Create a processor with the default excerpt configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the excerpt configuration.
    pub fn with_excerpt_config(mut self, excerpt_config: ExcerptConfig) -> Self {
        self.excerpt_config = excerpt_config;
        self
    }

    fn should_remove(&self, data: &Value, user: Option<&SearchUser>) -> bool {
        if data.get("hidden").and_then(Value::as_bool).unwrap_or(false) {
            return true;
        }
        match (user, data.get(COURSE_FIELD).and_then(Value::as_str)) {
            (Some(user), Some(course_id)) => !user.can_view_course(course_id),
            _ => false,
        }
    }
}

impl SearchResultProcessor for DefaultResultProcessor {
    fn process_result(
        &self,
        mut data: Value,
        search_term: &str,
        user: Option<&SearchUser>,
    ) -> Result<Option<Value>> {
        if self.should_remove(&data, user) {
            return Ok(None);
        }

        let excerpt = {
            let mut texts = Vec::new();
            if let Some(content) = data.get("content") {
                content_strings(content, &mut texts);
            }
            ExcerptBuilder::new(search_term, self.excerpt_config.clone())?.excerpt(texts)
        };
        let url = match (
            data.get(COURSE_FIELD).and_then(Value::as_str),
            data.get("id").and_then(Value::as_str),
        ) {
            (Some(course), Some(id)) => Some(format!("/courses/{course}/jump_to/{id}")),
            _ => None,
        };

        if let Value::Object(map) = &mut data {
            if let Some(excerpt) = excerpt {
                map.insert("excerpt".to_string(), Value::String(excerpt));
            }
            if let Some(url) = url {
                map.entry("url").or_insert(Value::String(url));
            }
        }

        Ok(Some(data))
    }
}

fn content_strings<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::String(s) => out.push(s),
        Value::Array(items) => items.iter().for_each(|item| content_strings(item, out)),
        Value::Object(map) => map.values().for_each(|item| content_strings(item, out)),
        _ => {}
    }
}
