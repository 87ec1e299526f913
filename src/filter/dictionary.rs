//! Field, filter and exclude dictionaries.
//!
//! A dictionary maps a document field name to a [`FilterValue`]. The three
//! dictionaries that travel with every query differ only in how a document
//! is judged against them:
//!
//! - **field dictionary**: every entry must match; a missing field fails.
//! - **filter dictionary**: an entry must match when the field is present;
//!   documents without the field pass.
//! - **exclude dictionary**: a document matching any entry is dropped.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::filter::range::DateRange;

/// Name of the pseudo-field that addresses the document identifier.
pub const ID_FIELD: &str = "_id";

/// A single constraint on a document field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Any of the listed values.
    List(Vec<Value>),
    /// A timestamp range.
    Range(DateRange),
    /// Exactly this value.
    Value(Value),
}

impl FilterValue {
    /// Build a list constraint from anything that converts into strings.
    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterValue::List(values.into_iter().map(|v| Value::String(v.into())).collect())
    }

    /// Check if a document value satisfies this constraint.
    ///
    /// An array document value matches if any of its elements matches.
    pub fn matches(&self, candidate: &Value) -> bool {
        if let Value::Array(items) = candidate {
            return items.iter().any(|item| self.matches_scalar(item));
        }
        self.matches_scalar(candidate)
    }

    fn matches_scalar(&self, candidate: &Value) -> bool {
        match self {
            FilterValue::Value(expected) => values_equal(expected, candidate),
            FilterValue::List(expected) => expected.iter().any(|e| values_equal(e, candidate)),
            FilterValue::Range(range) => range.matches_value(candidate),
        }
    }

    /// Append string values to a list constraint.
    ///
    /// A scalar constraint is promoted to a list holding the old value.
    pub fn extend<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let extra = values.into_iter().map(|v| Value::String(v.into()));
        match self {
            FilterValue::List(items) => items.extend(extra),
            FilterValue::Value(value) => {
                let mut items = vec![value.take()];
                items.extend(extra);
                *self = FilterValue::List(items);
            }
            FilterValue::Range(_) => {
                *self = FilterValue::List(extra.collect());
            }
        }
    }

    /// Get the list items if this is a list constraint.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            FilterValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get the range if this is a range constraint.
    pub fn as_range(&self) -> Option<&DateRange> {
        match self {
            FilterValue::Range(range) => Some(range),
            _ => None,
        }
    }
}

// Strings and numbers compare loosely so that "2024" matches 2024.
fn values_equal(expected: &Value, candidate: &Value) -> bool {
    match (expected, candidate) {
        (Value::String(a), Value::Number(b)) | (Value::Number(b), Value::String(a)) => {
            a == &b.to_string()
        }
        _ => expected == candidate,
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Value(Value::String(value.to_string()))
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Value(Value::String(value))
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Value(Value::Bool(value))
    }
}

impl From<Value> for FilterValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => FilterValue::List(items),
            other => FilterValue::Value(other),
        }
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(values: Vec<String>) -> Self {
        FilterValue::list(values)
    }
}

impl From<DateRange> for FilterValue {
    fn from(range: DateRange) -> Self {
        FilterValue::Range(range)
    }
}

/// Mapping of field names to constraints.
pub type FilterDictionary = BTreeMap<String, FilterValue>;

/// The three dictionaries that accompany a search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldFilters {
    /// Constraints every hit must satisfy.
    pub field_dictionary: FilterDictionary,
    /// Constraints applied only where the field exists.
    pub filter_dictionary: FilterDictionary,
    /// Constraints that remove hits.
    pub exclude_dictionary: FilterDictionary,
}

impl FieldFilters {
    /// Create empty filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check a document against all three dictionaries.
    ///
    /// `id` is the document identifier and answers lookups on [`ID_FIELD`].
    pub fn accepts(&self, id: &str, document: &Value) -> bool {
        let id_value = Value::String(id.to_string());
        let lookup = |field: &str| field_value(&id_value, document, field);

        let fields_ok = self
            .field_dictionary
            .iter()
            .all(|(field, constraint)| lookup(field).is_some_and(|v| constraint.matches(v)));
        if !fields_ok {
            return false;
        }

        let filters_ok = self
            .filter_dictionary
            .iter()
            .all(|(field, constraint)| lookup(field).is_none_or(|v| constraint.matches(v)));
        if !filters_ok {
            return false;
        }

        !self
            .exclude_dictionary
            .iter()
            .any(|(field, constraint)| lookup(field).is_some_and(|v| constraint.matches(v)))
    }
}

fn field_value<'a>(id_value: &'a Value, document: &'a Value, field: &str) -> Option<&'a Value> {
    if field == ID_FIELD {
        Some(id_value)
    } else {
        document.get(field).filter(|v| !v.is_null())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_scalar_and_list_matching() {
        let value = FilterValue::from("edX");
        assert!(value.matches(&json!("edX")));
        assert!(!value.matches(&json!("MITx")));
        assert!(value.matches(&json!(["MITx", "edX"])));

        let list = FilterValue::list(["a", "b"]);
        assert!(list.matches(&json!("b")));
        assert!(!list.matches(&json!("c")));

        assert!(FilterValue::from("2024").matches(&json!(2024)));
        assert!(FilterValue::from(true).matches(&json!(true)));
    }

    #[test]
    fn test_extend_promotes_scalar() {
        let mut value = FilterValue::from("a");
        value.extend(["b", "c"]);
        assert_eq!(value.as_list().unwrap().len(), 3);

        let mut list = FilterValue::list(Vec::<String>::new());
        list.extend(vec!["x".to_string()]);
        assert_eq!(list.as_list().unwrap(), &[json!("x")]);
    }

    #[test]
    fn test_from_json_array_is_list() {
        let value = FilterValue::from(json!(["a", "b"]));
        assert!(value.as_list().is_some());
    }

    #[test]
    fn test_field_dictionary_requires_field() {
        let mut filters = FieldFilters::new();
        filters
            .field_dictionary
            .insert("org".to_string(), FilterValue::from("edX"));

        assert!(filters.accepts("1", &json!({"org": "edX"})));
        assert!(!filters.accepts("1", &json!({"org": "MITx"})));
        assert!(!filters.accepts("1", &json!({})));
    }

    #[test]
    fn test_filter_dictionary_skips_missing_field() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let mut filters = FieldFilters::new();
        filters
            .filter_dictionary
            .insert("start_date".to_string(), DateRange::ending_at(now).into());

        assert!(filters.accepts("1", &json!({})));
        assert!(filters.accepts("1", &json!({"start_date": null})));
        assert!(filters.accepts("1", &json!({"start_date": "2024-01-01"})));
        assert!(!filters.accepts("1", &json!({"start_date": "2025-01-01"})));
    }

    #[test]
    fn test_exclude_dictionary_by_id() {
        let mut filters = FieldFilters::new();
        filters
            .exclude_dictionary
            .insert(ID_FIELD.to_string(), FilterValue::list(["hidden"]));

        assert!(!filters.accepts("hidden", &json!({})));
        assert!(filters.accepts("visible", &json!({})));
    }

    #[test]
    fn test_serialize_untagged() {
        let value = FilterValue::list(["a"]);
        assert_eq!(serde_json::to_value(&value).unwrap(), json!(["a"]));
        let value = FilterValue::from("a");
        assert_eq!(serde_json::to_value(&value).unwrap(), json!("a"));
    }
}
