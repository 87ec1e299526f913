//! Date range constraints used by field and filter dictionaries.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Bound type for range constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bound<T> {
    /// Inclusive bound.
    Included(T),
    /// Exclusive bound.
    Excluded(T),
    /// Unbounded (no limit).
    Unbounded,
}

impl<T: PartialOrd> Bound<T> {
    /// Check if a value satisfies this bound as a lower bound.
    pub fn contains_lower(&self, value: &T) -> bool {
        match self {
            Bound::Included(bound) => value >= bound,
            Bound::Excluded(bound) => value > bound,
            Bound::Unbounded => true,
        }
    }

    /// Check if a value satisfies this bound as an upper bound.
    pub fn contains_upper(&self, value: &T) -> bool {
        match self {
            Bound::Included(bound) => value <= bound,
            Bound::Excluded(bound) => value < bound,
            Bound::Unbounded => true,
        }
    }

    /// Get the bound value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Bound::Included(bound) | Bound::Excluded(bound) => Some(bound),
            Bound::Unbounded => None,
        }
    }

    /// Check if this bound is unbounded.
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Bound::Unbounded)
    }
}

/// A range over UTC timestamps.
///
/// Each side is an independent [`Bound`], so the same type expresses the
/// half-open year window `[Jan 1, next Jan 1)`, the open-ended "still running"
/// window `[now, ∞)` and the "already over" window `(-∞, now]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Lower bound of the range.
    pub lower: Bound<DateTime<Utc>>,
    /// Upper bound of the range.
    pub upper: Bound<DateTime<Utc>>,
}

impl DateRange {
    /// Create a new date range with custom bound types.
    pub fn new(lower: Bound<DateTime<Utc>>, upper: Bound<DateTime<Utc>>) -> Self {
        DateRange { lower, upper }
    }

    /// Create the half-open range `[start, end)`.
    pub fn half_open(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::new(Bound::Included(start), Bound::Excluded(end))
    }

    /// Create the range `[start, ∞)`.
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self::new(Bound::Included(start), Bound::Unbounded)
    }

    /// Create the range `(-∞, end]`.
    pub fn ending_at(end: DateTime<Utc>) -> Self {
        Self::new(Bound::Unbounded, Bound::Included(end))
    }

    /// Create the range covering one calendar year, `[Jan 1 year, Jan 1 year+1)`.
    ///
    /// Returns `None` when either boundary is not representable.
    pub fn for_year(year: i32) -> Option<Self> {
        let start = Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single()?;
        let end = Utc
            .with_ymd_and_hms(year.checked_add(1)?, 1, 1, 0, 0, 0)
            .single()?;
        Some(Self::half_open(start, end))
    }

    /// Check if a timestamp falls inside this range.
    pub fn contains(&self, value: &DateTime<Utc>) -> bool {
        self.lower.contains_lower(value) && self.upper.contains_upper(value)
    }

    /// Check if a document value falls inside this range.
    ///
    /// Values that cannot be read as a timestamp never match.
    pub fn matches_value(&self, value: &Value) -> bool {
        parse_datetime(value).is_some_and(|dt| self.contains(&dt))
    }
}

/// Read a JSON value as a UTC timestamp.
///
/// Accepts RFC 3339 strings, naive `YYYY-MM-DDTHH:MM:SS` / `YYYY-MM-DD HH:MM:SS`
/// strings (taken as UTC), bare dates, and integer seconds since the epoch.
pub fn parse_datetime(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_datetime_str(s),
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)),
        _ => None,
    }
}

fn parse_datetime_str(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
