//! Custom field map attached to an issue

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Field names the engine gives meaning to.
pub const FIX_VERSIONS: &str = "Fix versions";
pub const CHANGELOG_ENTRY: &str = "Changelog entry";
pub const TYPE: &str = "Type";
pub const ESTIMATION: &str = "Estimation";
pub const START_DATE: &str = "Start Date";

/// A single custom field value as stored by the tracker.
///
/// Fix-version comparisons are exact structural equality on this type,
/// never set overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Date(DateTime<Utc>),
    List(Vec<String>),
    Text(String),
}

impl FieldValue {
    /// An empty text or an empty list carries no information; numbers and
    /// dates always do.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::List(values) => values.is_empty(),
            FieldValue::Number(_) | FieldValue::Date(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Date(date) => Some(*date),
            _ => None,
        }
    }
}

/// Named custom fields of an issue, with typed accessors for the keys the
/// engine reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fields(HashMap<String, FieldValue>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.0.insert(name.into(), value);
    }

    pub fn fix_versions(&self) -> Option<&FieldValue> {
        self.get(FIX_VERSIONS)
    }

    /// Whether the issue is associated with at least one release.
    pub fn has_fix_versions(&self) -> bool {
        self.fix_versions().map(|v| !v.is_empty()).unwrap_or(false)
    }

    pub fn changelog_entry(&self) -> Option<&str> {
        self.get(CHANGELOG_ENTRY).and_then(FieldValue::as_text)
    }

    pub fn has_changelog_entry(&self) -> bool {
        self.changelog_entry().map(|e| !e.is_empty()).unwrap_or(false)
    }

    pub fn issue_type(&self) -> Option<&str> {
        self.get(TYPE).and_then(FieldValue::as_text)
    }

    /// Remaining effort estimate, in tracker minutes.
    pub fn estimation_minutes(&self) -> Option<f64> {
        self.get(ESTIMATION).and_then(FieldValue::as_number)
    }

    /// The self-reported "Start Date" field, when one is set.
    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        self.get(START_DATE).and_then(FieldValue::as_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_emptiness() {
        assert!(FieldValue::Text(String::new()).is_empty());
        assert!(FieldValue::List(Vec::new()).is_empty());
        assert!(!FieldValue::Text("4.5.2".to_string()).is_empty());
        assert!(!FieldValue::List(vec!["4.5.2".to_string()]).is_empty());
        assert!(!FieldValue::Number(0.0).is_empty());
    }

    #[test]
    fn test_typed_accessors() {
        let mut fields = Fields::new();
        fields.insert(FIX_VERSIONS, FieldValue::List(vec!["4.5.2".to_string()]));
        fields.insert(CHANGELOG_ENTRY, FieldValue::Text("Fixed a crash".to_string()));
        fields.insert(TYPE, FieldValue::Text("Bug".to_string()));
        fields.insert(ESTIMATION, FieldValue::Number(960.0));
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        fields.insert(START_DATE, FieldValue::Date(start));

        assert!(fields.has_fix_versions());
        assert_eq!(fields.changelog_entry(), Some("Fixed a crash"));
        assert_eq!(fields.issue_type(), Some("Bug"));
        assert_eq!(fields.estimation_minutes(), Some(960.0));
        assert_eq!(fields.start_date(), Some(start));
    }

    #[test]
    fn test_absent_fields_read_as_none() {
        let fields = Fields::new();
        assert!(!fields.has_fix_versions());
        assert!(!fields.has_changelog_entry());
        assert_eq!(fields.issue_type(), None);
        assert_eq!(fields.estimation_minutes(), None);
        assert_eq!(fields.start_date(), None);
    }

    #[test]
    fn test_fix_version_equality_is_exact() {
        let stored = FieldValue::List(vec!["4.5.2".to_string(), "4.6.0".to_string()]);
        let overlap = FieldValue::List(vec!["4.5.2".to_string()]);
        assert_ne!(stored, overlap);
        assert_eq!(stored, stored.clone());
    }
}
