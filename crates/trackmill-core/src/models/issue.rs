//! Issue snapshot data model

use crate::models::Fields;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single work item, as fetched from the tracker. Immutable for the
/// duration of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    /// Short name of the owning project, e.g. "WPML" for "WPML-123".
    pub project: String,
    pub summary: String,
    pub assignee: Option<Assignee>,
    pub created: DateTime<Utc>,
    pub resolved: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fields: Fields,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Issue {
    pub fn assignee_login(&self) -> Option<&str> {
        self.assignee.as_ref().map(|a| a.login.as_str())
    }

    /// Links that mark this issue as the subtask, in stored order.
    pub fn subtask_links(&self) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(|link| link.marks_subtask_of(&self.id))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignee {
    pub login: String,
    pub full_name: Option<String>,
}

/// A directed relationship between two issues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub link_type: String,
    pub source: String,
    pub target: String,
}

impl Link {
    pub const SUBTASK: &'static str = "Subtask";

    /// True when this link marks the given issue as a subtask of the
    /// link's source.
    pub fn marks_subtask_of(&self, issue_id: &str) -> bool {
        self.link_type == Self::SUBTASK && self.target == issue_id
    }
}

/// One audit event recorded against an issue, possibly touching several
/// fields at once. Sequences are ordered oldest to newest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryChange {
    pub fields: HashMap<String, String>,
    pub updated: DateTime<Utc>,
    pub updater: String,
}

impl HistoryChange {
    /// Whether this event set `field` to `value`.
    pub fn sets(&self, field: &str, value: &str) -> bool {
        self.fields.get(field).map(|v| v == value).unwrap_or(false)
    }
}
