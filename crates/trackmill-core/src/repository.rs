//! Abstraction over the remote issue tracker

use crate::models::{HistoryChange, Issue};
use crate::Result;
use async_trait::async_trait;

/// Default cap on filter query results, matching the tracker's own page
/// ceiling.
pub const DEFAULT_QUERY_LIMIT: usize = 1000;

/// Read (and, for the changelog write-back, write) access to the issue
/// tracker. Calls are awaited one at a time with no internal retry or
/// timeout; read failures propagate and abort the run.
#[async_trait]
pub trait IssueRepository: Send + Sync {
    async fn get_issues_by_filter(&self, query: &str, limit: usize) -> Result<Vec<Issue>>;

    async fn get_issue(&self, id: &str) -> Result<Issue>;

    /// Ordered audit trail of an issue, oldest first.
    async fn get_history(&self, issue_id: &str) -> Result<Vec<HistoryChange>>;

    /// Set a custom field. Used only by the changelog write-back path.
    async fn update_field(&self, issue_id: &str, field: &str, value: &str) -> Result<bool>;

    /// Whether the project defines the given custom field.
    async fn has_project_field(&self, project_id: &str, field: &str) -> Result<bool>;

    /// Raw value bundle behind a project custom field.
    async fn get_project_field_values(&self, project_id: &str, field: &str)
        -> Result<Vec<String>>;
}
