//! Per-issue memoization of the audit trail

use crate::models::{HistoryChange, Issue};
use crate::repository::IssueRepository;
use crate::Result;
use std::collections::HashMap;

/// Caches each issue's ordered history on first access. Callers evict an
/// issue's entry once its processing completes so a scan over thousands of
/// issues stays bounded. Private per run, never shared.
#[derive(Debug, Default)]
pub struct HistoryCache {
    changes: HashMap<String, Vec<HistoryChange>>,
}

impl HistoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The issue's audit trail, fetched once and served from the cache
    /// afterwards.
    pub async fn history<R: IssueRepository>(
        &mut self,
        repo: &R,
        issue: &Issue,
    ) -> Result<&[HistoryChange]> {
        if !self.changes.contains_key(&issue.id) {
            let history = repo.get_history(&issue.id).await?;
            self.changes.insert(issue.id.clone(), history);
        }
        Ok(self
            .changes
            .get(&issue.id)
            .map(Vec::as_slice)
            .unwrap_or_default())
    }

    pub fn evict(&mut self, issue_id: &str) {
        self.changes.remove(issue_id);
    }

    pub fn contains(&self, issue_id: &str) -> bool {
        self.changes.contains_key(issue_id)
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
