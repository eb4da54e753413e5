//! Start-date reconstruction from the audit trail

use crate::history::HistoryCache;
use crate::models::Issue;
use crate::repository::IssueRepository;
use crate::Result;
use chrono::{DateTime, Utc};

const STATE_FIELD: &str = "State";
const ASSIGNEE_FIELD: &str = "Assignee";
const STATE_IN_PROGRESS: &str = "In Progress";
const STATE_OPEN: &str = "Open";

/// Infers when work on an issue actually started. The rules run in a fixed
/// order, from audit-trail evidence down to the creation timestamp; history
/// scans take the first match in stored (oldest-first) order.
#[derive(Debug, Default)]
pub struct TimelineReconstructor {
    cache: HistoryCache,
}

impl TimelineReconstructor {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn resolve_start_date<R: IssueRepository>(
        &mut self,
        repo: &R,
        issue: &Issue,
    ) -> Result<DateTime<Utc>> {
        let history = self.cache.history(repo, issue).await?;

        if let Some(change) = history
            .iter()
            .find(|c| c.sets(STATE_FIELD, STATE_IN_PROGRESS))
        {
            return Ok(change.updated);
        }

        // the self-reported field is less reliable than the recorded state
        // transition, so it only fills in when no transition exists
        if let Some(start) = issue.fields.start_date() {
            return Ok(start);
        }

        if let Some(login) = issue.assignee_login() {
            if let Some(change) = history
                .iter()
                .find(|c| c.sets(STATE_FIELD, STATE_OPEN) && c.updater == login)
            {
                return Ok(change.updated);
            }
            if let Some(change) = history
                .iter()
                .find(|c| c.sets(ASSIGNEE_FIELD, login) && c.updater == login)
            {
                return Ok(change.updated);
            }
        }

        Ok(issue.created)
    }

    /// Drops the issue's cached history once its processing completes.
    pub fn finish_issue(&mut self, issue: &Issue) {
        self.cache.evict(&issue.id);
    }

    pub fn is_cached(&self, issue_id: &str) -> bool {
        self.cache.contains(issue_id)
    }
}
