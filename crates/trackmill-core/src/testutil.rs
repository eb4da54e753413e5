//! In-memory repository and fixture builders for engine tests

use crate::models::{Assignee, FieldValue, Fields, HistoryChange, Issue, Link};
use crate::repository::IssueRepository;
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

pub fn ymd(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

pub fn change(field: &str, value: &str, updated: DateTime<Utc>, updater: &str) -> HistoryChange {
    let mut fields = HashMap::new();
    fields.insert(field.to_string(), value.to_string());
    HistoryChange {
        fields,
        updated,
        updater: updater.to_string(),
    }
}

pub struct IssueBuilder {
    issue: Issue,
}

pub fn issue(id: &str) -> IssueBuilder {
    let project = id.split('-').next().unwrap_or(id).to_string();
    IssueBuilder {
        issue: Issue {
            id: id.to_string(),
            project,
            summary: format!("Summary of {id}"),
            assignee: None,
            created: ymd(2024, 1, 1),
            resolved: None,
            fields: Fields::new(),
            links: Vec::new(),
        },
    }
}

impl IssueBuilder {
    pub fn summary(mut self, summary: &str) -> Self {
        self.issue.summary = summary.to_string();
        self
    }

    pub fn assignee(mut self, login: &str) -> Self {
        self.issue.assignee = Some(Assignee {
            login: login.to_string(),
            full_name: None,
        });
        self
    }

    pub fn created(mut self, created: DateTime<Utc>) -> Self {
        self.issue.created = created;
        self
    }

    pub fn resolved(mut self, resolved: DateTime<Utc>) -> Self {
        self.issue.resolved = Some(resolved);
        self
    }

    pub fn field(mut self, name: &str, value: FieldValue) -> Self {
        self.issue.fields.insert(name, value);
        self
    }

    pub fn text_field(self, name: &str, value: &str) -> Self {
        self.field(name, FieldValue::Text(value.to_string()))
    }

    /// Adds a link marking this issue as a subtask of `parent_id`.
    pub fn subtask_of(mut self, parent_id: &str) -> Self {
        self.issue.links.push(Link {
            link_type: Link::SUBTASK.to_string(),
            source: parent_id.to_string(),
            target: self.issue.id.clone(),
        });
        self
    }

    pub fn link(mut self, link_type: &str, source: &str, target: &str) -> Self {
        self.issue.links.push(Link {
            link_type: link_type.to_string(),
            source: source.to_string(),
            target: target.to_string(),
        });
        self
    }

    pub fn build(self) -> Issue {
        self.issue
    }
}

/// In-memory `IssueRepository`. Filter queries return a fixed list;
/// single-issue lookups hit the `issues` map.
#[derive(Default)]
pub struct MockRepository {
    pub filter_results: Vec<Issue>,
    pub issues: HashMap<String, Issue>,
    pub histories: HashMap<String, Vec<HistoryChange>>,
    pub project_fields: HashMap<String, Vec<String>>,
    pub field_values: HashMap<(String, String), Vec<String>>,
    pub fail_updates: bool,
    pub history_fetches: Mutex<Vec<String>>,
    pub bundle_fetches: Mutex<Vec<String>>,
    pub updates: Mutex<Vec<(String, String, String)>>,
}

impl MockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_issues(issues: Vec<Issue>) -> Self {
        let mut repo = Self::default();
        for issue in &issues {
            repo.issues.insert(issue.id.clone(), issue.clone());
        }
        repo.filter_results = issues;
        repo
    }

    pub fn add_issue(&mut self, issue: Issue) {
        self.issues.insert(issue.id.clone(), issue);
    }

    pub fn add_history(&mut self, issue_id: &str, history: Vec<HistoryChange>) {
        self.histories.insert(issue_id.to_string(), history);
    }

    pub fn history_fetch_count(&self, issue_id: &str) -> usize {
        self.history_fetches
            .lock()
            .unwrap()
            .iter()
            .filter(|id| id.as_str() == issue_id)
            .count()
    }

    pub fn bundle_fetch_count(&self, project_id: &str) -> usize {
        self.bundle_fetches
            .lock()
            .unwrap()
            .iter()
            .filter(|id| id.as_str() == project_id)
            .count()
    }
}

#[async_trait]
impl IssueRepository for MockRepository {
    async fn get_issues_by_filter(&self, _query: &str, limit: usize) -> Result<Vec<Issue>> {
        Ok(self.filter_results.iter().take(limit).cloned().collect())
    }

    async fn get_issue(&self, id: &str) -> Result<Issue> {
        self.issues
            .get(id)
            .cloned()
            .ok_or_else(|| Error::Repository(format!("no such issue: {id}")))
    }

    async fn get_history(&self, issue_id: &str) -> Result<Vec<HistoryChange>> {
        self.history_fetches
            .lock()
            .unwrap()
            .push(issue_id.to_string());
        Ok(self.histories.get(issue_id).cloned().unwrap_or_default())
    }

    async fn update_field(&self, issue_id: &str, field: &str, value: &str) -> Result<bool> {
        if self.fail_updates {
            return Err(Error::Repository("update rejected".to_string()));
        }
        self.updates.lock().unwrap().push((
            issue_id.to_string(),
            field.to_string(),
            value.to_string(),
        ));
        Ok(true)
    }

    async fn has_project_field(&self, project_id: &str, field: &str) -> Result<bool> {
        Ok(self
            .project_fields
            .get(project_id)
            .map(|fields| fields.iter().any(|f| f == field))
            .unwrap_or(false))
    }

    async fn get_project_field_values(
        &self,
        project_id: &str,
        field: &str,
    ) -> Result<Vec<String>> {
        self.bundle_fetches
            .lock()
            .unwrap()
            .push(project_id.to_string());
        Ok(self
            .field_values
            .get(&(project_id.to_string(), field.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}
