//! Release changelog collection

use crate::hierarchy::HierarchyResolver;
use crate::models::fields::{CHANGELOG_ENTRY, FIX_VERSIONS};
use crate::models::{ChangelogEntry, Issue};
use crate::repository::{IssueRepository, DEFAULT_QUERY_LIMIT};
use crate::{Error, Result};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Issues tagged with this are deliberately kept out of the changelog.
pub const EXCLUDED_ENTRIES_TAG: &str = "not-released";

/// Builds the deduplicated issue-id -> changelog entry map for a project
/// and release, rolling entries up from subtask hierarchies. Owns the
/// per-run project fix-version cache.
pub struct ChangelogCollector<'a, R> {
    repo: &'a R,
    resolver: HierarchyResolver<'a, R>,
    project_versions: HashMap<String, Vec<String>>,
}

impl<'a, R: IssueRepository> ChangelogCollector<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self {
            repo,
            resolver: HierarchyResolver::new(repo),
            project_versions: HashMap::new(),
        }
    }

    /// Collects entries for a project, either for one named release or for
    /// everything scheduled into a real release. Keys are issue ids in
    /// first-seen order; each issue contributes at most one entry.
    pub async fn collect(
        &mut self,
        project_id: &str,
        fix_version: Option<&str>,
    ) -> Result<IndexMap<String, ChangelogEntry>> {
        let query = changelog_query(project_id, fix_version);
        tracing::debug!(%query, "collecting changelog entries");

        let issues = self
            .repo
            .get_issues_by_filter(&query, DEFAULT_QUERY_LIMIT)
            .await?;

        let mut entries = IndexMap::new();
        for issue in &issues {
            let fix_versions = issue.fields.fix_versions().cloned();
            let ancestor = self
                .resolver
                .find_ancestor_with_entry(issue, fix_versions.as_ref())
                .await
                .map_err(|err| Error::for_issue(&issue.id, err))?;

            if let Some(ancestor) = ancestor {
                self.add_entry(&mut entries, &ancestor).await?;
            }
            // the originating issue is attempted too; roll-up does not
            // replace the subtask's own note
            self.add_entry(&mut entries, issue).await?;
        }

        Ok(entries)
    }

    /// First write wins: an id already present contributes nothing. An
    /// issue without fix versions or with a blank (after trimming) message
    /// contributes nothing either.
    async fn add_entry(
        &self,
        entries: &mut IndexMap<String, ChangelogEntry>,
        issue: &Issue,
    ) -> Result<()> {
        if entries.contains_key(&issue.id) {
            return Ok(());
        }

        let type_parent = self
            .resolver
            .find_type_parent(issue, issue.fields.fix_versions())
            .await
            .map_err(|err| Error::for_issue(&issue.id, err))?;
        let entry_type = match &type_parent {
            Some(parent) => parent.fields.issue_type(),
            None => issue.fields.issue_type(),
        }
        .map(str::to_owned);

        let message = issue.fields.changelog_entry().unwrap_or_default();
        if issue.fields.has_fix_versions() && !message.trim().is_empty() {
            entries.insert(
                issue.id.clone(),
                ChangelogEntry {
                    entry_type,
                    message: message.to_string(),
                },
            );
        }

        Ok(())
    }

    /// Writes a changelog message back to an issue, first checking that the
    /// issue's project defines the field at all. Failures are reported as
    /// `false`, never propagated.
    pub async fn update_changelog(&self, issue_id: &str, message: &str) -> bool {
        match self.try_update_changelog(issue_id, message).await {
            Ok(updated) => updated,
            Err(err) => {
                tracing::warn!(issue = issue_id, error = %err, "changelog write-back failed");
                false
            }
        }
    }

    async fn try_update_changelog(&self, issue_id: &str, message: &str) -> Result<bool> {
        let issue = self.repo.get_issue(issue_id).await?;
        if !self
            .repo
            .has_project_field(&issue.project, CHANGELOG_ENTRY)
            .await?
        {
            return Ok(false);
        }
        self.repo
            .update_field(issue_id, CHANGELOG_ENTRY, message)
            .await
    }

    /// Release versions known to a project, from its fix-version value
    /// bundle. Bucket names like "Unscheduled" are dropped; results are
    /// cached per project for the run.
    pub async fn project_fix_versions(&mut self, project_id: &str) -> Result<Vec<String>> {
        if let Some(versions) = self.project_versions.get(project_id) {
            return Ok(versions.clone());
        }

        let values = self
            .repo
            .get_project_field_values(project_id, FIX_VERSIONS)
            .await?;
        let versions: Vec<String> = values.into_iter().filter(|v| is_release_version(v)).collect();

        self.project_versions
            .insert(project_id.to_string(), versions.clone());
        Ok(versions)
    }
}

/// A value reads as a release version when its leading dot-separated
/// components are numeric and at least one is positive ("4.5.2" yes,
/// "0.0.0" and "Unscheduled" no).
fn is_release_version(value: &str) -> bool {
    for part in value.trim().split('.').take(3) {
        match part.parse::<u64>() {
            Ok(n) if n > 0 => return true,
            Ok(_) => continue,
            Err(_) => return false,
        }
    }
    false
}

fn changelog_query(project_id: &str, fix_version: Option<&str>) -> String {
    let mut query = format!("project: {project_id}");
    query.push_str(" Changelog entry: -{no entry}, -{No changelog entry}");
    match fix_version {
        Some(version) => {
            query.push_str(" Fix versions: ");
            query.push_str(version);
        }
        None => query.push_str(" Fix versions: -Unscheduled, -Next, -Never, -Future"),
    }
    query.push_str(" State: Resolved");
    query.push_str(&format!(" Tag: -{{{EXCLUDED_ENTRIES_TAG}}}"));
    query
}
