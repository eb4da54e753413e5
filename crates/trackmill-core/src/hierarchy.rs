//! Subtask-hierarchy walk for changelog roll-up

use crate::models::{FieldValue, Issue};
use crate::repository::IssueRepository;
use crate::Result;
use futures::future::BoxFuture;
use std::collections::HashSet;

/// Walks "Subtask" links upwards to find the ancestor whose changelog text
/// counts for a given descendant.
pub struct HierarchyResolver<'a, R> {
    repo: &'a R,
}

impl<'a, R: IssueRepository> HierarchyResolver<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Nearest ancestor that matches `fix_versions` and carries a non-empty
    /// changelog entry, searching depth-first along subtask links in stored
    /// order. The first satisfying path wins; `None` is the normal outcome
    /// for an issue with no links or no matching ancestors.
    pub async fn find_ancestor_with_entry(
        &self,
        issue: &Issue,
        fix_versions: Option<&FieldValue>,
    ) -> Result<Option<Issue>> {
        let mut visited = HashSet::new();
        visited.insert(issue.id.clone());
        self.ascend(issue, fix_versions, &mut visited).await
    }

    // Recursion is boxed; the visited set keeps cyclic link data from
    // looping forever.
    fn ascend<'f>(
        &'f self,
        issue: &'f Issue,
        fix_versions: Option<&'f FieldValue>,
        visited: &'f mut HashSet<String>,
    ) -> BoxFuture<'f, Result<Option<Issue>>> {
        Box::pin(async move {
            for link in issue.subtask_links() {
                let parent = self.repo.get_issue(&link.source).await?;
                if parent.fields.fix_versions() != fix_versions {
                    continue;
                }
                if parent.fields.has_changelog_entry() {
                    return Ok(Some(parent));
                }
                if visited.insert(parent.id.clone()) {
                    if let Some(ancestor) = self.ascend(&parent, fix_versions, visited).await? {
                        return Ok(Some(ancestor));
                    }
                }
            }
            Ok(None)
        })
    }

    /// One hop only: the first subtask parent whose fix versions match,
    /// regardless of whether it carries a changelog entry. Used to inherit
    /// the "Type" label for an entry.
    pub async fn find_type_parent(
        &self,
        issue: &Issue,
        fix_versions: Option<&FieldValue>,
    ) -> Result<Option<Issue>> {
        for link in issue.subtask_links() {
            let parent = self.repo.get_issue(&link.source).await?;
            if parent.fields.fix_versions() == fix_versions {
                return Ok(Some(parent));
            }
        }
        Ok(None)
    }
}
