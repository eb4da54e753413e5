//! Activity report aggregation run

use crate::models::{Issue, ReportRow};
use crate::quota::AssigneeQuota;
use crate::report::ReportEmitter;
use crate::repository::{IssueRepository, DEFAULT_QUERY_LIMIT};
use crate::timeline::TimelineReconstructor;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

const MINUTES_IN_HOUR: f64 = 60.0;
const HOURS_IN_WORK_DAY: f64 = 8.0;

#[derive(Debug, Clone)]
pub struct ActivityConfig {
    /// Filter query sent to the tracker.
    pub filter: String,
    /// Base URL used to build per-issue links.
    pub base_url: String,
    pub limit: usize,
    pub limit_per_assignee: Option<u32>,
    pub output_file: Option<PathBuf>,
    pub overwrite_file: bool,
}

impl ActivityConfig {
    pub fn new(filter: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            base_url: base_url.into(),
            limit: DEFAULT_QUERY_LIMIT,
            limit_per_assignee: None,
            output_file: None,
            overwrite_file: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivitySummary {
    /// Issues returned by the query.
    pub total: usize,
    /// Rows that passed the quota and were emitted.
    pub emitted: usize,
}

/// One aggregation run. Owns all mutable run state (quota counters, the
/// history cache inside the timeline, the emitter); a fresh instance is
/// built per invocation.
pub struct ActivityReport {
    config: ActivityConfig,
    quota: AssigneeQuota,
    timeline: TimelineReconstructor,
    emitter: ReportEmitter,
}

impl ActivityReport {
    pub fn new(config: ActivityConfig) -> Self {
        let quota = AssigneeQuota::new(config.limit_per_assignee);
        let emitter = ReportEmitter::new(config.output_file.clone(), config.overwrite_file);
        Self {
            config,
            quota,
            timeline: TimelineReconstructor::new(),
            emitter,
        }
    }

    /// Fetches the configured query result and feeds it, one issue at a
    /// time, through quota -> timeline -> projection -> emission, evicting
    /// each issue's history cache entry afterwards. The observer fires for
    /// every issue, admitted or not, so progress display keeps advancing
    /// past suppressed rows.
    pub async fn run<R, F>(&mut self, repo: &R, mut observer: F) -> Result<ActivitySummary>
    where
        R: IssueRepository,
        F: FnMut(usize, usize, &Issue),
    {
        let issues = repo
            .get_issues_by_filter(&self.config.filter, self.config.limit)
            .await?;
        tracing::info!(count = issues.len(), filter = %self.config.filter, "fetched issues");

        if issues.is_empty() {
            return Ok(ActivitySummary {
                total: 0,
                emitted: 0,
            });
        }

        self.emitter.init()?;

        let total = issues.len();
        for (index, issue) in issues.iter().enumerate() {
            observer(index, total, issue);

            if !self.quota.admit(issue.assignee_login()) {
                continue;
            }

            let row = self
                .project(repo, issue)
                .await
                .map_err(|err| Error::for_issue(&issue.id, err))?;
            self.emitter.emit(row)?;
            self.timeline.finish_issue(issue);
        }

        Ok(ActivitySummary {
            total,
            emitted: self.emitter.rows().len(),
        })
    }

    async fn project<R: IssueRepository>(&mut self, repo: &R, issue: &Issue) -> Result<ReportRow> {
        let started = self.timeline.resolve_start_date(repo, issue).await?;

        Ok(ReportRow {
            id: issue.id.clone(),
            title: issue.summary.clone(),
            url: issue_url(&self.config.base_url, &issue.id),
            assignee: issue
                .assignee_login()
                .unwrap_or(AssigneeQuota::UNASSIGNED)
                .to_string(),
            created: format_date(Some(issue.created)),
            started: format_date(Some(started)),
            estimation: estimation_in_days(issue),
            resolved: format_date(issue.resolved),
        })
    }

    pub fn rows(&self) -> &[ReportRow] {
        self.emitter.rows()
    }

    /// The pretty JSON document, when no output file is configured.
    pub fn to_json(&self) -> Result<Option<String>> {
        self.emitter.to_json()
    }
}

fn issue_url(base_url: &str, id: &str) -> String {
    format!("{}/issue/{}", base_url.trim_end_matches('/'), id)
}

fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Tracker estimates are stored in minutes; the report wants 8-hour
/// workdays. Absent estimates read as 0.
fn estimation_in_days(issue: &Issue) -> f64 {
    issue
        .fields
        .estimation_minutes()
        .map(|minutes| minutes / MINUTES_IN_HOUR / HOURS_IN_WORK_DAY)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fields::{ESTIMATION, START_DATE};
    use crate::models::FieldValue;
    use crate::testutil::{change, issue, ymd, MockRepository};

    fn config() -> ActivityConfig {
        ActivityConfig::new("State: Resolved", "https://tracker.example.com")
    }

    #[tokio::test]
    async fn test_rows_follow_query_order() {
        let repo = MockRepository::with_issues(vec![
            issue("PRJ-2").build(),
            issue("PRJ-1").build(),
            issue("PRJ-3").build(),
        ]);

        let mut report = ActivityReport::new(config());
        let summary = report.run(&repo, |_, _, _| {}).await.unwrap();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.emitted, 3);
        let ids: Vec<&str> = report.rows().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["PRJ-2", "PRJ-1", "PRJ-3"]);
    }

    #[tokio::test]
    async fn test_started_falls_back_to_creation() {
        let repo =
            MockRepository::with_issues(vec![issue("PRJ-1").created(ymd(2024, 1, 1)).build()]);

        let mut report = ActivityReport::new(config());
        report.run(&repo, |_, _, _| {}).await.unwrap();

        assert_eq!(report.rows()[0].started, "2024-01-01");
    }

    #[tokio::test]
    async fn test_started_prefers_in_progress_transition() {
        let subject = issue("PRJ-1")
            .created(ymd(2024, 1, 1))
            .field(START_DATE, FieldValue::Date(ymd(2024, 1, 2)))
            .build();
        let mut repo = MockRepository::with_issues(vec![subject]);
        repo.add_history(
            "PRJ-1",
            vec![change("State", "In Progress", ymd(2024, 1, 5), "alice")],
        );

        let mut report = ActivityReport::new(config());
        report.run(&repo, |_, _, _| {}).await.unwrap();

        assert_eq!(report.rows()[0].started, "2024-01-05");
    }

    #[tokio::test]
    async fn test_estimation_converts_minutes_to_workdays() {
        let with = issue("PRJ-1")
            .field(ESTIMATION, FieldValue::Number(960.0))
            .build();
        let without = issue("PRJ-2").build();
        let repo = MockRepository::with_issues(vec![with, without]);

        let mut report = ActivityReport::new(config());
        report.run(&repo, |_, _, _| {}).await.unwrap();

        assert_eq!(report.rows()[0].estimation, 2.0);
        assert_eq!(report.rows()[1].estimation, 0.0);
    }

    #[tokio::test]
    async fn test_quota_suppresses_but_still_counts() {
        let repo = MockRepository::with_issues(vec![
            issue("PRJ-1").assignee("alice").build(),
            issue("PRJ-2").assignee("alice").build(),
            issue("PRJ-3").assignee("bob").build(),
        ]);

        let mut cfg = config();
        cfg.limit_per_assignee = Some(1);
        let mut report = ActivityReport::new(cfg);

        let mut observed = 0;
        let summary = report.run(&repo, |_, _, _| observed += 1).await.unwrap();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.emitted, 2);
        assert_eq!(observed, 3);
        let ids: Vec<&str> = report.rows().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["PRJ-1", "PRJ-3"]);
    }

    #[tokio::test]
    async fn test_unassigned_rows_use_the_shared_bucket_name() {
        let repo = MockRepository::with_issues(vec![issue("PRJ-1").build()]);

        let mut report = ActivityReport::new(config());
        report.run(&repo, |_, _, _| {}).await.unwrap();

        assert_eq!(report.rows()[0].assignee, "Unassigned");
    }

    #[tokio::test]
    async fn test_issue_url_joins_cleanly() {
        let repo = MockRepository::with_issues(vec![issue("PRJ-1").build()]);

        let mut cfg = config();
        cfg.base_url = "https://tracker.example.com/".to_string();
        let mut report = ActivityReport::new(cfg);
        report.run(&repo, |_, _, _| {}).await.unwrap();

        assert_eq!(
            report.rows()[0].url,
            "https://tracker.example.com/issue/PRJ-1"
        );
    }

    #[tokio::test]
    async fn test_empty_result_does_not_touch_the_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        std::fs::write(&path, "existing contents").unwrap();

        let repo = MockRepository::new();
        let mut cfg = config();
        cfg.output_file = Some(path.clone());
        cfg.overwrite_file = true;
        let mut report = ActivityReport::new(cfg);

        let summary = report.run(&repo, |_, _, _| {}).await.unwrap();
        assert_eq!(summary.total, 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "existing contents");
    }

    #[tokio::test]
    async fn test_history_cache_is_evicted_per_issue() {
        let repo = MockRepository::with_issues(vec![
            issue("PRJ-1").build(),
            issue("PRJ-2").build(),
        ]);

        let mut report = ActivityReport::new(config());
        report.run(&repo, |_, _, _| {}).await.unwrap();

        assert!(!report.timeline.is_cached("PRJ-1"));
        assert!(!report.timeline.is_cached("PRJ-2"));
        assert_eq!(repo.history_fetch_count("PRJ-1"), 1);
    }
}
