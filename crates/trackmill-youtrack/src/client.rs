//! YouTrack REST client

use crate::types::{YouTrackChange, YouTrackIssue, YouTrackProjectField};
use crate::{Credentials, Error, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use trackmill_core::models::{HistoryChange, Issue};
use trackmill_core::IssueRepository;

/// Client for one YouTrack instance. Implements the core repository
/// abstraction; requests are sequential and carry no retry or timeout.
pub struct YouTrackClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl YouTrackClient {
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            credentials,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .header(AUTHORIZATION, self.credentials.authorization())
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn post_json(&self, path: &str, body: serde_json::Value) -> Result<()> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .header(AUTHORIZATION, self.credentials.authorization())
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn project_fields(&self, project_id: &str) -> Result<Vec<YouTrackProjectField>> {
        self.get_json(&format!("/api/admin/projects/{project_id}/fields"), &[])
            .await
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::Auth(format!(
                "{status} from {url}: check the token and its permissions"
            ))),
            StatusCode::NOT_FOUND => Err(Error::NotFound(url)),
            _ => Err(Error::Api(format!("{status} from {url}: {body}"))),
        }
    }
}

#[async_trait]
impl IssueRepository for YouTrackClient {
    async fn get_issues_by_filter(
        &self,
        query: &str,
        limit: usize,
    ) -> trackmill_core::Result<Vec<Issue>> {
        let limit = limit.to_string();
        let raw: Vec<YouTrackIssue> = self
            .get_json("/api/issues", &[("query", query), ("max", &limit)])
            .await?;
        tracing::debug!(count = raw.len(), "fetched issues by filter");

        raw.into_iter()
            .map(|issue| Issue::try_from(issue).map_err(trackmill_core::Error::from))
            .collect()
    }

    async fn get_issue(&self, id: &str) -> trackmill_core::Result<Issue> {
        let raw: YouTrackIssue = self.get_json(&format!("/api/issues/{id}"), &[]).await?;
        Ok(Issue::try_from(raw)?)
    }

    async fn get_history(&self, issue_id: &str) -> trackmill_core::Result<Vec<HistoryChange>> {
        let raw: Vec<YouTrackChange> = self
            .get_json(&format!("/api/issues/{issue_id}/history"), &[])
            .await?;

        raw.into_iter()
            .map(|change| HistoryChange::try_from(change).map_err(trackmill_core::Error::from))
            .collect()
    }

    async fn update_field(
        &self,
        issue_id: &str,
        field: &str,
        value: &str,
    ) -> trackmill_core::Result<bool> {
        self.post_json(
            &format!("/api/issues/{issue_id}/fields/{field}"),
            json!({ "value": value }),
        )
        .await?;
        Ok(true)
    }

    async fn has_project_field(
        &self,
        project_id: &str,
        field: &str,
    ) -> trackmill_core::Result<bool> {
        let fields = self.project_fields(project_id).await?;
        Ok(fields.iter().any(|f| f.name == field))
    }

    async fn get_project_field_values(
        &self,
        project_id: &str,
        field: &str,
    ) -> trackmill_core::Result<Vec<String>> {
        let fields = self.project_fields(project_id).await?;
        Ok(fields
            .into_iter()
            .find(|f| f.name == field)
            .map(|f| f.values.into_iter().map(|v| v.name).collect())
            .unwrap_or_default())
    }
}
