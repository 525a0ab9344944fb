// Issue endpoints.
// Typed read, create, edit, close, and search operations.

use serde::de::DeserializeOwned;

use crate::error::{ComixError, Result};

use super::client::GitHubClient;
use super::types::{Issue, IssueRequest, IssueSearchResult, IssueState};

/// Decode a checked response body, keeping parse failures distinct from
/// transport failures.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let body = response.text().await.map_err(ComixError::Transport)?;
    serde_json::from_str(&body).map_err(ComixError::Decode)
}

impl GitHubClient {
    /// Fetch one issue.
    pub async fn get_issue(&self, owner: &str, repo: &str, number: u64) -> Result<Issue> {
        let response = self
            .get(&format!("/repos/{owner}/{repo}/issues/{number}"))
            .await?;
        decode(response).await
    }

    /// Open a new issue.
    pub async fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        request: &IssueRequest,
    ) -> Result<Issue> {
        let response = self
            .post(&format!("/repos/{owner}/{repo}/issues"), request)
            .await?;
        decode(response).await
    }

    /// Apply `request` to an existing issue.
    pub async fn edit_issue(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        request: &IssueRequest,
    ) -> Result<Issue> {
        let response = self
            .patch(&format!("/repos/{owner}/{repo}/issues/{number}"), request)
            .await?;
        decode(response).await
    }

    /// Close an issue.
    pub async fn close_issue(&self, owner: &str, repo: &str, number: u64) -> Result<Issue> {
        let request = IssueRequest {
            state: Some(IssueState::Closed),
            ..IssueRequest::default()
        };
        self.edit_issue(owner, repo, number, &request).await
    }

    /// Search issues across GitHub.
    pub async fn search_issues(&self, terms: &[String]) -> Result<IssueSearchResult> {
        let query = terms.join(" ");
        let response = self
            .get_with_params("/search/issues", &[("q", query.as_str())])
            .await?;
        decode(response).await
    }
}
