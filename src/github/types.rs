// GitHub API types.
// Request and response shapes for the issues endpoints.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Issue state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IssueState::Open => "open",
            IssueState::Closed => "closed",
            IssueState::Unknown => "unknown",
        })
    }
}

/// A GitHub issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub html_url: String,
    pub title: String,
    pub state: IssueState,
    pub user: Option<User>,
    pub created_at: DateTime<Utc>,
    /// Markdown body; the API serves null for bodiless issues.
    pub body: Option<String>,
}

/// The author of an issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    pub html_url: String,
}

/// Fields to set when creating or editing an issue. Unset fields are left
/// untouched by the API.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IssueRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<IssueState>,
}

/// Result page from the issue search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueSearchResult {
    pub total_count: u64,
    pub items: Vec<Issue>,
}
