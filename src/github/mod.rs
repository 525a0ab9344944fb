// GitHub issues module.
// One-shot CRUD and search calls against the GitHub REST API.

#![allow(dead_code, unused_imports)]

pub mod client;
pub mod issues;
pub mod types;

pub use client::GitHubClient;
pub use types::{Issue, IssueRequest, IssueSearchResult, IssueState, User};
