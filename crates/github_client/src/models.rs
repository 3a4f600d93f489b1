//! # Models
//!
//! This module contains the data models the activity tooling reads from and sends
//! to the GitHub REST API.
//!
//! The models only carry the fields the tooling inspects. Unknown fields in GitHub
//! responses are ignored during deserialization so that API additions do not break
//! decoding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// Represents a GitHub user account.
///
/// # Examples
///
/// ```rust
/// use github_client::models::User;
///
/// let user = User {
///     id: 583231,
///     login: "octocat".to_string(),
/// };
///
/// println!("User: {} (ID: {})", user.login, user.id);
/// ```
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct User {
    /// The unique numeric ID of the user
    #[serde(default)]
    pub id: u64,
    /// The login name of the user
    pub login: String,
}

/// Represents a label on an issue or pull request.
///
/// # Examples
///
/// ```
/// use github_client::models::Label;
///
/// let label = Label {
///     name: "bug".to_string(),
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Label {
    /// The name of the label
    pub name: String,
}

/// The pull-request specific block GitHub attaches to issue records that are
/// really pull requests.
///
/// Plain issues never carry this block, so its presence is what separates the
/// two in a combined issue listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PullRequestMarker {
    /// API URL of the pull request
    #[serde(default)]
    pub url: Option<String>,
    /// Browser URL of the pull request
    #[serde(default)]
    pub html_url: Option<String>,
    /// When the pull request was merged, if it was
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
}

/// An issue-shaped record as returned by the issues endpoints.
///
/// GitHub's issues API returns pull requests as well; those records carry a
/// [`PullRequestMarker`] in `pull_request`.
///
/// # Examples
///
/// ```rust
/// use github_client::models::{IssueRecord, PullRequestMarker};
///
/// let record = IssueRecord {
///     number: 7,
///     title: "Add retry support".to_string(),
///     state: "closed".to_string(),
///     user: None,
///     labels: vec![],
///     pull_request: Some(PullRequestMarker::default()),
/// };
///
/// assert!(record.is_pull_request());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssueRecord {
    /// The issue or pull request number within the repository
    pub number: u64,
    /// Title of the issue
    #[serde(default)]
    pub title: String,
    /// Either `open` or `closed`
    #[serde(default)]
    pub state: String,
    /// The account that opened the issue, absent for deleted accounts
    #[serde(default)]
    pub user: Option<User>,
    /// Labels currently applied
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Present only when the record is a pull request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<PullRequestMarker>,
}

impl IssueRecord {
    /// Returns true when the record is a pull request rather than a plain issue.
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    /// Login of the account that opened the record, if GitHub attributes one.
    pub fn author_login(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.login.as_str())
    }
}

/// A pull request as returned by the pulls listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PullRequest {
    /// The pull request number within the repository
    pub number: u64,
    /// Title of the pull request
    #[serde(default)]
    pub title: String,
    /// Either `open` or `closed`
    #[serde(default)]
    pub state: String,
    /// The account that opened the pull request
    #[serde(default)]
    pub user: Option<User>,
    /// Whether the pull request is a draft
    #[serde(default)]
    pub draft: Option<bool>,
    /// When the pull request was merged, if it was
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
    /// Browser URL of the pull request
    #[serde(default)]
    pub html_url: Option<String>,
}

/// A comment on an issue or pull request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    /// The unique ID of the comment
    pub id: u64,
    /// The markdown body of the comment
    #[serde(default)]
    pub body: Option<String>,
    /// The account that wrote the comment
    #[serde(default)]
    pub user: Option<User>,
    /// Browser URL of the comment
    #[serde(default)]
    pub html_url: Option<String>,
}

/// State filter accepted by the issue and pull request listing endpoints.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StateFilter {
    Open,
    Closed,
    #[default]
    All,
}

impl StateFilter {
    /// The query string value GitHub expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            StateFilter::Open => "open",
            StateFilter::Closed => "closed",
            StateFilter::All => "all",
        }
    }
}

/// Parameters for requesting a single page of pull requests.
///
/// Serializes directly into the query string of `GET /repos/{owner}/{repo}/pulls`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PullRequestListQuery {
    pub state: StateFilter,
    pub per_page: u8,
    pub page: u32,
}

impl Default for PullRequestListQuery {
    fn default() -> Self {
        Self {
            state: StateFilter::All,
            per_page: 30,
            page: 1,
        }
    }
}
