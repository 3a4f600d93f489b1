//! Event context for a single automation run.
//!
//! GitHub Actions describes the triggering event in two places: the
//! `GITHUB_REPOSITORY` variable (`owner/name`) and a JSON webhook payload written to
//! the file named by `GITHUB_EVENT_PATH`. This module turns both into an
//! [`EventContext`] that is handed to the accessor explicitly.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use tracing::debug;

use crate::errors::{ActivityError, ActivityResult};

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;

/// The owner and name of a GitHub repository.
///
/// # Examples
///
/// ```rust
/// use activity_core::RepositoryId;
///
/// let repo: RepositoryId = "octo-org/octo-repo".parse().unwrap();
/// assert_eq!(repo.owner(), "octo-org");
/// assert_eq!(repo.name(), "octo-repo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryId {
    owner: String,
    name: String,
}

impl RepositoryId {
    /// Creates a repository identifier from its parts.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::InvalidRepository` if either part is empty or contains
    /// a `/`.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> ActivityResult<Self> {
        let owner = owner.into();
        let name = name.into();

        if owner.trim().is_empty() || name.trim().is_empty() {
            return Err(ActivityError::InvalidRepository(format!("{owner}/{name}")));
        }
        if owner.contains('/') || name.contains('/') {
            return Err(ActivityError::InvalidRepository(format!("{owner}/{name}")));
        }

        Ok(Self { owner, name })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for RepositoryId {
    type Err = ActivityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner, name) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| ActivityError::InvalidRepository(s.to_string()))?;
        RepositoryId::new(owner, name).map_err(|_| ActivityError::InvalidRepository(s.to_string()))
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Everything the accessor needs to know about the event that started the run.
///
/// # Examples
///
/// ```rust
/// use activity_core::{EventContext, RepositoryId};
///
/// let repo = RepositoryId::new("octo-org", "octo-repo").unwrap();
/// let context = EventContext::new(repo).with_pull_request(17);
///
/// assert_eq!(context.activity_number().unwrap(), 17);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventContext {
    pub repository: RepositoryId,
    pub issue_number: Option<u64>,
    pub pull_request_number: Option<u64>,
}

impl EventContext {
    /// Creates a context for `repository` with neither an issue nor a pull request.
    pub fn new(repository: RepositoryId) -> Self {
        Self {
            repository,
            issue_number: None,
            pull_request_number: None,
        }
    }

    pub fn with_issue(mut self, number: u64) -> Self {
        self.issue_number = Some(number);
        self
    }

    pub fn with_pull_request(mut self, number: u64) -> Self {
        self.pull_request_number = Some(number);
        self
    }

    /// Parses a GitHub webhook payload.
    ///
    /// An explicit `repository` (normally from `GITHUB_REPOSITORY`) takes precedence
    /// over the `repository` object inside the payload.
    ///
    /// # Errors
    ///
    /// - `ActivityError::EventPayload` if the payload is not valid JSON
    /// - `ActivityError::InvalidRepository` if no repository is available from
    ///   either source
    pub fn from_payload(repository: Option<RepositoryId>, payload: &str) -> ActivityResult<Self> {
        let payload: EventPayload = serde_json::from_str(payload)
            .map_err(|e| ActivityError::EventPayload(e.to_string()))?;

        let repository = match repository {
            Some(repository) => repository,
            None => match &payload.repository {
                Some(repo) => RepositoryId::new(repo.owner.login.as_str(), repo.name.as_str())?,
                None => {
                    return Err(ActivityError::InvalidRepository(
                        "no repository in environment or event payload".to_string(),
                    ))
                }
            },
        };

        let context = Self {
            repository,
            issue_number: payload.issue.map(|i| i.number),
            pull_request_number: payload.pull_request.map(|p| p.number),
        };

        debug!(
            repository = %context.repository,
            issue_number = ?context.issue_number,
            pull_request_number = ?context.pull_request_number,
            "Parsed event payload"
        );
        Ok(context)
    }

    /// Reads and parses the webhook payload stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::EventFile` when the file cannot be read, otherwise the
    /// same errors as [`EventContext::from_payload`].
    pub fn load(repository: Option<RepositoryId>, path: &Path) -> ActivityResult<Self> {
        debug!("Loading event payload from {:?}", path);

        let content = fs::read_to_string(path).map_err(|source| ActivityError::EventFile {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_payload(repository, &content)
    }

    /// The number of the issue or pull request the run operates on.
    ///
    /// The issue wins when both are present, matching how `issue_comment` events on
    /// pull requests are shaped.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::MissingActivityContext` when neither is present.
    pub fn activity_number(&self) -> ActivityResult<u64> {
        self.issue_number
            .or(self.pull_request_number)
            .ok_or(ActivityError::MissingActivityContext)
    }
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    #[serde(default)]
    issue: Option<NumberedItem>,
    #[serde(default)]
    pull_request: Option<NumberedItem>,
    #[serde(default)]
    repository: Option<PayloadRepository>,
}

#[derive(Debug, Deserialize)]
struct NumberedItem {
    number: u64,
}

#[derive(Debug, Deserialize)]
struct PayloadRepository {
    name: String,
    owner: PayloadOwner,
}

#[derive(Debug, Deserialize)]
struct PayloadOwner {
    login: String,
}
