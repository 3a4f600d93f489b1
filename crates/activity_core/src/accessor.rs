//! The repository activity accessor.
//!
//! [`ActivityAccessor`] binds a GitHub client to the repository and the issue or
//! pull request of the current run, and exposes the handful of operations an
//! automation step needs.

use std::sync::Arc;

use github_client::{Comment, IssueClient, Label, PullRequest, PullRequestListQuery, StateFilter};
use tracing::{debug, info, instrument, warn};

use crate::errors::{ActivityError, ActivityResult};
use crate::event::{EventContext, RepositoryId};
use crate::report::FailureReporter;

#[cfg(test)]
#[path = "accessor_tests.rs"]
mod tests;

/// Number of pull requests requested per page by [`ActivityAccessor::list_pull_requests`].
pub const PULL_REQUEST_PAGE_SIZE: u8 = 100;

/// Reads and updates the issue or pull request the current run operates on.
///
/// The repository and the activity number are fixed when the accessor is created;
/// no operation changes them. Operations that need the activity number quietly do
/// nothing when the event did not carry one.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use activity_core::{ActivityAccessor, EventContext, RecordingReporter, RepositoryId};
/// use github_client::{create_token_client, GitHubClient, SecretString};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let token = SecretString::from("ghs_token".to_string());
/// let client = Arc::new(GitHubClient::new(create_token_client(&token)?));
/// let context = EventContext::new(RepositoryId::new("octo-org", "octo-repo")?).with_issue(42);
/// let reporter = Arc::new(RecordingReporter::new());
///
/// let accessor = ActivityAccessor::new(client, &context, reporter.clone());
///
/// if accessor.count_author_pull_requests().await? == Some(1) {
///     accessor.write_comment("Thanks for your first pull request!").await?;
/// }
/// # Ok(())
/// # }
/// ```
pub struct ActivityAccessor {
    client: Arc<dyn IssueClient>,
    repository: RepositoryId,
    activity_number: Option<u64>,
    context_failure: Option<ActivityError>,
    reporter: Arc<dyn FailureReporter>,
}

impl ActivityAccessor {
    /// Creates an accessor for the event described by `context`.
    ///
    /// When the event has neither an issue nor a pull request the failure is sent to
    /// `reporter` and the accessor is still returned; see
    /// [`ActivityAccessor::context_failure`].
    pub fn new(
        client: Arc<dyn IssueClient>,
        context: &EventContext,
        reporter: Arc<dyn FailureReporter>,
    ) -> Self {
        let (activity_number, context_failure) = match context.activity_number() {
            Ok(number) => (Some(number), None),
            Err(e) => {
                reporter.report(&e);
                (None, Some(e))
            }
        };

        debug!(
            repository = %context.repository,
            activity_number = ?activity_number,
            "Created activity accessor"
        );

        Self {
            client,
            repository: context.repository.clone(),
            activity_number,
            context_failure,
            reporter,
        }
    }

    pub fn repository(&self) -> &RepositoryId {
        &self.repository
    }

    /// The issue or pull request number of the run, if the event carried one.
    pub fn activity_number(&self) -> Option<u64> {
        self.activity_number
    }

    /// The failure recorded while resolving the activity number, if any.
    pub fn context_failure(&self) -> Option<&ActivityError> {
        self.context_failure.as_ref()
    }

    /// Adds `labels` to the current issue or pull request.
    ///
    /// # Returns
    ///
    /// `Ok(None)` without contacting GitHub when `labels` is empty or there is no
    /// activity number, otherwise the labels now on the issue.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::GitHub` with the client error if the call fails.
    #[instrument(skip(self), fields(repository = %self.repository))]
    pub async fn apply_labels(&self, labels: &[String]) -> ActivityResult<Option<Vec<Label>>> {
        if labels.is_empty() {
            debug!("No labels to apply");
            return Ok(None);
        }
        let Some(number) = self.activity_number else {
            debug!("No issue or pull request to label");
            return Ok(None);
        };

        let applied = self
            .client
            .add_labels(
                self.repository.owner(),
                self.repository.name(),
                number,
                labels,
            )
            .await?;
        Ok(Some(applied))
    }

    /// Fetches one page of the repository's pull requests in any state.
    ///
    /// Pages hold [`PULL_REQUEST_PAGE_SIZE`] entries and are numbered from 1; page 0
    /// is treated as page 1. The page is returned as GitHub sent it. Filtering and
    /// walking further pages are left to the caller.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::GitHub` with the client error if the call fails.
    #[instrument(skip(self), fields(repository = %self.repository))]
    pub async fn list_pull_requests(&self, page: u32) -> ActivityResult<Vec<PullRequest>> {
        let query = PullRequestListQuery {
            state: StateFilter::All,
            per_page: PULL_REQUEST_PAGE_SIZE,
            page: page.max(1),
        };

        let pulls = self
            .client
            .list_pull_requests(self.repository.owner(), self.repository.name(), &query)
            .await?;
        Ok(pulls)
    }

    /// Same as `list_pull_requests(1)`.
    pub async fn list_first_pull_request_page(&self) -> ActivityResult<Vec<PullRequest>> {
        self.list_pull_requests(1).await
    }

    /// Login of the account that opened the current issue or pull request.
    ///
    /// # Returns
    ///
    /// `Ok(None)` without contacting GitHub when there is no activity number, and
    /// `Ok(None)` when GitHub does not attribute the issue to a user.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::GitHub` with the client error if the lookup fails.
    #[instrument(skip(self), fields(repository = %self.repository))]
    pub async fn activity_author(&self) -> ActivityResult<Option<String>> {
        let Some(number) = self.activity_number else {
            return Ok(None);
        };

        let issue = self
            .client
            .get_issue(self.repository.owner(), self.repository.name(), number)
            .await?;
        Ok(issue.author_login().map(str::to_string))
    }

    /// Counts every pull request ever opened in the repository by the author of the
    /// current issue or pull request.
    ///
    /// Pull requests in all states are counted: open, closed without merging, merged
    /// and drafts.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(n))` when the author is known, including `Some(0)`
    /// - `Ok(None)` when the author is unknown: no activity number, an unattributed
    ///   issue, or a failed author lookup. A failed lookup is sent to the reporter
    ///   instead of being returned.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::GitHub` if listing the author's issues fails.
    #[instrument(skip(self), fields(repository = %self.repository))]
    pub async fn count_author_pull_requests(&self) -> ActivityResult<Option<usize>> {
        let author = match self.activity_author().await {
            Ok(Some(author)) => author,
            Ok(None) => {
                debug!("No author to count pull requests for");
                return Ok(None);
            }
            Err(ActivityError::GitHub(e)) => {
                warn!(error = %e, "Could not resolve the issue author");
                self.reporter.report(&ActivityError::AuthorResolution(e));
                return Ok(None);
            }
            Err(e) => {
                self.reporter.report(&e);
                return Ok(None);
            }
        };

        let records = self
            .client
            .list_issues_by_creator(
                self.repository.owner(),
                self.repository.name(),
                &author,
                StateFilter::All,
            )
            .await?;

        let count = records.iter().filter(|r| r.is_pull_request()).count();

        info!(author = %author, count = count, "{} has made {} PRs", author, count);
        Ok(Some(count))
    }

    /// Posts `body` as a new comment on the current issue or pull request.
    ///
    /// # Returns
    ///
    /// `Ok(None)` without contacting GitHub when there is no activity number,
    /// otherwise the created comment.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::GitHub` with the client error if the call fails.
    #[instrument(skip(self, body), fields(repository = %self.repository))]
    pub async fn write_comment(&self, body: &str) -> ActivityResult<Option<Comment>> {
        let Some(number) = self.activity_number else {
            debug!("No issue or pull request to comment on");
            return Ok(None);
        };

        let comment = self
            .client
            .create_comment(self.repository.owner(), self.repository.name(), number, body)
            .await?;
        Ok(Some(comment))
    }
}
