//! Crate for interacting with the GitHub REST API.
//!
//! This crate provides a token-authenticated client for the small set of issue and
//! pull request endpoints the activity tooling needs: reading issues, listing pull
//! requests, applying labels and posting comments. The [`IssueClient`] trait is the
//! seam consumers depend on so that tests can substitute their own implementation.

use async_trait::async_trait;
use http::StatusCode;
use octocrab::{Octocrab, Page};
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::{debug, error, info, instrument};

pub use secrecy::SecretString;

pub mod errors;
pub use errors::Error;

pub mod models;
pub use models::{
    Comment, IssueRecord, Label, PullRequest, PullRequestListQuery, PullRequestMarker,
    StateFilter, User,
};

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Page size used when walking every page of an issue listing.
pub const ISSUE_LISTING_PAGE_SIZE: u8 = 100;

/// Operations on repository issues and pull requests.
///
/// All methods address the repository by owner and name. Implementations perform
/// the network round trip and report failures as [`Error`]; they do not retry.
#[async_trait]
pub trait IssueClient: Send + Sync {
    /// Adds labels to an issue or pull request.
    ///
    /// # Returns
    ///
    /// The full set of labels on the issue after the update.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the issue does not exist and `Error::AuthError`
    /// if the token may not modify it.
    async fn add_labels(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        labels: &[String],
    ) -> Result<Vec<Label>, Error>;

    /// Lists exactly one page of pull requests.
    ///
    /// Implementations must not follow pagination links; the caller drives paging
    /// through `query.page`.
    async fn list_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        query: &PullRequestListQuery,
    ) -> Result<Vec<PullRequest>, Error>;

    /// Fetches a single issue or pull request by number.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if no issue with that number exists.
    async fn get_issue(&self, owner: &str, repo: &str, number: u64)
        -> Result<IssueRecord, Error>;

    /// Lists every issue and pull request opened by `creator`.
    ///
    /// Unlike [`IssueClient::list_pull_requests`] this follows pagination until the
    /// listing is exhausted and returns the combined records.
    async fn list_issues_by_creator(
        &self,
        owner: &str,
        repo: &str,
        creator: &str,
        state: StateFilter,
    ) -> Result<Vec<IssueRecord>, Error>;

    /// Posts a new comment on an issue or pull request.
    async fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<Comment, Error>;
}

/// A client for the GitHub REST API, authenticated with a personal or workflow token.
#[derive(Debug)]
pub struct GitHubClient {
    client: Octocrab,
}

impl GitHubClient {
    /// Creates a new `GitHubClient` from an already authenticated `Octocrab` instance.
    ///
    /// Use [`create_token_client`] or [`create_token_client_with_base_uri`] to build
    /// the `Octocrab` instance.
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }
}

#[derive(Serialize)]
struct AddLabelsPayload<'a> {
    labels: &'a [String],
}

#[derive(Serialize)]
struct CreateCommentPayload<'a> {
    body: &'a str,
}

#[derive(Serialize)]
struct IssueListParams<'a> {
    state: StateFilter,
    creator: &'a str,
    per_page: u8,
}

#[async_trait]
impl IssueClient for GitHubClient {
    #[instrument(skip(self, labels), fields(owner = %owner, repo = %repo, number = number, label_count = labels.len()))]
    async fn add_labels(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        labels: &[String],
    ) -> Result<Vec<Label>, Error> {
        let path = format!("/repos/{}/{}/issues/{}/labels", owner, repo, number);
        let payload = AddLabelsPayload { labels };

        debug!("Making API call to: {}", path);
        let response: octocrab::Result<Vec<Label>> = self.client.post(path, Some(&payload)).await;
        match response {
            Ok(applied) => {
                info!(
                    owner = owner,
                    repo = repo,
                    number = number,
                    applied = applied.len(),
                    "Applied labels"
                );
                Ok(applied)
            }
            Err(e) => Err(map_octocrab_error("Failed to add labels", &e)),
        }
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, page = query.page))]
    async fn list_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        query: &PullRequestListQuery,
    ) -> Result<Vec<PullRequest>, Error> {
        let path = format!("/repos/{}/{}/pulls", owner, repo);

        debug!("Making API call to: {}", path);
        let response: octocrab::Result<Page<PullRequest>> =
            self.client.get(path, Some(query)).await;
        match response {
            Ok(page) => {
                debug!(
                    page = query.page,
                    per_page = query.per_page,
                    count = page.items.len(),
                    has_next_page = page.next.is_some(),
                    "Retrieved pull request page"
                );
                Ok(page.items)
            }
            Err(e) => Err(map_octocrab_error("Failed to list pull requests", &e)),
        }
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, number = number))]
    async fn get_issue(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<IssueRecord, Error> {
        let path = format!("/repos/{}/{}/issues/{}", owner, repo, number);

        debug!("Making API call to: {}", path);
        let response: octocrab::Result<IssueRecord> = self.client.get(path, None::<&()>).await;
        response.map_err(|e| map_octocrab_error("Failed to get issue", &e))
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, creator = %creator))]
    async fn list_issues_by_creator(
        &self,
        owner: &str,
        repo: &str,
        creator: &str,
        state: StateFilter,
    ) -> Result<Vec<IssueRecord>, Error> {
        let path = format!("/repos/{}/{}/issues", owner, repo);
        let params = IssueListParams {
            state,
            creator,
            per_page: ISSUE_LISTING_PAGE_SIZE,
        };

        debug!("Making API call to: {}", path);
        let first_page: Page<IssueRecord> = self
            .client
            .get(path, Some(&params))
            .await
            .map_err(|e| map_octocrab_error("Failed to list issues", &e))?;

        let records = self
            .client
            .all_pages(first_page)
            .await
            .map_err(|e| map_octocrab_error("Failed to fetch further issue pages", &e))?;

        info!(
            owner = owner,
            repo = repo,
            creator = creator,
            count = records.len(),
            "Retrieved issues for creator"
        );
        Ok(records)
    }

    #[instrument(skip(self, body), fields(owner = %owner, repo = %repo, number = number))]
    async fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<Comment, Error> {
        let path = format!("/repos/{}/{}/issues/{}/comments", owner, repo, number);
        let payload = CreateCommentPayload { body };

        debug!("Making API call to: {}", path);
        let response: octocrab::Result<Comment> = self.client.post(path, Some(&payload)).await;
        match response {
            Ok(comment) => {
                info!(
                    owner = owner,
                    repo = repo,
                    number = number,
                    comment_id = comment.id,
                    "Created comment"
                );
                Ok(comment)
            }
            Err(e) => Err(map_octocrab_error("Failed to create comment", &e)),
        }
    }
}

/// Creates an `Octocrab` client authenticated with a token against the public GitHub API.
///
/// # Errors
///
/// Returns `Error::AuthError` if the client cannot be built.
///
/// # Example
///
/// ```rust,no_run
/// use github_client::{create_token_client, GitHubClient, SecretString};
///
/// # async fn example() -> Result<(), github_client::Error> {
/// let token = SecretString::from(std::env::var("GITHUB_TOKEN").unwrap_or_default());
/// let client = GitHubClient::new(create_token_client(&token)?);
/// # Ok(())
/// # }
/// ```
#[instrument(skip(token))]
pub fn create_token_client(token: &SecretString) -> Result<Octocrab, Error> {
    Octocrab::builder()
        .personal_token(token.expose_secret().to_string())
        .build()
        .map_err(|e| {
            error!(error = %e, "Failed to build Octocrab client from token");
            Error::AuthError("Failed to build a client for the provided token.".to_string())
        })
}

/// Creates an `Octocrab` client authenticated with a token against a specific API base URI.
///
/// GitHub Enterprise Server installations expose the API under their own host, which
/// GitHub Actions advertises through `GITHUB_API_URL`.
///
/// # Errors
///
/// Returns `Error::InvalidBaseUri` if `api_url` cannot be parsed and
/// `Error::AuthError` if the client cannot be built.
#[instrument(skip(token), fields(api_url = %api_url))]
pub fn create_token_client_with_base_uri(
    token: &SecretString,
    api_url: &str,
) -> Result<Octocrab, Error> {
    Octocrab::builder()
        .personal_token(token.expose_secret().to_string())
        .base_uri(api_url)
        .map_err(|e| {
            error!(api_url = api_url, error = %e, "Failed to parse GitHub API base URI");
            Error::InvalidBaseUri(api_url.to_string())
        })?
        .build()
        .map_err(|e| {
            error!(error = %e, "Failed to build Octocrab client from token");
            Error::AuthError("Failed to build a client for the provided token.".to_string())
        })
}

/// Returns true when GitHub reports the request was rejected by a rate limit.
///
/// GitHub uses both 403 and 429 for rate limiting, and 403 is also used for plain
/// permission failures, so the message has to be inspected as well.
fn is_rate_limit_error(source: &octocrab::GitHubError) -> bool {
    let is_rate_limit_status = matches!(
        source.status_code,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    );

    let message_indicates_rate_limit = source.message.to_lowercase().contains("rate limit")
        || source
            .documentation_url
            .as_deref()
            .is_some_and(|url| url.contains("rate-limit"));

    is_rate_limit_status && message_indicates_rate_limit
}

fn map_octocrab_error(message: &str, e: &octocrab::Error) -> Error {
    log_octocrab_error(message, e);

    match e {
        octocrab::Error::GitHub { source, .. } => {
            if is_rate_limit_error(source) {
                return Error::RateLimitExceeded;
            }

            match source.status_code {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    Error::AuthError(source.message.clone())
                }
                StatusCode::NOT_FOUND => Error::NotFound,
                status => Error::ApiError {
                    status: status.as_u16(),
                    message: source.message.clone(),
                },
            }
        }
        octocrab::Error::Http { .. }
        | octocrab::Error::Hyper { .. }
        | octocrab::Error::Service { .. } => Error::Network(e.to_string()),
        octocrab::Error::Serde { .. } | octocrab::Error::Json { .. } => Error::InvalidResponse,
        octocrab::Error::UriParse { .. } | octocrab::Error::Uri { .. } => {
            Error::InvalidBaseUri(e.to_string())
        }
        _ => Error::ApiError {
            status: 0,
            message: e.to_string(),
        },
    }
}

fn log_octocrab_error(message: &str, e: &octocrab::Error) {
    match e {
        octocrab::Error::GitHub { source, .. } => error!(
            error_message = %source.message,
            status = source.status_code.as_u16(),
            "{}. Received an error from GitHub",
            message
        ),
        octocrab::Error::UriParse { source, .. } => error!(
            error_message = source.to_string(),
            "{}. Failed to parse URI.",
            message
        ),
        octocrab::Error::Uri { source, .. } => error!(
            error_message = source.to_string(),
            "{}. Failed to parse URI.",
            message
        ),
        octocrab::Error::Serde { source, .. } => error!(
            error_message = source.to_string(),
            "{}. The response body could not be decoded.",
            message
        ),
        _ => error!(error_message = e.to_string(), "{}", message),
    };
}
