//! Error types for GitHub client operations.
//!
//! This module defines the errors that can occur when the activity tooling talks to
//! the GitHub REST API through the github_client crate. Octocrab failures are mapped
//! onto these variants so callers never need to inspect octocrab types directly.

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur during GitHub client operations.
///
/// Each variant describes a class of failure the caller may want to react to
/// differently, e.g. marking a CI step as failed on `AuthError` while treating
/// `NotFound` as a missing issue.
///
/// ## Examples
///
/// ```rust,ignore
/// use github_client::Error;
///
/// match client.get_issue("owner", "repo", 42).await {
///     Ok(issue) => println!("Issue #{} is {}", issue.number, issue.state),
///     Err(Error::NotFound) => eprintln!("Issue does not exist"),
///     Err(Error::RateLimitExceeded) => eprintln!("Rate limit exceeded, retry later"),
///     Err(err) => eprintln!("Other error: {}", err),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// GitHub answered with an error status that has no more specific variant.
    ///
    /// Parameters: HTTP status code and the message GitHub returned.
    #[error("GitHub API request failed with status {status}: {message}")]
    ApiError { status: u16, message: String },

    /// Authentication or authorization failure.
    ///
    /// This error occurs when:
    /// - The token is invalid or expired (401)
    /// - The token lacks the permissions the request needs (403)
    /// - The octocrab client could not be built from the token
    #[error("Authentication failed: {0}")]
    AuthError(String),

    /// The configured API base URI could not be parsed.
    #[error("Invalid GitHub API base URI: {0}")]
    InvalidBaseUri(String),

    /// The GitHub API returned a response body that could not be decoded into
    /// the expected model.
    #[error("Invalid response format")]
    InvalidResponse,

    /// The request never produced an HTTP response (DNS, TLS, connection reset, ...).
    #[error("Network error while calling GitHub: {0}")]
    Network(String),

    /// The requested issue, pull request or repository was not found.
    ///
    /// GitHub also answers 404 for private resources the token cannot see.
    #[error("Resource not found")]
    NotFound,

    /// GitHub API rate limit has been exceeded.
    ///
    /// Retrying is left to the caller; this crate does not back off.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}
