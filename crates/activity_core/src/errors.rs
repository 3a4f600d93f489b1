//! Error types for the activity accessor.

use std::path::PathBuf;

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors raised while resolving the event context or talking to GitHub on behalf
/// of the current issue or pull request.
#[derive(Error, Debug)]
pub enum ActivityError {
    /// The event carried neither an issue nor a pull request.
    ///
    /// This is reported through the [`crate::FailureReporter`] at construction time
    /// rather than returned; operations that need the number then do nothing.
    #[error("Error retrieving issue number")]
    MissingActivityContext,

    /// The repository could not be determined or was not in `owner/name` form.
    #[error("Invalid repository: {0}")]
    InvalidRepository(String),

    /// The event payload is not a JSON document of the expected shape.
    #[error("Invalid event payload: {0}")]
    EventPayload(String),

    /// The event payload file could not be read.
    #[error("Failed to read event payload from {path:?}")]
    EventFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Looking up the author of the current issue failed while counting pull requests.
    #[error("Failed to resolve the issue author: {0}")]
    AuthorResolution(#[source] github_client::Error),

    /// A GitHub API call failed. The client error is passed through unchanged.
    #[error(transparent)]
    GitHub(#[from] github_client::Error),
}

/// Convenience alias for results produced by this crate.
pub type ActivityResult<T> = Result<T, ActivityError>;
