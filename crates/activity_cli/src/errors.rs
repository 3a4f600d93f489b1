use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the pr-activity CLI.
///
/// Failures reported through the accessor's failure channel are not errors here;
/// they only change the exit status.
#[derive(Error, Debug)]
pub enum Error {
    /// The accessor or event context reported an error.
    #[error(transparent)]
    Activity(#[from] activity_core::ActivityError),

    /// Configuration error occurred while loading or resolving settings.
    ///
    /// This error is returned when the configuration file is missing or malformed,
    /// or when a setting such as the API URL has an invalid value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Building the GitHub client failed.
    #[error(transparent)]
    GitHub(#[from] github_client::Error),

    /// Writing command output failed.
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
