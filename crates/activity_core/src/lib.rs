//! # Activity Core
//!
//! This crate provides the repository activity accessor used by CI automation that
//! reacts to issues and pull requests: resolving which issue or pull request the run
//! is about, applying labels, posting comments, listing pull requests and counting
//! how many pull requests the author has opened before.
//!
//! ## Architecture
//!
//! - [`EventContext`] describes the triggering event and is passed in explicitly,
//!   either built by hand or parsed from the GitHub webhook payload.
//! - [`ActivityAccessor`] performs the operations through the
//!   [`github_client::IssueClient`] trait, so any client implementation (including
//!   test doubles) can be injected.
//! - [`FailureReporter`] receives failures that should fail the run without
//!   aborting the caller.
//!
//! ## Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use activity_core::{ActivityAccessor, EventContext, RepositoryId, TracingReporter};
//! use github_client::{create_token_client, GitHubClient, SecretString};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repository: RepositoryId = "octo-org/octo-repo".parse()?;
//! let context = EventContext::load(Some(repository), std::path::Path::new("event.json"))?;
//!
//! let token = SecretString::from("ghs_token".to_string());
//! let client = Arc::new(GitHubClient::new(create_token_client(&token)?));
//! let accessor = ActivityAccessor::new(client, &context, Arc::new(TracingReporter));
//!
//! accessor.apply_labels(&["needs-triage".to_string()]).await?;
//! # Ok(())
//! # }
//! ```

pub mod accessor;
pub mod errors;
pub mod event;
pub mod report;

pub use accessor::{ActivityAccessor, PULL_REQUEST_PAGE_SIZE};
pub use errors::{ActivityError, ActivityResult};
pub use event::{EventContext, RepositoryId};
pub use report::{FailureReporter, RecordingReporter, TracingReporter};

#[cfg(test)]
#[path = "lib_integration_tests.rs"]
mod integration_tests;
