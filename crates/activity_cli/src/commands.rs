//! Command implementations for the pr-activity CLI.
//!
//! Each command maps onto one accessor operation and prints its result to the
//! given writer in a line-oriented form that later workflow steps can consume.
//! Absent values (no activity number, unknown author, ...) print nothing.

use std::io::Write;
use std::sync::Arc;

use activity_core::{ActivityAccessor, ActivityError, EventContext, FailureReporter};
use github_client::{
    create_token_client_with_base_uri, GitHubClient, IssueClient, PullRequest, SecretString,
};
use tracing::{debug, info, instrument};

use crate::cli::{Cli, Commands};
use crate::config::{AppConfig, RunSettings};
use crate::errors::Error;

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;

/// Loads the settings, builds the accessor and runs the selected command.
///
/// # Errors
///
/// Returns an error for configuration problems, unreadable event payloads and
/// failed GitHub calls. Failures the accessor sends to `reporter` are not returned.
pub async fn run<W: Write>(
    cli: &Cli,
    reporter: Arc<dyn FailureReporter>,
    out: &mut W,
) -> Result<(), Error> {
    let config = AppConfig::load_for_run(cli.config.as_deref())?;
    let settings = config.resolve(&cli.overrides())?;

    let token = cli.token.clone().ok_or_else(|| {
        Error::Config("A GitHub token is required (--token or GITHUB_TOKEN)".to_string())
    })?;

    let context = load_event_context(&settings)?;
    let client = build_client(&settings, SecretString::from(token))?;
    let accessor = ActivityAccessor::new(client, &context, reporter);

    execute(&accessor, &cli.command, out).await
}

/// Builds the event context from the payload file, or from the repository alone when
/// no payload is available.
///
/// # Errors
///
/// Returns `ActivityError::InvalidRepository` when neither a payload nor a
/// repository is configured.
pub fn load_event_context(settings: &RunSettings) -> Result<EventContext, Error> {
    let context = match (&settings.event_path, &settings.repository) {
        (Some(path), repository) => EventContext::load(repository.clone(), path)?,
        (None, Some(repository)) => {
            debug!("No event payload configured, continuing without an issue number");
            EventContext::new(repository.clone())
        }
        (None, None) => {
            return Err(ActivityError::InvalidRepository(
                "set GITHUB_REPOSITORY or provide an event payload".to_string(),
            )
            .into())
        }
    };
    Ok(context)
}

fn build_client(settings: &RunSettings, token: SecretString) -> Result<Arc<dyn IssueClient>, Error> {
    let octocrab = create_token_client_with_base_uri(&token, &settings.api_url)?;
    Ok(Arc::new(GitHubClient::new(octocrab)))
}

/// Runs a single command against the accessor.
#[instrument(skip(accessor, out))]
pub async fn execute<W: Write>(
    accessor: &ActivityAccessor,
    command: &Commands,
    out: &mut W,
) -> Result<(), Error> {
    match command {
        Commands::Context => {
            if let Some(number) = accessor.activity_number() {
                writeln!(out, "{}", number)?;
            }
        }
        Commands::Label { labels } => {
            if let Some(applied) = accessor.apply_labels(labels).await? {
                for label in applied {
                    writeln!(out, "{}", label.name)?;
                }
            }
        }
        Commands::Pulls {
            page,
            title_contains,
        } => {
            let pulls = accessor.list_pull_requests(*page).await?;
            let pulls = match title_contains {
                Some(needle) => filter_by_title(pulls, needle),
                None => pulls,
            };
            for pull in pulls {
                writeln!(out, "#{}\t{}\t{}", pull.number, pull.state, pull.title)?;
            }
        }
        Commands::Author => {
            if let Some(author) = accessor.activity_author().await? {
                writeln!(out, "{}", author)?;
            }
        }
        Commands::CountPrs => {
            if let Some(count) = accessor.count_author_pull_requests().await? {
                writeln!(out, "{}", count)?;
            }
        }
        Commands::Comment { body } => {
            if let Some(comment) = accessor.write_comment(body).await? {
                info!(comment_id = comment.id, "Comment posted");
                match comment.html_url {
                    Some(url) => writeln!(out, "{}", url)?,
                    None => writeln!(out, "{}", comment.id)?,
                }
            }
        }
        Commands::Version => {
            writeln!(out, "pr-activity version {}", version())?;
        }
    }

    out.flush()?;
    Ok(())
}

/// Keeps the pull requests whose title contains `needle`, ignoring case.
pub fn filter_by_title(pulls: Vec<PullRequest>, needle: &str) -> Vec<PullRequest> {
    let needle = needle.to_lowercase();
    pulls
        .into_iter()
        .filter(|pull| pull.title.to_lowercase().contains(&needle))
        .collect()
}

/// The version baked in at build time.
pub fn version() -> &'static str {
    option_env!("PR_ACTIVITY_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}
