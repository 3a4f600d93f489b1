//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::SettingOverrides;

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;

/// pr-activity: inspect and annotate the issue or pull request that triggered a CI run
#[derive(Parser, Debug)]
#[command(name = "pr-activity")]
#[command(about = "Inspect and annotate the issue or pull request of a CI run", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./pr-activity.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Token used to authenticate with the GitHub API
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Repository in owner/name form
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// Webhook payload describing the triggering event
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: Option<PathBuf>,

    /// Base URL of the GitHub REST API
    #[arg(long, env = "GITHUB_API_URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the issue or pull request number of the run
    Context,

    /// Add labels to the issue or pull request
    Label {
        /// Labels to add
        labels: Vec<String>,
    },

    /// Print one page of the repository's pull requests
    Pulls {
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Only print pull requests whose title contains this text (case-insensitive)
        #[arg(long)]
        title_contains: Option<String>,
    },

    /// Print the login of the issue or pull request author
    Author,

    /// Print how many pull requests the author has opened in the repository
    CountPrs,

    /// Post a comment on the issue or pull request
    Comment {
        /// Markdown body of the comment
        body: String,
    },

    /// Show the CLI version
    Version,
}

impl Cli {
    /// The settings given on the command line or through the environment.
    pub fn overrides(&self) -> SettingOverrides {
        SettingOverrides {
            api_url: self.api_url.clone(),
            repository: self.repository.clone(),
            event_path: self.event_path.clone(),
        }
    }
}
