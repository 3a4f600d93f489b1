//! Configuration management for the pr-activity CLI.
//!
//! Settings come from three places, highest precedence first:
//! 1. Command-line flags, or the `GITHUB_*` environment variables GitHub Actions
//!    sets for every step (clap reads both)
//! 2. An optional TOML configuration file
//! 3. Built-in defaults
//!
//! The configuration file is looked up as `pr-activity.toml` in the current
//! directory unless a path is given explicitly.

use std::{
    fs,
    path::{Path, PathBuf},
};

use activity_core::RepositoryId;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::errors::Error;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "pr-activity.toml";

/// API endpoint used when nothing else is configured
pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Contents of the TOML configuration file.
///
/// # Example TOML Configuration
///
/// ```toml
/// [github]
/// api_url = "https://github.example.com/api/v3"
/// repository = "octo-org/octo-repo"
/// event_path = "/tmp/event.json"
/// ```
#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub github: GitHubSettings,
}

/// The `[github]` section of the configuration file.
#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct GitHubSettings {
    /// Base URL of the GitHub REST API
    #[serde(default)]
    pub api_url: Option<String>,

    /// Repository in `owner/name` form
    #[serde(default)]
    pub repository: Option<String>,

    /// Path of the webhook payload describing the triggering event
    #[serde(default)]
    pub event_path: Option<PathBuf>,
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Default, Clone)]
pub struct SettingOverrides {
    pub api_url: Option<String>,
    pub repository: Option<String>,
    pub event_path: Option<PathBuf>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub api_url: String,
    pub repository: Option<RepositoryId>,
    pub event_path: Option<PathBuf>,
}

impl AppConfig {
    /// Loads configuration from a TOML file at the specified path.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file does not exist, cannot be read or does
    /// not contain a valid configuration.
    pub fn load(path: &Path) -> Result<Self, Error> {
        debug!("Loading configuration from {:?}", path);

        if !path.exists() {
            return Err(Error::Config(format!(
                "Configuration file not found: {:?}",
                path
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read configuration file: {}", e)))?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse configuration file: {}", e)))?;

        Ok(config)
    }

    /// Loads the configuration for a run.
    ///
    /// An explicitly requested file must exist. The default file is optional and an
    /// empty configuration is used when it is absent.
    pub fn load_for_run(explicit_path: Option<&Path>) -> Result<Self, Error> {
        match explicit_path {
            Some(path) => Self::load(path),
            None => {
                let default_path = get_config_path(None);
                if default_path.exists() {
                    Self::load(&default_path)
                } else {
                    debug!("No configuration file found, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Combines this configuration with command-line values into the settings of a run.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the API URL is not a valid http(s) URL or the
    /// repository is not in `owner/name` form.
    pub fn resolve(&self, overrides: &SettingOverrides) -> Result<RunSettings, Error> {
        let api_url = overrides
            .api_url
            .clone()
            .or_else(|| self.github.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        validate_api_url(&api_url)?;

        let repository = overrides
            .repository
            .as_deref()
            .or(self.github.repository.as_deref())
            .map(|value| {
                value
                    .parse::<RepositoryId>()
                    .map_err(|e| Error::Config(e.to_string()))
            })
            .transpose()?;

        let event_path = overrides
            .event_path
            .clone()
            .or_else(|| self.github.event_path.clone());

        let settings = RunSettings {
            api_url,
            repository,
            event_path,
        };
        debug!(settings = ?settings, "Resolved run settings");
        Ok(settings)
    }
}

/// Returns the path of the configuration file to use.
pub fn get_config_path(path: Option<&str>) -> PathBuf {
    match path {
        Some(p) => PathBuf::from(p),
        None => PathBuf::from(DEFAULT_CONFIG_FILENAME),
    }
}

fn validate_api_url(value: &str) -> Result<(), Error> {
    let url = Url::parse(value)
        .map_err(|e| Error::Config(format!("Invalid API URL '{}': {}", value, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(Error::Config(format!(
            "Invalid API URL '{}': unsupported scheme '{}'",
            value, scheme
        ))),
    }
}
