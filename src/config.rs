use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::release::TagFilter;

// =============================================================================
// Defaults
// =============================================================================

/// Default base URL for the GitHub API
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Releases requested per page (GitHub's maximum)
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Timeout for a single HTTP request in milliseconds (30 seconds)
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 30_000;

/// Environment variable holding a GitHub token
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Environment variable holding the log filter directive
pub const LOG_ENV: &str = "RELEASE_CHECK_LOG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckerConfig {
    pub github: GitHubConfig,
    pub selection: SelectionConfig,
    pub logging: LoggingConfig,
}

/// GitHub release source configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GitHubConfig {
    pub base_url: String,
    pub per_page: u32,
    pub token: Option<String>,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GITHUB_API_URL.to_string(),
            per_page: DEFAULT_PER_PAGE,
            token: None,
            timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
        }
    }
}

/// Latest-release selection configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectionConfig {
    /// Ignore releases whose tag is not a semantic version
    pub only_semver_tags: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            only_semver_tags: true,
        }
    }
}

impl SelectionConfig {
    pub fn tag_filter(&self) -> TagFilter {
        TagFilter::from_only_semver_tags(self.only_semver_tags)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Also write logs to `log_path()`
    pub file: bool,
    /// Write file logs as JSON lines
    pub json: bool,
}

impl CheckerConfig {
    /// Load configuration from a JSON file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Override the GitHub token with `GITHUB_TOKEN` when it is set
    pub fn with_env_token(self) -> Self {
        self.with_token(std::env::var(TOKEN_ENV).ok())
    }

    fn with_token(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.github.token = Some(token);
        }
        self
    }
}

/// Returns the path to the data directory for release-check.
/// Uses $XDG_DATA_HOME/release-check if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/release-check,
/// or ./release-check if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("release-check.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("release-check")
}
