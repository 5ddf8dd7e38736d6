//! Configuration management for newsdesk.
//!
//! Configuration is read from `~/.config/newsdesk/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::classifier::{ClassifierRules, Filters};
use crate::fetcher::http_fetcher::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::fetcher::parallel::DEFAULT_WORKERS;
use crate::pipeline::FetchOptions;
use crate::summarize::SummarizeOptions;

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub filters: FilterConfig,
    pub classifier: ClassifierRules,
    pub summarize: SummarizeConfig,
    pub fetch: FetchConfig,
}

/// Default user filters applied to every run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub language: Option<String>,
    pub categories: Vec<String>,
    pub include_keywords: Vec<String>,
    pub exclude_keywords: Vec<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizeConfig {
    /// Summarize items on every run (default: false)
    pub enabled: bool,
    #[serde(flatten)]
    pub options: SummarizeOptions,
}

/// Feed retrieval settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Feeds downloaded concurrently (default: 10)
    pub workers: usize,
    /// Per-request timeout in seconds (default: 10)
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/newsdesk/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("newsdesk").join("config.toml"))
    }

    /// Pipeline options described by this configuration.
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            filters: Filters {
                language: self.filters.language.clone(),
                categories: self.filters.categories.clone(),
                include_keywords: self.filters.include_keywords.clone(),
                exclude_keywords: self.filters.exclude_keywords.clone(),
            },
            rules: self.classifier.clone(),
            limit: self.filters.limit,
            start_date: None,
            end_date: None,
            summarize: self.summarize.enabled,
            summarize_options: self.summarize.options.clone(),
        }
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# newsdesk configuration
#
# Every key is optional; anything left out uses the value shown here.
# Command-line flags take precedence over this file.

[filters]
# Keep only items in this language (items without a language always pass)
# language = "ko"

# Keep only items in these categories (items without a category always pass)
categories = []

# Keep only items whose title or summary mentions one of these
include_keywords = []

# Drop items whose title or summary mentions one of these
exclude_keywords = []

# Maximum number of items returned (0 = no limit)
# limit = 20

[classifier]
# Titles shorter than this many characters are not news
min_title_length = 10

# Titles containing any of these are not news
title_excludes = ["댓글", "공지", "업데이트", "update log"]

[summarize]
# Rewrite summaries with an AI provider on every run
enabled = false

# "openai" (needs OPENAI_API_KEY) or "gemini" (needs GOOGLE_API_KEY or GEMINI_API_KEY)
provider = "openai"

# Model override; defaults to OPENAI_MODEL / GEMINI_MODEL, then the provider default
# model = "gpt-4o-mini"

# Characters of title + summary sent to the provider (0 = no limit)
max_input_chars = 4000

# Concurrent provider calls
max_workers = 4

# Per-call timeout in seconds
timeout_secs = 15

# "replace" the summary, or "append" the AI summary below it
strategy = "replace"

# Language the summary is written in
# language = "ko"

[fetch]
# Feeds downloaded concurrently
workers = 10

# Per-request timeout in seconds
timeout_secs = 10
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
