//! AI summarization of news items.
//!
//! # Architecture
//!
//! ```text
//! SummarizeOptions → build_summarizer → Arc<dyn Summarizer>
//!                                            ↓
//! Vec<NewsItem> → summarize_with (bounded task pool) → Vec<NewsItem>
//! ```
//!
//! Providers sit behind the [`Summarizer`] trait. A provider that cannot be
//! constructed (missing API key, broken HTTP client) fails the whole run with
//! [`NewsdeskError::ProviderConfig`]. A provider call that fails only affects
//! its own item, which keeps its original summary.
//!
//! # Usage
//!
//! ```rust,ignore
//! use newsdesk::summarize::{summarize_items, SummarizeOptions};
//!
//! let options = SummarizeOptions { provider: "gemini".into(), ..Default::default() };
//! let items = summarize_items(items, &options).await?;
//! ```

mod gemini;
mod openai;
mod stage;

pub use gemini::GeminiSummarizer;
pub use openai::OpenAiSummarizer;
pub use stage::{summarize_items, summarize_with, truncate_chars};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::app::{NewsdeskError, Result};

pub const APPEND_SEPARATOR: &str = "\n\n[AI 요약]\n";

/// Language the providers are asked to answer in when no hint is given.
pub const DEFAULT_SUMMARY_LANGUAGE: &str = "ko";

/// Input handed to a provider for one item.
#[derive(Debug, Clone, Copy)]
pub struct SummaryRequest<'a> {
    pub title: &'a str,
    /// Title and summary joined, already truncated to the configured budget
    pub text: &'a str,
    pub link: &'a str,
    pub language: Option<&'a str>,
}

impl SummaryRequest<'_> {
    pub fn language_or_default(&self) -> &str {
        self.language
            .filter(|l| !l.trim().is_empty())
            .unwrap_or(DEFAULT_SUMMARY_LANGUAGE)
    }
}

/// Summarization capability implemented by each provider.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &'static str;

    /// Produce summary text for one item.
    ///
    /// Implementations enforce their own timeout and return an error for
    /// transport failures as well as for empty responses.
    async fn summarize(&self, request: SummaryRequest<'_>) -> Result<String>;

    /// Providers that never change anything can be skipped entirely.
    fn is_noop(&self) -> bool {
        false
    }
}

/// Provider used when summarization is disabled or the provider is unknown.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSummarizer;

#[async_trait]
impl Summarizer for NullSummarizer {
    fn name(&self) -> &'static str {
        "null"
    }

    async fn summarize(&self, request: SummaryRequest<'_>) -> Result<String> {
        Ok(request.text.to_string())
    }

    fn is_noop(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Gemini,
    Null,
}

impl Provider {
    /// Unknown names select the null provider.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "openai" => Self::OpenAi,
            "gemini" | "google" | "googleai" => Self::Gemini,
            _ => Self::Null,
        }
    }
}

/// How the generated text is combined with the existing summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Replace,
    Append,
}

impl Strategy {
    pub fn apply(&self, original: &str, generated: &str) -> String {
        match self {
            Self::Replace => generated.to_string(),
            Self::Append if original.is_empty() => generated.to_string(),
            Self::Append => format!("{}{}{}", original, APPEND_SEPARATOR, generated),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizeOptions {
    /// "openai", "gemini" (aliases "google", "googleai"); anything else disables summarization
    pub provider: String,
    /// Model override; falls back to the provider's environment variable, then its default
    pub model: Option<String>,
    /// Maximum characters of title + summary sent to the provider (0 or less: unlimited)
    pub max_input_chars: i64,
    /// Concurrent provider calls (1 = strictly serial)
    pub max_workers: usize,
    /// Per-call timeout enforced by the provider
    pub timeout_secs: u64,
    pub strategy: Strategy,
    /// Language the summary should be written in
    pub language: Option<String>,
}

impl Default for SummarizeOptions {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: None,
            max_input_chars: 4000,
            max_workers: 4,
            timeout_secs: 15,
            strategy: Strategy::Replace,
            language: None,
        }
    }
}

impl SummarizeOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Construct the provider named in `options`.
pub fn build_summarizer(options: &SummarizeOptions) -> Result<Arc<dyn Summarizer>> {
    let summarizer: Arc<dyn Summarizer> = match Provider::from_name(&options.provider) {
        Provider::OpenAi => Arc::new(OpenAiSummarizer::from_env(
            options.model.as_deref(),
            options.timeout(),
        )?),
        Provider::Gemini => Arc::new(GeminiSummarizer::from_env(
            options.model.as_deref(),
            options.timeout(),
        )?),
        Provider::Null => Arc::new(NullSummarizer),
    };
    tracing::debug!("Using summarization provider {}", summarizer.name());
    Ok(summarizer)
}

/// Read an API key, treating blank values as missing.
fn require_key(value: Option<String>, var_names: &str) -> Result<String> {
    value
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .ok_or_else(|| NewsdeskError::ProviderConfig(format!("{} not set", var_names)))
}

fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("newsdesk/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| NewsdeskError::ProviderConfig(format!("failed to build HTTP client: {}", e)))
}
