//! # Newsdesk
//!
//! Collects news from RSS/Atom feeds, drops what isn't news, and optionally
//! rewrites summaries with an AI provider.
//!
//! ## Architecture
//!
//! ```text
//! Fetcher → Normalizer → Classifier → NewsItem → Dedup → sort/limit → Summarize
//! ```
//!
//! Retrieval is best effort: a feed that fails to download or parse is
//! skipped. Every stage after it works on plain values, so the same pipeline
//! runs over entries loaded from a file.
//!
//! ## Quick Start
//!
//! ```bash
//! # Latest ten items from two feeds
//! newsdesk fetch https://example.com/rss https://example.org/atom --limit 10
//!
//! # Korean items only, summarized with Gemini
//! GOOGLE_API_KEY=... newsdesk fetch https://example.com/rss -l ko -s --provider gemini
//!
//! # Run the pipeline over raw entries saved as JSON
//! newsdesk fetch --entries entries.json --stats
//! ```
//!
//! ## Modules
//!
//! - [`app`]: Application context and error types
//! - [`classifier`]: News/non-news heuristics and user filters
//! - [`cli`]: Command-line interface definitions
//! - [`config`]: Configuration file
//! - [`dedup`]: Duplicate removal
//! - [`domain`]: Raw entries, canonical records and news items
//! - [`fetcher`]: Feed retrieval and parsing
//! - [`normalizer`]: Raw entry normalization
//! - [`pipeline`]: The orchestrator tying the stages together
//! - [`summarize`]: AI summarization providers and the concurrent stage

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the
/// configuration, the feed source and the pipeline.
pub mod app;

/// News classification.
///
/// [`is_news`](classifier::is_news) applies structural checks (timestamp,
/// link, title length, excluded title terms) and then the user's
/// [`Filters`](classifier::Filters).
pub mod classifier;

/// Command-line interface using clap.
///
/// - `fetch <url>...` - Fetch, filter and print news items
/// - `config show` - Print the effective configuration
/// - `config path` - Print the config file location
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/newsdesk/config.toml`, supporting default filters,
/// classifier rules, summarization and fetch settings.
pub mod config;

/// Order-preserving deduplication by guid, link, or a title/source hash.
pub mod dedup;

/// Core domain models.
///
/// - [`RawEntry`](domain::RawEntry): Feed entry as delivered, every field optional
/// - [`CanonicalRecord`](domain::CanonicalRecord): Normalized, unvalidated record
/// - [`NewsItem`](domain::NewsItem): Validated pipeline output
pub mod domain;

/// Feed retrieval.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for downloading a feed
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
/// - [`ParallelFetcher`](fetcher::parallel::ParallelFetcher): Concurrent, best-effort aggregation
/// - [`parser`](fetcher::parser): RSS 0.9x/1.0/2.0, Atom and JSON Feed parsing
pub mod fetcher;

/// Converts raw entries into [`CanonicalRecord`](domain::CanonicalRecord)s.
pub mod normalizer;

/// The news pipeline. See [`NewsFetcher`](pipeline::NewsFetcher).
pub mod pipeline;

/// AI summarization.
///
/// - [`Summarizer`](summarize::Summarizer): Async trait for providers
/// - [`OpenAiSummarizer`](summarize::OpenAiSummarizer) and
///   [`GeminiSummarizer`](summarize::GeminiSummarizer)
/// - [`summarize_items`](summarize::summarize_items): Bounded concurrent stage
pub mod summarize;
