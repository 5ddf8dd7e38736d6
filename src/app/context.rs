use std::sync::Arc;

use crate::app::error::Result;
use crate::config::Config;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::parallel::ParallelFetcher;
use crate::fetcher::{FeedSource, Fetcher};
use crate::pipeline::{FetchOptions, NewsFetcher};

pub struct AppContext {
    pub config: Config,
    pub source: Arc<dyn FeedSource>,
}

impl AppContext {
    /// Wire an HTTP-backed feed source from `config.fetch`.
    pub fn new(config: Config) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::with_settings(
            config.fetch.timeout(),
            &config.fetch.user_agent,
        )?);
        let source: Arc<dyn FeedSource> =
            Arc::new(ParallelFetcher::with_workers(fetcher, config.fetch.workers));

        Ok(Self { config, source })
    }

    /// Use a pre-built source (e.g. entries read from a file) instead of HTTP.
    pub fn with_source(config: Config, source: Arc<dyn FeedSource>) -> Self {
        Self { config, source }
    }

    pub fn news_fetcher(&self, options: FetchOptions) -> NewsFetcher {
        NewsFetcher::new(self.source.clone(), options)
    }
}
