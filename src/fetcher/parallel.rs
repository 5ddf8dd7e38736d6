use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::app::Result;
use crate::domain::RawEntry;
use crate::fetcher::parser::parse_entries;
use crate::fetcher::{FeedSource, Fetcher};

pub const DEFAULT_WORKERS: usize = 10;

/// Fetches several feeds concurrently, at most `workers` at a time.
pub struct ParallelFetcher {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    workers: usize,
}

impl ParallelFetcher {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self::with_workers(fetcher, DEFAULT_WORKERS)
    }

    pub fn with_workers(fetcher: Arc<dyn Fetcher + Send + Sync>, workers: usize) -> Self {
        Self {
            fetcher,
            workers: workers.max(1),
        }
    }

    /// Per-URL results, in the order the URLs were given.
    pub async fn fetch_all(&self, urls: &[String]) -> Vec<(String, Result<Vec<RawEntry>>)> {
        stream::iter(urls.iter().cloned())
            .map(|url| {
                let fetcher = self.fetcher.clone();
                async move {
                    let result = fetch_single_feed(&fetcher, &url).await;
                    (url, result)
                }
            })
            .buffered(self.workers)
            .collect()
            .await
    }
}

async fn fetch_single_feed(
    fetcher: &Arc<dyn Fetcher + Send + Sync>,
    url: &str,
) -> Result<Vec<RawEntry>> {
    let body = fetcher.fetch(url).await?;
    let entries = parse_entries(&body)?;
    debug!("Parsed {} entries from {}", entries.len(), url);
    Ok(entries)
}

#[async_trait]
impl FeedSource for ParallelFetcher {
    async fn fetch_entries(&self, urls: &[String]) -> Vec<RawEntry> {
        let mut all = Vec::new();
        let mut failed = 0;

        for (url, result) in self.fetch_all(urls).await {
            match result {
                Ok(entries) => all.extend(entries),
                Err(e) => {
                    failed += 1;
                    warn!("Skipping feed {}: {}", url, e);
                }
            }
        }

        info!(
            "Retrieved {} entries from {} feeds ({} failed)",
            all.len(),
            urls.len(),
            failed
        );
        all
    }
}
