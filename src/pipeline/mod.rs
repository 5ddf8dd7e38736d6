//! The news pipeline.
//!
//! ```text
//! FeedSource → Normalizer → Classifier → date range → NewsItem::build
//!            → dedup → sort (newest first) → limit → summarize
//! ```
//!
//! Everything up to the limit is synchronous and pure; only retrieval and
//! summarization await. Records dropped along the way are not reported as
//! errors; [`NewsFetcher::fetch_with_stats`] exposes per-stage counts for
//! callers that want them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::Result;
use crate::classifier::{is_news, ClassifierRules, Filters};
use crate::dedup::dedup;
use crate::domain::{CanonicalRecord, NewsItem, RawEntry};
use crate::fetcher::FeedSource;
use crate::normalizer::Normalizer;
use crate::summarize::{build_summarizer, summarize_with, SummarizeOptions, Summarizer};

/// Settings for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchOptions {
    pub filters: Filters,
    pub rules: ClassifierRules,
    /// Keep at most this many items; `None` or 0 keeps everything
    pub limit: Option<usize>,
    /// Inclusive lower bound on `published_at`
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `published_at`
    pub end_date: Option<DateTime<Utc>>,
    pub summarize: bool,
    pub summarize_options: SummarizeOptions,
}

impl FetchOptions {
    fn effective_limit(&self) -> Option<usize> {
        self.limit.filter(|&l| l > 0)
    }

    fn has_date_range(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }

    fn in_date_range(&self, record: &CanonicalRecord) -> bool {
        let Some(published_at) = record.published_at else {
            return false;
        };
        if self.start_date.is_some_and(|start| published_at < start) {
            return false;
        }
        !self.end_date.is_some_and(|end| published_at > end)
    }
}

/// How many entries each stage let through or dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    pub retrieved: usize,
    pub rejected: usize,
    pub out_of_range: usize,
    pub malformed: usize,
    pub duplicates: usize,
    pub truncated: usize,
    pub summarized: usize,
}

pub struct NewsFetcher {
    source: Arc<dyn FeedSource>,
    options: FetchOptions,
    normalizer: Normalizer,
    summarizer: Option<Arc<dyn Summarizer>>,
}

impl NewsFetcher {
    pub fn new(source: Arc<dyn FeedSource>, options: FetchOptions) -> Self {
        Self {
            source,
            options,
            normalizer: Normalizer::new(),
            summarizer: None,
        }
    }

    /// Use `summarizer` instead of the provider named in the options.
    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    /// Retrieve, filter, and order news items from `urls`.
    ///
    /// Fails only when summarization is enabled and its provider cannot be
    /// constructed; that check happens before any feed is retrieved.
    pub async fn fetch(&self, urls: &[String]) -> Result<Vec<NewsItem>> {
        let (items, _) = self.fetch_with_stats(urls).await?;
        Ok(items)
    }

    pub async fn fetch_with_stats(
        &self,
        urls: &[String],
    ) -> Result<(Vec<NewsItem>, PipelineStats)> {
        let summarizer = if self.options.summarize {
            Some(match &self.summarizer {
                Some(summarizer) => summarizer.clone(),
                None => build_summarizer(&self.options.summarize_options)?,
            })
        } else {
            None
        };

        let entries = self.source.fetch_entries(urls).await;
        let (items, mut stats) = self.process(&entries);

        let items = match summarizer {
            Some(summarizer) if !summarizer.is_noop() => {
                stats.summarized = items.len();
                summarize_with(summarizer, items, &self.options.summarize_options).await
            }
            _ => items,
        };

        info!(
            "Pipeline kept {} of {} entries ({} rejected, {} out of range, {} malformed, {} duplicates, {} over limit)",
            items.len(),
            stats.retrieved,
            stats.rejected,
            stats.out_of_range,
            stats.malformed,
            stats.duplicates,
            stats.truncated
        );
        Ok((items, stats))
    }

    /// Run the synchronous stages over already retrieved entries.
    pub fn process(&self, entries: &[RawEntry]) -> (Vec<NewsItem>, PipelineStats) {
        let options = &self.options;
        let mut stats = PipelineStats {
            retrieved: entries.len(),
            ..Default::default()
        };

        let accepted: Vec<CanonicalRecord> = entries
            .iter()
            .map(|entry| self.normalizer.normalize(entry))
            .filter(|record| is_news(record, &options.filters, &options.rules))
            .collect();
        stats.rejected = entries.len() - accepted.len();

        let in_range: Vec<CanonicalRecord> = if options.has_date_range() {
            let before = accepted.len();
            let kept: Vec<_> = accepted
                .into_iter()
                .filter(|record| options.in_date_range(record))
                .collect();
            stats.out_of_range = before - kept.len();
            kept
        } else {
            accepted
        };

        let mut items = Vec::with_capacity(in_range.len());
        for record in in_range {
            match NewsItem::build(record) {
                Ok(item) => items.push(item),
                Err(e) => {
                    stats.malformed += 1;
                    debug!("Dropping record: {}", e);
                }
            }
        }

        let before = items.len();
        let mut items = dedup(items);
        stats.duplicates = before - items.len();

        // Stable: equal timestamps keep their relative order
        items.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        if let Some(limit) = options.effective_limit() {
            stats.truncated = items.len().saturating_sub(limit);
            items.truncate(limit);
        }

        debug!("Processed {} entries into {} items", entries.len(), items.len());
        (items, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::NewsdeskError;
    use crate::domain::{RawTag, RawTime};
    use crate::fetcher::StaticSource;
    use crate::summarize::testing::MockSummarizer;
    use crate::summarize::NullSummarizer;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, hour, 0, 0).unwrap()
    }

    fn entry(title: &str, link: &str, hour: u32) -> RawEntry {
        RawEntry {
            title: Some(title.into()),
            summary: Some(format!("Summary of {}", title)),
            link: Some(link.into()),
            published_parsed: Some(RawTime::from(at(hour))),
            ..Default::default()
        }
    }

    /// `"<prefix> <n>"` linked to `https://x.test/<n>`, published at hour `n`.
    fn numbered(prefix: &str, n: u32) -> RawEntry {
        entry(&format!("{} {}", prefix, n), &format!("https://x.test/{}", n), n)
    }

    fn fetcher(entries: Vec<RawEntry>, options: FetchOptions) -> NewsFetcher {
        NewsFetcher::new(Arc::new(StaticSource::new(entries)), options)
    }

    fn urls() -> Vec<String> {
        vec!["https://feed.test/rss".to_string()]
    }

    #[test]
    fn test_process_filters_dedups_and_sorts() {
        let entries = vec![
            entry("Morning briefing on markets", "https://x.test/a", 8),
            entry("공지", "https://x.test/notice", 9),
            entry("Evening wrap of the day's news", "https://x.test/b", 20),
            RawEntry {
                published_parsed: None,
                ..entry("Undated article without time", "https://x.test/c", 0)
            },
            entry("Morning briefing on markets (dup)", "https://x.test/a", 7),
            entry("Midday political roundup", "https://x.test/d", 12),
        ];
        let nf = fetcher(Vec::new(), FetchOptions::default());
        let (items, stats) = nf.process(&entries);

        let links: Vec<_> = items.iter().map(|i| i.link.as_str()).collect();
        assert_eq!(
            links,
            vec!["https://x.test/b", "https://x.test/d", "https://x.test/a"]
        );
        assert_eq!(items[2].title, "Morning briefing on markets");
        assert_eq!(stats.retrieved, 6);
        assert_eq!(stats.rejected, 2);
        assert_eq!(stats.duplicates, 1);
        assert_eq!(stats.malformed, 0);
    }

    #[test]
    fn test_sort_is_stable_for_equal_timestamps() {
        let entries = vec![
            entry("First story with same time", "https://x.test/1", 10),
            entry("Later story at eleven o'clock", "https://x.test/2", 11),
            entry("Second story with same time", "https://x.test/3", 10),
            entry("Third story with same time", "https://x.test/4", 10),
        ];
        let (items, _) = fetcher(Vec::new(), FetchOptions::default()).process(&entries);
        let links: Vec<_> = items.iter().map(|i| i.link.as_str()).collect();
        assert_eq!(
            links,
            vec![
                "https://x.test/2",
                "https://x.test/1",
                "https://x.test/3",
                "https://x.test/4"
            ]
        );
    }

    #[test]
    fn test_guid_and_link_dedup_scenario() {
        let with_guid = RawEntry {
            id: Some("g1".into()),
            ..entry("Story published with a guid", "https://x.test/a", 10)
        };
        let without_guid = entry("Story published without guid", "https://x.test/a", 9);
        let (items, stats) =
            fetcher(Vec::new(), FetchOptions::default()).process(&[with_guid, without_guid]);
        assert_eq!(items.len(), 2);
        assert_eq!(stats.duplicates, 0);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let entries: Vec<_> = (8..=14)
            .map(|h| numbered("Hourly bulletin number", h))
            .collect();
        let options = FetchOptions {
            start_date: Some(at(10)),
            end_date: Some(at(12)),
            ..Default::default()
        };
        let (items, stats) = fetcher(Vec::new(), options).process(&entries);
        let hours: Vec<_> = items.iter().map(|i| i.published_at).collect();
        assert_eq!(hours, vec![at(12), at(11), at(10)]);
        assert_eq!(stats.out_of_range, 4);
    }

    #[test]
    fn test_open_ended_date_range() {
        let entries = vec![
            entry("Old news from the early morning", "https://x.test/old", 1),
            entry("Fresh news from the late evening", "https://x.test/new", 23),
        ];
        let options = FetchOptions {
            start_date: Some(at(12)),
            ..Default::default()
        };
        let (items, _) = fetcher(Vec::new(), options).process(&entries);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].link, "https://x.test/new");
    }

    #[test]
    fn test_limit_and_filters() {
        let mut entries: Vec<_> = (0..6)
            .map(|h| {
                let mut e = numbered("Technology report part", h);
                e.tags = vec![RawTag::new("IT")];
                e.language = Some("EN".into());
                e
            })
            .collect();
        entries.push(RawEntry {
            tags: vec![RawTag::new("Sports")],
            ..entry("Football results from the weekend", "https://x.test/f", 23)
        });

        let options = FetchOptions {
            filters: Filters {
                language: Some("en".into()),
                categories: vec!["it".into()],
                ..Default::default()
            },
            limit: Some(3),
            ..Default::default()
        };
        let (items, stats) = fetcher(Vec::new(), options).process(&entries);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].link, "https://x.test/5");
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.truncated, 3);
    }

    #[test]
    fn test_zero_limit_keeps_everything() {
        let entries: Vec<_> = (0..4)
            .map(|h| numbered("Regional update number", h))
            .collect();
        let options = FetchOptions {
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(fetcher(Vec::new(), options).process(&entries).0.len(), 4);
    }

    #[tokio::test]
    async fn test_fetch_summarizes_after_limit() {
        let entries: Vec<_> = (0..10)
            .map(|h| numbered("Economy news number", h))
            .collect();
        let mock = Arc::new(MockSummarizer::default());
        let options = FetchOptions {
            limit: Some(3),
            summarize: true,
            summarize_options: SummarizeOptions {
                max_workers: 2,
                ..Default::default()
            },
            ..Default::default()
        };
        let (items, stats) = fetcher(entries, options)
            .with_summarizer(mock.clone())
            .fetch_with_stats(&urls())
            .await
            .unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(mock.call_count(), 3);
        assert_eq!(stats.summarized, 3);
        assert_eq!(items[0].summary, "AI: Economy news number 9");
        assert_eq!(items[2].summary, "AI: Economy news number 7");
    }

    #[tokio::test]
    async fn test_fetch_without_summarize_flag_skips_provider() {
        let entries = vec![entry("Plain article about weather", "https://x.test/w", 5)];
        let mock = Arc::new(MockSummarizer::default());
        let items = fetcher(entries, FetchOptions::default())
            .with_summarizer(mock.clone())
            .fetch(&urls())
            .await
            .unwrap();
        assert_eq!(items[0].summary, "Summary of Plain article about weather");
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_null_provider_not_counted() {
        let entries = vec![entry("Plain article about weather", "https://x.test/w", 5)];
        let options = FetchOptions {
            summarize: true,
            ..Default::default()
        };
        let (items, stats) = fetcher(entries, options)
            .with_summarizer(Arc::new(NullSummarizer))
            .fetch_with_stats(&urls())
            .await
            .unwrap();
        assert_eq!(items[0].summary, "Summary of Plain article about weather");
        assert_eq!(stats.summarized, 0);
    }

    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl FeedSource for CountingSource {
        async fn fetch_entries(&self, _urls: &[String]) -> Vec<RawEntry> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Vec::new()
        }
    }

    #[tokio::test]
    async fn test_provider_configuration_failure_is_fatal() {
        if std::env::var("OPENAI_API_KEY").is_ok_and(|k| !k.trim().is_empty()) {
            return;
        }
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let options = FetchOptions {
            summarize: true,
            summarize_options: SummarizeOptions {
                provider: "openai".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = NewsFetcher::new(source.clone(), options)
            .fetch(&urls())
            .await
            .unwrap_err();
        assert!(matches!(err, NewsdeskError::ProviderConfig(_)));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fetch_handles_empty_source() {
        let items = fetcher(Vec::new(), FetchOptions::default())
            .fetch(&urls())
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_in_date_range_requires_timestamp() {
        let options = FetchOptions {
            end_date: Some(at(12) + Duration::hours(1)),
            ..Default::default()
        };
        let record = CanonicalRecord::default();
        assert!(!options.in_date_range(&record));
    }
}
