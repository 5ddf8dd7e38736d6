//! Feed retrieval.
//!
//! Retrieval sits outside the news pipeline proper: it turns URLs into
//! [`RawEntry`] values and absorbs per-feed failures so the pipeline only
//! ever sees entries.

pub mod http_fetcher;
pub mod parallel;
pub mod parser;

use async_trait::async_trait;
use tracing::warn;

use crate::app::Result;
use crate::domain::RawEntry;

/// Downloads the raw bytes of a feed.
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Produces raw entries for a set of feed URLs.
///
/// Aggregation is best effort: a URL that cannot be fetched or parsed is
/// skipped, never reported as an error.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_entries(&self, urls: &[String]) -> Vec<RawEntry>;
}

/// Feed source serving a fixed list of entries, whatever URLs are requested.
///
/// Used for offline runs over entries loaded from a file.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    entries: Vec<RawEntry>,
}

impl StaticSource {
    pub fn new(entries: Vec<RawEntry>) -> Self {
        Self { entries }
    }

    /// Load entries from a JSON array of raw entry objects.
    ///
    /// Only a document that is not a JSON array is an error. An element that
    /// does not have the shape of an entry is skipped with a warning.
    pub fn from_json(json: &str) -> Result<Self> {
        let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
        let mut entries = Vec::with_capacity(values.len());

        for (index, value) in values.into_iter().enumerate() {
            match serde_json::from_value::<RawEntry>(value) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("Skipping raw entry #{}: {}", index, e),
            }
        }

        Ok(Self::new(entries))
    }
}

#[async_trait]
impl FeedSource for StaticSource {
    async fn fetch_entries(&self, _urls: &[String]) -> Vec<RawEntry> {
        self.entries.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_source_from_json() {
        let source = StaticSource::from_json(
            r#"[{"title": "One", "link": "https://x.test/1"}, {"title": "Two"}]"#,
        )
        .unwrap();
        let entries = tokio_test::block_on(source.fetch_entries(&[]));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].link.as_deref(), Some("https://x.test/1"));
    }

    #[test]
    fn test_static_source_rejects_bad_json() {
        assert!(StaticSource::from_json("{not json").is_err());
        assert!(StaticSource::from_json(r#"{"title": "not an array"}"#).is_err());
    }

    #[test]
    fn test_static_source_skips_malformed_entries() {
        let source = StaticSource::from_json(
            r#"[
                {"title": "Good", "link": "https://x.test/good"},
                {"title": "Odd date", "published_parsed": {"year": 2024, "month": -1, "day": 1}},
                {"title": 42, "link": "https://x.test/bad"},
                "not an object"
            ]"#,
        )
        .unwrap();
        let entries = tokio_test::block_on(source.fetch_entries(&[]));

        let titles: Vec<_> = entries.iter().filter_map(|e| e.title.as_deref()).collect();
        assert_eq!(titles, vec!["Good", "Odd date"]);
        assert_eq!(entries[1].published_parsed.and_then(|t| t.to_utc()), None);
    }
}
