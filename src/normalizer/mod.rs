use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use url::Url;

use crate::domain::{CanonicalRecord, RawEntry, RawTime, UNKNOWN_SOURCE};

const NAIVE_DATETIME_FORMATS: &[&str] =
    &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Maps raw feed entries onto [`CanonicalRecord`]s.
///
/// Normalization never fails: fields that are missing or unusable become
/// empty strings or `None`, and every accept/reject decision is left to the
/// classifier.
#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, entry: &RawEntry) -> CanonicalRecord {
        CanonicalRecord {
            title: first_non_empty([&entry.title]).unwrap_or_default(),
            summary: first_non_empty([&entry.summary, &entry.description]).unwrap_or_default(),
            link: first_non_empty([&entry.link, &entry.origlink]).unwrap_or_default(),
            source: source_of(entry),
            published_at: published_at(entry),
            language: first_non_empty([&entry.language, &entry.dc_language, &entry.lang])
                .map(|lang| lang.to_lowercase()),
            category: entry
                .tags
                .first()
                .and_then(|tag| first_non_empty([&tag.term])),
            guid: first_non_empty([&entry.id, &entry.guid]),
        }
    }
}

fn first_non_empty<const N: usize>(candidates: [&Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .map(String::from)
}

/// Structured timestamps first (published, updated, created), then the raw
/// strings in the same order.
fn published_at(entry: &RawEntry) -> Option<DateTime<Utc>> {
    [
        &entry.published_parsed,
        &entry.updated_parsed,
        &entry.created_parsed,
    ]
    .into_iter()
    .flatten()
    .find_map(RawTime::to_utc)
    .or_else(|| {
        [&entry.published, &entry.updated, &entry.created]
            .into_iter()
            .flatten()
            .find_map(|s| parse_date(s))
    })
}

/// Parse the date formats commonly found in feeds. Strings without an offset
/// are taken to be UTC.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn source_of(entry: &RawEntry) -> String {
    if let Some(title) = entry
        .source
        .as_ref()
        .and_then(|src| first_non_empty([&src.title]))
    {
        return title;
    }

    [&entry.origlink, &entry.link]
        .into_iter()
        .flatten()
        .find_map(|link| host_of(link))
        .unwrap_or_else(|| UNKNOWN_SOURCE.to_string())
}

fn host_of(link: &str) -> Option<String> {
    let url = Url::parse(link.trim()).ok()?;
    let host = url.host_str().filter(|h| !h.is_empty())?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}
