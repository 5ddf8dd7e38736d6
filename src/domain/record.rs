use chrono::{DateTime, Utc};

/// Normalized, not yet validated form of a feed entry.
///
/// Text fields are trimmed and default to the empty string; nothing here
/// guarantees the record describes a usable news item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalRecord {
    pub title: String,
    pub summary: String,
    pub link: String,
    pub source: String,
    pub published_at: Option<DateTime<Utc>>,
    pub language: Option<String>,
    pub category: Option<String>,
    pub guid: Option<String>,
}
