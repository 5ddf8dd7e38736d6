use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::{NewsdeskError, Result};
use crate::domain::CanonicalRecord;

pub const UNKNOWN_SOURCE: &str = "unknown";

/// A validated news item. This is the public output of the pipeline.
///
/// Items are treated as values: later stages produce new items instead of
/// mutating existing ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub summary: String,
    pub link: String,
    pub source: String,
    pub published_at: DateTime<Utc>,
    pub language: Option<String>,
    pub category: Option<String>,
    pub guid: Option<String>,
}

impl NewsItem {
    /// Build an item from a canonical record.
    ///
    /// Fails with [`NewsdeskError::MissingRequiredField`] when the record has
    /// no link or no publication time, whatever the classifier decided.
    pub fn build(record: CanonicalRecord) -> Result<Self> {
        if record.link.is_empty() {
            return Err(NewsdeskError::MissingRequiredField("link"));
        }
        let published_at = record
            .published_at
            .ok_or(NewsdeskError::MissingRequiredField("published_at"))?;

        let source = if record.source.is_empty() {
            UNKNOWN_SOURCE.to_string()
        } else {
            record.source
        };

        Ok(Self {
            title: record.title,
            summary: record.summary,
            link: record.link,
            source,
            published_at,
            language: record.language,
            category: record.category,
            guid: record.guid,
        })
    }

    /// Copy of this item carrying a different summary.
    pub fn with_summary(&self, summary: String) -> Self {
        Self {
            summary,
            ..self.clone()
        }
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "(Untitled)"
        } else {
            &self.title
        }
    }
}
