//! Heuristic "is this a news article" predicate.
//!
//! The check runs in two layers. The structural layer rejects records that
//! cannot be news items at all (no date, no link, too-short or blacklisted
//! title). The filter layer applies the caller's language, category and
//! keyword constraints, each only when it is set.

use serde::{Deserialize, Serialize};

use crate::domain::CanonicalRecord;

pub const DEFAULT_MIN_TITLE_LENGTH: usize = 10;

pub const DEFAULT_TITLE_EXCLUDES: &[&str] = &["댓글", "공지", "업데이트", "update log"];

/// Section names typical of news feeds. Not used for filtering.
pub const CATEGORY_HINTS: &[&str] = &["politics", "economy", "society", "world", "it"];

/// Words typical of news feed titles. Not used for filtering.
pub const FEED_TITLE_HINTS: &[&str] = &["news", "press", "보도", "속보", "기사"];

/// Structural rules applied to every record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierRules {
    /// Titles shorter than this many characters are rejected
    pub min_title_length: usize,
    /// Titles containing any of these (case-insensitive) are rejected
    pub title_excludes: Vec<String>,
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self {
            min_title_length: DEFAULT_MIN_TITLE_LENGTH,
            title_excludes: DEFAULT_TITLE_EXCLUDES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Caller-supplied constraints. Empty values mean "not set".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filters {
    pub language: Option<String>,
    pub categories: Vec<String>,
    pub include_keywords: Vec<String>,
    pub exclude_keywords: Vec<String>,
}

fn contains_any<S: AsRef<str>>(text: &str, keywords: &[S]) -> bool {
    let text = text.to_lowercase();
    keywords
        .iter()
        .any(|k| text.contains(&k.as_ref().to_lowercase()))
}

pub fn is_news(record: &CanonicalRecord, filters: &Filters, rules: &ClassifierRules) -> bool {
    passes_structure(record, rules) && passes_filters(record, filters)
}

fn passes_structure(record: &CanonicalRecord, rules: &ClassifierRules) -> bool {
    if record.published_at.is_none() {
        return false;
    }
    if record.link.trim().is_empty() {
        return false;
    }

    let title = record.title.trim();
    if title.chars().count() < rules.min_title_length {
        return false;
    }
    !contains_any(title, &rules.title_excludes)
}

fn passes_filters(record: &CanonicalRecord, filters: &Filters) -> bool {
    // Records without a language or category are never rejected for it
    if let (Some(wanted), Some(lang)) = (
        filters.language.as_deref().filter(|l| !l.trim().is_empty()),
        record.language.as_deref().filter(|l| !l.trim().is_empty()),
    ) {
        if lang.trim().to_lowercase() != wanted.trim().to_lowercase() {
            return false;
        }
    }

    if !filters.categories.is_empty() {
        if let Some(category) = record.category.as_deref().map(str::trim) {
            let category = category.to_lowercase();
            if !category.is_empty()
                && !filters
                    .categories
                    .iter()
                    .any(|c| c.to_lowercase() == category)
            {
                return false;
            }
        }
    }

    let title = record.title.trim();
    let summary = record.summary.trim();

    if !filters.include_keywords.is_empty()
        && !(contains_any(title, &filters.include_keywords)
            || contains_any(summary, &filters.include_keywords))
    {
        return false;
    }

    if !filters.exclude_keywords.is_empty()
        && (contains_any(title, &filters.exclude_keywords)
            || contains_any(summary, &filters.exclude_keywords))
    {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record() -> CanonicalRecord {
        CanonicalRecord {
            title: "Parliament passes new budget bill".into(),
            summary: "Lawmakers approved the spending plan late on Friday.".into(),
            link: "https://news.example.com/politics/budget".into(),
            source: "news.example.com".into(),
            published_at: Some(Utc.with_ymd_and_hms(2024, 4, 5, 18, 0, 0).unwrap()),
            language: Some("en".into()),
            category: Some("Politics".into()),
            guid: None,
        }
    }

    fn accept(rec: &CanonicalRecord, filters: &Filters) -> bool {
        is_news(rec, filters, &ClassifierRules::default())
    }

    #[test]
    fn test_accepts_plain_news() {
        assert!(accept(&record(), &Filters::default()));
    }

    #[test]
    fn test_rejects_missing_date_or_link() {
        let mut rec = record();
        rec.published_at = None;
        assert!(!accept(&rec, &Filters::default()));

        let mut rec = record();
        rec.link = String::new();
        assert!(!accept(&rec, &Filters::default()));

        let mut rec = record();
        rec.link = String::new();
        rec.published_at = None;
        assert!(!accept(&rec, &Filters::default()));
    }

    #[test]
    fn test_rejects_short_title() {
        let mut rec = record();
        rec.title = "Too short".into();
        assert!(!accept(&rec, &Filters::default()));

        // Exactly at the limit is fine
        rec.title = "ten chars!".into();
        assert!(accept(&rec, &Filters::default()));
    }

    #[test]
    fn test_short_korean_notice_rejected() {
        let mut rec = record();
        rec.title = "공지".into();
        assert!(!accept(&rec, &Filters::default()));

        // Still rejected by length when exclusions are emptied
        let rules = ClassifierRules {
            title_excludes: vec![],
            ..Default::default()
        };
        assert!(!is_news(&rec, &Filters::default(), &rules));
    }

    #[test]
    fn test_title_length_counts_characters() {
        let mut rec = record();
        // Ten Hangul syllables: 30 bytes, 10 characters
        rec.title = "서울시새해예산안통과".into();
        assert!(accept(&rec, &Filters::default()));
    }

    #[test]
    fn test_rejects_excluded_title_vocabulary() {
        let mut rec = record();
        rec.title = "Weekly UPDATE LOG for the site".into();
        assert!(!accept(&rec, &Filters::default()));

        rec.title = "[공지] 서비스 점검 안내 드립니다".into();
        assert!(!accept(&rec, &Filters::default()));
    }

    #[test]
    fn test_custom_rules_override_defaults() {
        let rules = ClassifierRules {
            min_title_length: 3,
            title_excludes: vec!["sponsored".into()],
        };
        let mut rec = record();
        rec.title = "Hi!".into();
        assert!(is_news(&rec, &Filters::default(), &rules));

        rec.title = "Sponsored: buy now".into();
        assert!(!is_news(&rec, &Filters::default(), &rules));
    }

    #[test]
    fn test_language_filter() {
        let filters = Filters {
            language: Some("KO".into()),
            ..Default::default()
        };
        assert!(!accept(&record(), &filters));

        let mut rec = record();
        rec.language = Some("ko".into());
        assert!(accept(&rec, &filters));

        rec.language = None;
        assert!(accept(&rec, &filters));
    }

    #[test]
    fn test_category_filter() {
        let filters = Filters {
            categories: vec!["politics".into(), "IT".into()],
            ..Default::default()
        };
        assert!(accept(&record(), &filters));

        let mut rec = record();
        rec.category = Some("Sports".into());
        assert!(!accept(&rec, &filters));

        rec.category = None;
        assert!(accept(&rec, &filters));

        rec.category = Some(String::new());
        assert!(accept(&rec, &filters));
    }

    #[test]
    fn test_include_keywords_match_title_or_summary() {
        let filters = Filters {
            include_keywords: vec!["SPENDING".into(), "election".into()],
            ..Default::default()
        };
        assert!(accept(&record(), &filters));

        let filters = Filters {
            include_keywords: vec!["election".into()],
            ..Default::default()
        };
        assert!(!accept(&record(), &filters));
    }

    #[test]
    fn test_exclude_keywords_match_title_or_summary() {
        let filters = Filters {
            exclude_keywords: vec!["friday".into()],
            ..Default::default()
        };
        assert!(!accept(&record(), &filters));

        let filters = Filters {
            exclude_keywords: vec!["weather".into()],
            ..Default::default()
        };
        assert!(accept(&record(), &filters));
    }

    #[test]
    fn test_idempotent() {
        let filters = Filters {
            language: Some("en".into()),
            categories: vec!["politics".into()],
            include_keywords: vec!["budget".into()],
            exclude_keywords: vec!["sports".into()],
        };
        let rec = record();
        let first = accept(&rec, &filters);
        assert_eq!(first, accept(&rec, &filters));
        assert!(first);
    }

    #[test]
    fn test_hint_vocabularies_do_not_filter() {
        let mut rec = record();
        rec.category = Some("gardening".into());
        assert!(!CATEGORY_HINTS.contains(&"gardening"));
        assert!(accept(&rec, &Filters::default()));
        assert!(FEED_TITLE_HINTS.contains(&"news"));
    }
}
