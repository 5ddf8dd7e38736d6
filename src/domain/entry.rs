use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// A feed entry as handed over by feed retrieval, before any normalization.
///
/// Every field is optional: feeds in the wild omit or mangle almost anything,
/// and the normalizer is expected to cope with whatever subset is present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEntry {
    pub id: Option<String>,
    pub guid: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    /// Alternate canonical link (feedburner-style `origLink`).
    pub origlink: Option<String>,
    pub tags: Vec<RawTag>,
    pub published_parsed: Option<RawTime>,
    pub updated_parsed: Option<RawTime>,
    pub created_parsed: Option<RawTime>,
    pub published: Option<String>,
    pub updated: Option<String>,
    pub created: Option<String>,
    /// Embedded source feed (RSS `<source>`).
    pub source: Option<RawSource>,
    pub language: Option<String>,
    pub dc_language: Option<String>,
    pub lang: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTag {
    pub term: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSource {
    pub title: Option<String>,
}

/// Broken-down UTC time as produced by feed parsers.
///
/// Components are not validated on construction; [`RawTime::to_utc`] returns
/// `None` for impossible or missing dates such as month 13 or month -1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTime {
    pub year: i64,
    pub month: i64,
    pub day: i64,
    pub hour: i64,
    pub minute: i64,
    pub second: i64,
}

impl RawTime {
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        let component = |v: i64| u32::try_from(v).ok();
        NaiveDate::from_ymd_opt(
            i32::try_from(self.year).ok()?,
            component(self.month)?,
            component(self.day)?,
        )?
        .and_hms_opt(
            component(self.hour)?,
            component(self.minute)?,
            component(self.second)?,
        )
        .map(|naive| naive.and_utc())
    }
}

impl From<DateTime<Utc>> for RawTime {
    fn from(dt: DateTime<Utc>) -> Self {
        Self {
            year: dt.year().into(),
            month: dt.month().into(),
            day: dt.day().into(),
            hour: dt.hour().into(),
            minute: dt.minute().into(),
            second: dt.second().into(),
        }
    }
}

impl RawTag {
    pub fn new(term: &str) -> Self {
        Self {
            term: Some(term.to_string()),
        }
    }
}
