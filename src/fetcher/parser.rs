use feed_rs::model::Entry;
use feed_rs::parser::Builder;
use html_escape::decode_html_entities;

use crate::app::{NewsdeskError, Result};
use crate::domain::{RawEntry, RawTag, RawTime};

/// Parse an RSS 0.9x/1.0/2.0, Atom or JSON Feed document into raw entries.
///
/// Every entry carries the channel language, if the feed declares one.
/// Entries without their own guid/id get `id: None`; no id is made up for them.
pub fn parse_entries(body: &[u8]) -> Result<Vec<RawEntry>> {
    let parser = Builder::new().id_generator(|_, _, _| String::new()).build();
    let feed = parser
        .parse(body)
        .map_err(|e| NewsdeskError::FeedParse(e.to_string()))?;
    let language = feed.language.clone();

    Ok(feed
        .entries
        .into_iter()
        .map(|entry| to_raw_entry(entry, language.as_deref()))
        .collect())
}

fn decode(text: &str) -> String {
    decode_html_entities(text).to_string()
}

fn to_raw_entry(entry: Entry, feed_language: Option<&str>) -> RawEntry {
    RawEntry {
        id: Some(entry.id).filter(|id| !id.is_empty()),
        title: entry.title.map(|t| decode(&t.content)),
        summary: entry.summary.map(|s| decode(&s.content)),
        description: entry.content.and_then(|c| c.body).map(|b| decode(&b)),
        link: entry.links.into_iter().next().map(|l| l.href),
        tags: entry
            .categories
            .iter()
            .map(|c| RawTag::new(&c.term))
            .collect(),
        published_parsed: entry.published.map(RawTime::from),
        updated_parsed: entry.updated.map(RawTime::from),
        language: feed_language.map(String::from),
        ..Default::default()
    }
}
