use std::collections::HashSet;

use sha2::{Digest, Sha256};

use crate::domain::NewsItem;

/// Key used to detect duplicates: guid, then link, then a hash of title and source.
pub fn dedup_key(item: &NewsItem) -> String {
    if let Some(guid) = item.guid.as_deref().filter(|g| !g.is_empty()) {
        return format!("guid:{}", guid);
    }
    if !item.link.is_empty() {
        return format!("link:{}", item.link);
    }
    format!("hash:{}", title_source_hash(&item.title, &item.source))
}

fn title_source_hash(title: &str, source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update([0u8]);
    hasher.update(source.as_bytes());
    hex::encode(hasher.finalize())
}

/// Drop every item whose key was already seen, keeping first occurrences in
/// their original order.
pub fn dedup(items: Vec<NewsItem>) -> Vec<NewsItem> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(dedup_key(item)))
        .collect()
}
