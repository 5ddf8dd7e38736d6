use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use super::{build_summarizer, SummarizeOptions, Summarizer, SummaryRequest};
use crate::app::Result;
use crate::domain::NewsItem;

/// Build the configured provider and summarize `items` with it.
///
/// Only provider construction can fail; per-item failures fall back to the
/// item's original summary.
pub async fn summarize_items(
    items: Vec<NewsItem>,
    options: &SummarizeOptions,
) -> Result<Vec<NewsItem>> {
    let summarizer = build_summarizer(options)?;
    Ok(summarize_with(summarizer, items, options).await)
}

/// Summarize `items` with an already constructed provider.
///
/// The output always has the same length as the input and `output[i]`
/// corresponds to `items[i]`, whichever execution path is taken.
pub async fn summarize_with(
    summarizer: Arc<dyn Summarizer>,
    items: Vec<NewsItem>,
    options: &SummarizeOptions,
) -> Vec<NewsItem> {
    if items.is_empty() || summarizer.is_noop() {
        return items;
    }

    let workers = options.max_workers.max(1);
    if workers == 1 {
        return summarize_serial(summarizer.as_ref(), &items, options).await;
    }

    let collected = summarize_parallel(&summarizer, &items, options, workers).await;
    if collected.len() == items.len() {
        return collected;
    }

    warn!(
        expected = items.len(),
        collected = collected.len(),
        provider = summarizer.name(),
        "Summarization workers lost results; reprocessing batch serially"
    );
    summarize_serial(summarizer.as_ref(), &items, options).await
}

async fn summarize_serial(
    summarizer: &dyn Summarizer,
    items: &[NewsItem],
    options: &SummarizeOptions,
) -> Vec<NewsItem> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        out.push(summarize_one(summarizer, item, options).await);
    }
    out
}

async fn summarize_parallel(
    summarizer: &Arc<dyn Summarizer>,
    items: &[NewsItem],
    options: &SummarizeOptions,
    workers: usize,
) -> Vec<NewsItem> {
    let semaphore = Arc::new(Semaphore::new(workers));
    let options = Arc::new(options.clone());
    let mut handles = Vec::with_capacity(items.len());

    for item in items.iter().cloned() {
        let summarizer = summarizer.clone();
        let semaphore = semaphore.clone();
        let options = options.clone();

        let handle = tokio::spawn(async move {
            let _permit = semaphore.acquire().await;
            summarize_one(summarizer.as_ref(), &item, &options).await
        });

        handles.push(handle);
    }

    // Awaiting in spawn order keeps results in input order
    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok(item) => results.push(item),
            Err(e) => {
                error!("Summarization task join error: {}", e);
            }
        }
    }

    results
}

async fn summarize_one(
    summarizer: &dyn Summarizer,
    item: &NewsItem,
    options: &SummarizeOptions,
) -> NewsItem {
    let joined = format!("{}\n\n{}", item.title, item.summary);
    let text = truncate_chars(&joined, options.max_input_chars);
    let request = SummaryRequest {
        title: &item.title,
        text,
        link: &item.link,
        language: options.language.as_deref(),
    };

    match summarizer.summarize(request).await {
        Ok(generated) if !generated.trim().is_empty() => {
            debug!("Summarized {}", item.link);
            item.with_summary(options.strategy.apply(&item.summary, generated.trim()))
        }
        Ok(_) => {
            warn!(link = %item.link, "Summarizer returned empty text; keeping original summary");
            item.clone()
        }
        Err(e) => {
            warn!(link = %item.link, error = %e, "Summarization failed; keeping original summary");
            item.clone()
        }
    }
}

/// First `limit` characters of `s`; a limit of zero or less disables truncation.
pub fn truncate_chars(s: &str, limit: i64) -> &str {
    if limit <= 0 {
        return s;
    }
    match s.char_indices().nth(limit as usize) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
