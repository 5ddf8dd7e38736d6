use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use crate::app::{AppContext, NewsdeskError, Result};
use crate::cli::FetchArgs;
use crate::config::Config;
use crate::domain::NewsItem;
use crate::fetcher::StaticSource;
use crate::normalizer::parse_date;
use crate::pipeline::{FetchOptions, PipelineStats};

/// Build the context for a fetch: entries from a file when `--entries` is
/// given, HTTP otherwise.
pub fn fetch_context(config: Config, args: &FetchArgs) -> Result<AppContext> {
    match &args.entries {
        Some(path) => {
            let source = load_entries(path)?;
            Ok(AppContext::with_source(config, Arc::new(source)))
        }
        None => AppContext::new(config),
    }
}

fn load_entries(path: &Path) -> Result<StaticSource> {
    let json = std::fs::read_to_string(path)?;
    StaticSource::from_json(&json)
}

/// Pipeline options from the config file with command-line overrides applied.
pub fn fetch_options(config: &Config, args: &FetchArgs) -> Result<FetchOptions> {
    let mut options = config.fetch_options();

    if let Some(language) = &args.language {
        options.filters.language = Some(language.clone());
    }
    if !args.categories.is_empty() {
        options.filters.categories = args.categories.clone();
    }
    if !args.include.is_empty() {
        options.filters.include_keywords = args.include.clone();
    }
    if !args.exclude.is_empty() {
        options.filters.exclude_keywords = args.exclude.clone();
    }
    if args.limit.is_some() {
        options.limit = args.limit;
    }
    if let Some(since) = &args.since {
        options.start_date = Some(parse_bound(since, false)?);
    }
    if let Some(until) = &args.until {
        options.end_date = Some(parse_bound(until, true)?);
    }

    options.summarize |= args.summarize;
    let summarize = &mut options.summarize_options;
    if let Some(provider) = &args.provider {
        summarize.provider = provider.clone();
    }
    if args.model.is_some() {
        summarize.model = args.model.clone();
    }
    if let Some(strategy) = args.strategy {
        summarize.strategy = strategy;
    }
    if let Some(workers) = args.summary_workers {
        summarize.max_workers = workers;
    }

    Ok(options)
}

/// A bare `YYYY-MM-DD` upper bound means the end of that day.
fn parse_bound(s: &str, end_of_day: bool) -> Result<DateTime<Utc>> {
    if end_of_day {
        if let Ok(date) = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
            if let Some(dt) = date.and_hms_opt(23, 59, 59) {
                return Ok(dt.and_utc());
            }
        }
    }
    parse_date(s).ok_or_else(|| NewsdeskError::Other(format!("Invalid date: {}", s)))
}

pub async fn fetch_news(ctx: &AppContext, args: &FetchArgs) -> Result<()> {
    let options = fetch_options(&ctx.config, args)?;
    let (items, stats) = ctx
        .news_fetcher(options)
        .fetch_with_stats(&args.urls)
        .await?;

    if items.is_empty() {
        println!("No news items");
    }
    for item in &items {
        println!("{}\n", format_item(item));
    }

    if args.stats {
        println!("{}", format_stats(&stats));
    }

    Ok(())
}

pub fn format_item(item: &NewsItem) -> String {
    let mut out = format!(
        "{} [{}] {}\n  {}",
        item.published_at.format("%Y-%m-%d %H:%M"),
        item.source,
        item.display_title(),
        item.link
    );
    for line in item.summary.lines().filter(|l| !l.trim().is_empty()) {
        out.push_str("\n  ");
        out.push_str(line.trim_end());
    }
    out
}

pub fn format_stats(stats: &PipelineStats) -> String {
    format!(
        "Retrieved {} entries: {} rejected, {} out of range, {} malformed, {} duplicates, {} over limit, {} summarized",
        stats.retrieved,
        stats.rejected,
        stats.out_of_range,
        stats.malformed,
        stats.duplicates,
        stats.truncated,
        stats.summarized
    )
}

pub fn show_config(config: &Config) -> Result<()> {
    let text =
        toml::to_string_pretty(config).map_err(|e| NewsdeskError::Config(e.to_string()))?;
    print!("{}", text);
    Ok(())
}

pub fn show_config_path() -> Result<()> {
    let path =
        Config::default_config_path().map_err(|e| NewsdeskError::Config(e.to_string()))?;
    println!("{}", path.display());
    Ok(())
}
