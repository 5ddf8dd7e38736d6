pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::summarize::Strategy;

#[derive(Parser)]
#[command(name = "newsdesk")]
#[command(about = "Collect, filter and summarize news from RSS/Atom feeds", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/newsdesk/config.toml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of parallel workers for fetching feeds
    #[arg(short, long, global = true)]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch news items from one or more feeds
    Fetch(FetchArgs),
    /// Inspect the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the default config file location
    Path,
}

#[derive(Args, Debug, Default)]
pub struct FetchArgs {
    /// Feed URLs
    #[arg(required_unless_present = "entries")]
    pub urls: Vec<String>,

    /// Read raw entries from a JSON file instead of fetching
    #[arg(long, value_name = "FILE")]
    pub entries: Option<PathBuf>,

    /// Keep only items in this language
    #[arg(short, long)]
    pub language: Option<String>,

    /// Keep only items in this category (repeatable)
    #[arg(long = "category", value_name = "CATEGORY")]
    pub categories: Vec<String>,

    /// Keep only items mentioning this keyword (repeatable)
    #[arg(long = "include", value_name = "KEYWORD")]
    pub include: Vec<String>,

    /// Drop items mentioning this keyword (repeatable)
    #[arg(long = "exclude", value_name = "KEYWORD")]
    pub exclude: Vec<String>,

    /// Maximum number of items (0 = no limit)
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Only items published at or after this date
    #[arg(long, value_name = "DATE")]
    pub since: Option<String>,

    /// Only items published at or before this date (a bare date covers the whole day)
    #[arg(long, value_name = "DATE")]
    pub until: Option<String>,

    /// Rewrite summaries with an AI provider
    #[arg(short, long)]
    pub summarize: bool,

    /// Summarization provider (openai, gemini)
    #[arg(long)]
    pub provider: Option<String>,

    /// Provider model
    #[arg(long)]
    pub model: Option<String>,

    /// Replace the summary or append the AI summary below it
    #[arg(long, value_enum)]
    pub strategy: Option<Strategy>,

    /// Concurrent summarization calls
    #[arg(long, value_name = "N")]
    pub summary_workers: Option<usize>,

    /// Print per-stage counts after the items
    #[arg(long)]
    pub stats: bool,
}
