use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewsdeskError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A record reached the item builder without a link or a publication time.
    #[error("Missing required field: {0}")]
    MissingRequiredField(&'static str),

    /// The summarization provider could not be set up (missing credentials, bad client).
    #[error("Summarization provider configuration error: {0}")]
    ProviderConfig(String),

    #[error("Summarization failed: {0}")]
    Summarization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, NewsdeskError>;
