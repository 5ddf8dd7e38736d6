use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{build_http_client, require_key, SummaryRequest, Summarizer};
use crate::app::{NewsdeskError, Result};

pub const GOOGLE_API_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const GEMINI_MODEL_ENV: &str = "GEMINI_MODEL";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Gemini `generateContent` backed summarizer.
pub struct GeminiSummarizer {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiSummarizer {
    /// Reads `GOOGLE_API_KEY` (or `GEMINI_API_KEY`) and, unless `model` is
    /// given, `GEMINI_MODEL`.
    pub fn from_env(model: Option<&str>, timeout: Duration) -> Result<Self> {
        let key = std::env::var(GOOGLE_API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(GEMINI_API_KEY_ENV).ok());
        let api_key = require_key(key, "GOOGLE_API_KEY (or GEMINI_API_KEY)")?;
        let model = model
            .map(String::from)
            .or_else(|| std::env::var(GEMINI_MODEL_ENV).ok())
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
        Self::new(api_key, model, timeout)
    }

    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: build_http_client(timeout)?,
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

fn prompt(request: &SummaryRequest<'_>) -> String {
    format!(
        "Summarize the following news in {} in 1-2 concise sentences. Core facts only, no filler.\n\
         Title: {}\n\
         Summary (excerpt from the article): {}\n\
         Link: {}",
        request.language_or_default(),
        request.title,
        request.text,
        request.link
    )
}

fn extract_text(response: GenerateResponse) -> Result<String> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| NewsdeskError::Summarization("Gemini returned no text".into()))
}

#[async_trait]
impl Summarizer for GeminiSummarizer {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn summarize(&self, request: SummaryRequest<'_>) -> Result<String> {
        let text = prompt(&request);
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: &text }],
            }],
        };

        let response: GenerateResponse = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        extract_text(response)
    }
}
