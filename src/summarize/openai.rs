use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;

use super::{require_key, SummaryRequest, Summarizer};
use crate::app::{NewsdeskError, Result};

pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const OPENAI_MODEL_ENV: &str = "OPENAI_MODEL";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Chat Completions backed summarizer.
pub struct OpenAiSummarizer {
    client: Client<OpenAIConfig>,
    config: OpenAIConfig,
    model: String,
    timeout: Duration,
}

impl OpenAiSummarizer {
    /// Reads `OPENAI_API_KEY` and, unless `model` is given, `OPENAI_MODEL`.
    pub fn from_env(model: Option<&str>, timeout: Duration) -> Result<Self> {
        let api_key = require_key(std::env::var(OPENAI_API_KEY_ENV).ok(), OPENAI_API_KEY_ENV)?;
        let model = model
            .map(String::from)
            .or_else(|| std::env::var(OPENAI_MODEL_ENV).ok())
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());
        Ok(Self::new(api_key, model, timeout))
    }

    pub fn new(api_key: String, model: String, timeout: Duration) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: Client::with_config(config.clone()),
            config,
            model,
            timeout,
        }
    }

    /// Point at an OpenAI-compatible server instead of api.openai.com.
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.config = self.config.with_api_base(api_base);
        self.client = Client::with_config(self.config.clone());
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

fn system_prompt(language: &str) -> String {
    format!(
        "You are a concise news summarizer. Return a single short paragraph in {} \
         (max ~2 sentences). No preface, no title, no bullets.",
        language
    )
}

fn user_prompt(request: &SummaryRequest<'_>) -> String {
    format!(
        "Title: {}\nSummary: {}\nLink: {}\n\n\
         Task: Provide a concise news summary (objective, no opinions).",
        request.title, request.text, request.link
    )
}

fn extract_content(content: Option<&str>) -> Result<String> {
    content
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| NewsdeskError::Summarization("OpenAI returned no content".into()))
}

fn request_error(e: impl std::fmt::Display) -> NewsdeskError {
    NewsdeskError::Summarization(format!("OpenAI request error: {}", e))
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn summarize(&self, request: SummaryRequest<'_>) -> Result<String> {
        let chat = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system_prompt(request.language_or_default()))
                    .build()
                    .map_err(request_error)?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user_prompt(&request))
                    .build()
                    .map_err(request_error)?
                    .into(),
            ])
            .temperature(0.3)
            .build()
            .map_err(request_error)?;

        let response = tokio::time::timeout(self.timeout, self.client.chat().create(chat))
            .await
            .map_err(|_| {
                NewsdeskError::Summarization(format!(
                    "OpenAI call timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| NewsdeskError::Summarization(format!("OpenAI API error: {}", e)))?;

        extract_content(
            response
                .choices
                .first()
                .and_then(|c| c.message.content.as_deref()),
        )
    }
}
