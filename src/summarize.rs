// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! LLM summaries of article batches via an Ollama server.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::article::Article;

pub const DEFAULT_MODEL: &str = "llama3";

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("summarizer request failed: {0}")]
    Request(String),
    #[error("summarizer returned status {0}")]
    Status(u16),
    #[error("failed to parse summarizer response: {0}")]
    Decode(String),
    #[error("summarizer request timed out")]
    Timeout,
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String, SummaryError>;
}

/// One `title:summary` line per article.
#[must_use]
pub fn combine_articles(articles: &[Article]) -> String {
    articles
        .iter()
        .map(|a| format!("{}:{}\n", a.title, a.summary))
        .collect()
}

#[must_use]
pub fn build_prompt(text: &str) -> String {
    format!("Summarize the following stock market news: \n\n{}", text)
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

pub struct OllamaSummarizer {
    base_url: String,
    model: String,
    http_client: reqwest::Client,
}

impl OllamaSummarizer {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self, SummaryError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| SummaryError::Request(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into(),
            model: model.into(),
            http_client,
        })
    }
}

#[async_trait]
impl Summarizer for OllamaSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, SummaryError> {
        let url = format!("{}/api/generate", self.base_url.trim_end_matches('/'));
        let request = GenerateRequest {
            model: &self.model,
            prompt: build_prompt(text),
            stream: false,
        };

        info!(model = %self.model, "Requesting summary from Ollama");
        debug!(prompt_len = request.prompt.len(), "Summary prompt built");

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SummaryError::Timeout
                } else {
                    SummaryError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(status_code = status.as_u16(), "Ollama returned an error status");
            return Err(SummaryError::Status(status.as_u16()));
        }

        let raw = response
            .bytes()
            .await
            .map_err(|e| SummaryError::Request(e.to_string()))?;
        let parsed: GenerateResponse = serde_json::from_slice(&raw).map_err(|e| {
            error!(error = %e, raw = %String::from_utf8_lossy(&raw), "Failed to parse Ollama response");
            SummaryError::Decode(e.to_string())
        })?;

        info!("Summary generated");
        Ok(parsed.response)
    }
}
