// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Alpha Vantage `NEWS_SENTIMENT` client.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

use super::{NewsError, NewsProvider};
use crate::article::Article;

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";

#[derive(Debug, Clone)]
pub struct AlphaVantageConfig {
    pub api_key: String,
    pub base_url: String,
    pub request_timeout: Duration,
}

impl AlphaVantageConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FeedResponse {
    #[serde(default)]
    feed: Vec<FeedItem>,
}

#[derive(Debug, Deserialize)]
struct FeedItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    banner_image: Option<String>,
    #[serde(default)]
    time_published: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    overall_sentiment_label: String,
    #[serde(default)]
    ticker_sentiment: Vec<TickerSentiment>,
}

#[derive(Debug, Deserialize)]
struct TickerSentiment {
    ticker: String,
}

impl From<FeedItem> for Article {
    fn from(item: FeedItem) -> Self {
        Article {
            title: item.title,
            url: item.url,
            summary: item.summary,
            image: item.banner_image.unwrap_or_default(),
            published_at: item.time_published,
            source: item.source,
            sentiment: item.overall_sentiment_label,
            tickers: item.ticker_sentiment.into_iter().map(|t| t.ticker).collect(),
        }
    }
}

/// Decode a `NEWS_SENTIMENT` response body.
///
/// An empty or missing feed is [`NewsError::NotFound`].
pub fn parse_feed(body: &[u8]) -> Result<Vec<Article>, NewsError> {
    let response: FeedResponse = serde_json::from_slice(body)
        .map_err(|e| NewsError::Internal(format!("error decoding API response: {}", e)))?;

    if response.feed.is_empty() {
        return Err(NewsError::NotFound);
    }
    Ok(response.feed.into_iter().map(Article::from).collect())
}

pub struct AlphaVantageClient {
    config: AlphaVantageConfig,
    http_client: reqwest::Client,
}

impl AlphaVantageClient {
    /// Fails with [`NewsError::Configuration`] if the HTTP client cannot be built.
    pub fn new(config: AlphaVantageConfig) -> Result<Self, NewsError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("stocknews/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NewsError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, http_client })
    }

    async fn fetch(&self, ticker: &str) -> Result<Vec<Article>, NewsError> {
        if self.config.api_key.is_empty() {
            error!("Missing ALPHAVANTAGE_API_KEY");
            return Err(NewsError::Configuration(
                "missing ALPHAVANTAGE_API_KEY environment variable".to_string(),
            ));
        }

        let url = format!("{}/query", self.config.base_url.trim_end_matches('/'));
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("function", "NEWS_SENTIMENT"),
                ("tickers", ticker),
                ("apikey", self.config.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                // The URL carries the API key
                let e = e.without_url();
                if e.is_timeout() {
                    warn!(ticker = %ticker, "Alpha Vantage request timed out");
                    NewsError::Timeout
                } else {
                    error!(ticker = %ticker, error = %e, "Error requesting Alpha Vantage");
                    NewsError::ServiceUnavailable(format!("error requesting Alpha Vantage: {}", e))
                }
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            error!(ticker = %ticker, status_code = status.as_u16(), "Alpha Vantage returned an error status");
            return Err(NewsError::ServiceUnavailable(format!(
                "Alpha Vantage API error: status code {}",
                status.as_u16()
            )));
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                NewsError::Timeout
            } else {
                NewsError::ServiceUnavailable(format!("error reading response body: {}", e.without_url()))
            }
        })?;

        match parse_feed(&body) {
            Err(NewsError::NotFound) => {
                warn!(ticker = %ticker, "No news articles found for the given ticker");
                Err(NewsError::NotFound)
            }
            Err(e) => {
                error!(ticker = %ticker, error = %e, "Error decoding Alpha Vantage response");
                Err(e)
            }
            ok => ok,
        }
    }
}

#[async_trait]
impl NewsProvider for AlphaVantageClient {
    fn name(&self) -> &str {
        "alphavantage"
    }

    async fn news_by_ticker(&self, ticker: &str) -> Result<Vec<Article>, NewsError> {
        info!(ticker = %ticker, "Fetching news from Alpha Vantage");
        let start = Instant::now();
        let result = self.fetch(ticker).await;

        let status = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        crate::metrics::record_upstream_request(self.name(), status, start.elapsed());
        result
    }
}
