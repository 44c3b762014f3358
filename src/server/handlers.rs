// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use axum::{
    extract::{Path, Query, Request, State},
    middleware::Next,
    response::Response,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use super::{error::ApiError, state::AppState};
use crate::filter::filter_by_query;
use crate::summarize::combine_articles;

#[derive(Debug, Default, Deserialize)]
pub struct NewsQuery {
    pub q: Option<String>,
    pub summarize: Option<String>,
}

/// One to ten ASCII uppercase letters.
#[must_use]
pub fn is_valid_ticker(ticker: &str) -> bool {
    (1..=10).contains(&ticker.len()) && ticker.bytes().all(|b| b.is_ascii_uppercase())
}

pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn get_news(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
    Query(params): Query<NewsQuery>,
) -> Result<Json<Value>, ApiError> {
    if !is_valid_ticker(&ticker) {
        warn!(ticker = %ticker, "Invalid ticker format");
        return Err(ApiError::InvalidTicker);
    }

    let fetch = state.news.news_by_ticker(&ticker);
    let articles = match tokio::time::timeout(state.request_timeout, fetch).await {
        Ok(Ok(articles)) => articles,
        Ok(Err(e)) => {
            error!(ticker = %ticker, error = %e, "Error processing news request");
            return Err(e.into());
        }
        Err(_) => {
            error!(ticker = %ticker, "News request timed out");
            return Err(ApiError::Timeout);
        }
    };

    if params.summarize.as_deref() == Some("true") {
        let combined = combine_articles(&articles);
        if combined.is_empty() {
            warn!(ticker = %ticker, "No article content to summarize");
            return Ok(Json(json!({ "ticker": ticker, "summary": "" })));
        }

        let summary = match tokio::time::timeout(state.request_timeout, state.summarizer.summarize(&combined)).await {
            Ok(Ok(summary)) => summary,
            Ok(Err(e)) => {
                error!(ticker = %ticker, error = %e, "Failed to generate summary");
                return Err(e.into());
            }
            Err(_) => {
                error!(ticker = %ticker, "Summary request timed out");
                return Err(ApiError::Timeout);
            }
        };

        info!(ticker = %ticker, "Summary generated");
        return Ok(Json(json!({ "ticker": ticker, "summary": summary })));
    }

    let articles = match params.q.as_deref() {
        Some(q) if !q.is_empty() => {
            let filtered = filter_by_query(articles, q);
            debug!(ticker = %ticker, query = %q, result_count = filtered.len(), "Filtered articles by query");
            filtered
        }
        _ => articles,
    };

    info!(ticker = %ticker, article_count = articles.len(), "Retrieved news articles");
    Ok(Json(json!({ "ticker": ticker, "news": articles })))
}

/// Log method, path, status and latency for every request.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        latency_ms = start.elapsed().as_millis() as u64,
        "Request handled"
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_validation() {
        assert!(is_valid_ticker("AAPL"));
        assert!(is_valid_ticker("A"));
        assert!(is_valid_ticker("ABCDEFGHIJ"));
        assert!(!is_valid_ticker(""));
        assert!(!is_valid_ticker("ABCDEFGHIJK"));
        assert!(!is_valid_ticker("aapl"));
        assert!(!is_valid_ticker("BRK.B"));
        assert!(!is_valid_ticker("ÄPL"));
    }
}
