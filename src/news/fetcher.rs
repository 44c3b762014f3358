// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use super::{NewsError, NewsProvider};
use crate::article::Article;
use crate::cache::TieredCache;

/// Read-through wrapper: serve from the cache, fall back to the provider,
/// and write successful upstream results back.
///
/// Errors are never cached; the next call goes upstream again.
pub struct CachedFetcher<P> {
    provider: P,
    cache: Arc<TieredCache>,
}

impl<P: NewsProvider> CachedFetcher<P> {
    pub fn new(provider: P, cache: Arc<TieredCache>) -> Self {
        Self { provider, cache }
    }
}

#[async_trait]
impl<P: NewsProvider> NewsProvider for CachedFetcher<P> {
    fn name(&self) -> &str {
        self.provider.name()
    }

    async fn news_by_ticker(&self, ticker: &str) -> Result<Vec<Article>, NewsError> {
        if let Some(cached) = self.cache.get_articles(ticker).await {
            debug!(ticker = %ticker, count = cached.len(), "Serving news from cache");
            return Ok(cached);
        }

        let articles = self.provider.news_by_ticker(ticker).await?;
        self.cache.set_articles(ticker, articles.clone()).await;
        Ok(articles)
    }
}

/// Fan-in over several providers, queried in order.
///
/// Results are concatenated. The first provider error aborts the call and
/// discards anything already collected.
pub struct MultiFetcher {
    providers: Vec<Arc<dyn NewsProvider>>,
}

impl MultiFetcher {
    pub fn new(providers: Vec<Arc<dyn NewsProvider>>) -> Self {
        info!(count = providers.len(), "News providers registered");
        Self { providers }
    }
}

#[async_trait]
impl NewsProvider for MultiFetcher {
    fn name(&self) -> &str {
        "multi"
    }

    async fn news_by_ticker(&self, ticker: &str) -> Result<Vec<Article>, NewsError> {
        let mut all = Vec::new();
        for provider in &self.providers {
            let articles = provider.news_by_ticker(ticker).await?;
            all.extend(articles);
        }
        Ok(all)
    }
}
