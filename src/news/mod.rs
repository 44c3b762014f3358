// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! News providers and the cache-aware fetch path.
//!
//! ```text
//! handler ──► MultiFetcher ──► CachedFetcher<AlphaVantageClient> ──► upstream
//!                                   │
//!                                   └──► TieredCache (hit short-circuits)
//! ```

pub mod alphavantage;
pub mod error;
pub mod fetcher;

pub use alphavantage::{AlphaVantageClient, AlphaVantageConfig};
pub use error::NewsError;
pub use fetcher::{CachedFetcher, MultiFetcher};

use async_trait::async_trait;
use std::sync::Arc;

use crate::article::Article;

/// Anything that can produce articles for a ticker.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// Short name used in logs and metrics labels.
    fn name(&self) -> &str;

    async fn news_by_ticker(&self, ticker: &str) -> Result<Vec<Article>, NewsError>;
}

#[async_trait]
impl<T: NewsProvider + ?Sized> NewsProvider for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn news_by_ticker(&self, ticker: &str) -> Result<Vec<Article>, NewsError> {
        (**self).news_by_ticker(ticker).await
    }
}
