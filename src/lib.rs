// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! # Stock News
//!
//! Ticker news service built around a two-tier article cache.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        HTTP Layer                           │
//! │  • GET /news/:ticker, optional ?q= filter / ?summarize=     │
//! │  • 10s request deadline                                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Fast Tier: In-Memory Map                    │
//! │  • Keyed "news_<TICKER>", per-entry expiration              │
//! │  • Every read re-checks expiry                              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!              (write-through / read-through promotion)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │              Durable Tier: SQLite / PostgreSQL              │
//! │  • One row per ticker, encoded payload + expiration         │
//! │  • Survives restarts, shared across instances               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                         (on miss)
//!                              ▼
//!                     Upstream news provider
//! ```
//!
//! A background task sweeps expired entries from both tiers every cleanup
//! interval (TTL/2 by default).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use stocknews::{storage, CacheConfig, SystemClock, TieredCache};
//!
//! #[tokio::main]
//! async fn main() {
//!     let clock = Arc::new(SystemClock);
//!     let store = storage::connect("sqlite://news.db", clock.clone())
//!         .await
//!         .expect("Failed to open store");
//!
//!     let cache = TieredCache::with_clock(store.clone(), CacheConfig::default(), clock);
//!
//!     if cache.get_articles("AAPL").await.is_none() {
//!         // fetch from origin, then:
//!         cache.set_articles("AAPL", vec![]).await;
//!     }
//!
//!     cache.shutdown().await;
//!     store.close().await;
//! }
//! ```
//!
//! ## Modules
//!
//! - [`cache`]: The [`TieredCache`] and its reclamation task
//! - [`storage`]: Durable backends (SQLite, PostgreSQL, memory)
//! - [`news`]: Upstream providers and the cache-aware fetch path
//! - [`server`]: axum router and handlers
//! - [`resilience`]: Retry with backoff for startup connections

pub mod args;
pub mod article;
pub mod cache;
pub mod clock;
pub mod config;
pub mod filter;
pub mod metrics;
pub mod news;
pub mod resilience;
pub mod server;
pub mod storage;
pub mod summarize;

pub use article::{decode_articles, encode_articles, Article, CodecError};
pub use cache::{SweepReport, TieredCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CacheConfig;
pub use news::{NewsError, NewsProvider};
pub use storage::traits::{ArticleStore, StorageError, StoredArticles};
