// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Two-tier article cache.
//!
//! ```text
//! ┌────────────────────────────────────────────────┐
//! │  Fast tier: RwLock<HashMap<key, CacheEntry>>   │  no I/O, checked first
//! └────────────────────────────────────────────────┘
//!            │ miss / expired           ▲ promote (durable expiration)
//!            ▼                          │
//! ┌────────────────────────────────────────────────┐
//! │  Durable tier: Arc<dyn ArticleStore>           │  SQLite / PostgreSQL
//! └────────────────────────────────────────────────┘
//! ```
//!
//! - **Reads** check the fast tier, then the durable tier. A durable hit is
//!   decoded and promoted with the expiration recorded in the durable row.
//! - **Writes** update the fast tier first and unconditionally, then write
//!   through. A failed durable write is logged and otherwise ignored: the
//!   fast tier stays authoritative for the life of the process and the
//!   entry is re-fetchable from origin.
//! - **Reclamation** runs on a background task every cleanup interval and
//!   removes expired entries from both tiers independently.
//!
//! No durable-tier fault ever reaches the caller. A broken store only shows
//! up as more misses.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use stocknews::{TieredCache, CacheConfig, Article};
//! use stocknews::storage::InMemoryStore;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let cache = TieredCache::new(Arc::new(InMemoryStore::new()), CacheConfig::default());
//!
//! cache.set_articles("AAPL", vec![Article::default()]).await;
//! assert!(cache.get_articles("AAPL").await.is_some());
//!
//! cache.shutdown().await;
//! # }
//! ```

mod reclaim;
mod types;

pub use types::{CacheEntry, SweepReport};

use parking_lot::{Mutex, RwLock};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::article::{decode_articles, encode_articles, Article};
use crate::clock::{ttl_millis, Clock, SystemClock};
use crate::config::CacheConfig;
use crate::storage::{ArticleStore, StorageError};

/// Fast-tier key for a ticker.
#[must_use]
pub fn cache_key(ticker: &str) -> String {
    format!("news_{}", ticker)
}

/// Run a durable call under `limit`; an elapsed deadline becomes
/// [`StorageError::Timeout`].
pub(crate) async fn within<T>(
    limit: Duration,
    operation: &'static str,
    call: impl Future<Output = Result<T, StorageError>>,
) -> Result<T, StorageError> {
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| StorageError::Timeout { operation })?
}

/// State shared between the cache handle and its reclamation task.
pub(crate) struct CacheInner {
    pub(crate) memory: RwLock<HashMap<String, CacheEntry>>,
    pub(crate) store: Arc<dyn ArticleStore>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) ttl: Duration,
    pub(crate) cleanup_interval: Duration,
    pub(crate) store_timeout: Duration,
    pub(crate) sweep_timeout: Duration,
}

/// In-process fast tier in front of a durable [`ArticleStore`].
///
/// # Thread Safety
///
/// `TieredCache` is `Send + Sync`; share it behind an `Arc`. Reads proceed in
/// parallel under the read lock. The lock is never held across an `.await`.
pub struct TieredCache {
    inner: Arc<CacheInner>,
    stop_tx: watch::Sender<bool>,
    reclaimer: Mutex<Option<JoinHandle<()>>>,
}

impl TieredCache {
    /// Build the cache and start its reclamation task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(store: Arc<dyn ArticleStore>, config: CacheConfig) -> Self {
        Self::with_clock(store, config, Arc::new(SystemClock))
    }

    /// Build with an explicit clock. Pass the same clock the store uses.
    pub fn with_clock(store: Arc<dyn ArticleStore>, config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let inner = Arc::new(CacheInner {
            memory: RwLock::new(HashMap::new()),
            store,
            clock,
            ttl: config.ttl(),
            cleanup_interval: config.cleanup_interval(),
            store_timeout: config.store_timeout(),
            sweep_timeout: config.sweep_timeout(),
        });

        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(reclaim::run(inner.clone(), stop_rx));

        info!(
            ttl_secs = inner.ttl.as_secs(),
            cleanup_interval_secs = inner.cleanup_interval.as_secs(),
            "Tiered article cache started"
        );

        Self {
            inner,
            stop_tx,
            reclaimer: Mutex::new(Some(handle)),
        }
    }

    /// Look up articles for `ticker`.
    ///
    /// `None` means "fetch from origin": the ticker was never cached, has
    /// expired, or the durable tier could not be read.
    #[tracing::instrument(skip(self), fields(tier))]
    pub async fn get_articles(&self, ticker: &str) -> Option<Vec<Article>> {
        self.inner.get_articles(ticker).await
    }

    /// Store `articles` for `ticker` in both tiers with a fresh TTL.
    #[tracing::instrument(skip(self, articles), fields(count = articles.len()))]
    pub async fn set_articles(&self, ticker: &str, articles: Vec<Article>) {
        self.inner.set_articles(ticker, articles).await;
    }

    /// Drop every fast-tier entry. The durable tier is untouched.
    pub fn clear(&self) {
        self.inner.memory.write().clear();
        crate::metrics::set_fast_tier_entries(0);
        info!("Fast tier cleared");
    }

    /// Physical fast-tier size, including expired entries not yet swept.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.memory.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.memory.read().is_empty()
    }

    /// Whether the fast tier physically holds a slot for `ticker`,
    /// regardless of expiry.
    #[must_use]
    pub fn holds(&self, ticker: &str) -> bool {
        self.inner.memory.read().contains_key(&cache_key(ticker))
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    #[must_use]
    pub fn cleanup_interval(&self) -> Duration {
        self.inner.cleanup_interval
    }

    /// Run one reclamation pass now, outside the timer.
    pub async fn sweep(&self) -> SweepReport {
        self.inner.sweep().await
    }

    /// Stop the reclamation task and wait for it to finish.
    ///
    /// Call once. Later calls log a warning and return immediately.
    pub async fn shutdown(&self) {
        let handle = self.reclaimer.lock().take();
        let Some(handle) = handle else {
            warn!("Tiered cache shutdown called more than once");
            return;
        };

        let _ = self.stop_tx.send(true);
        if let Err(e) = handle.await {
            error!(error = %e, "Reclamation task ended abnormally");
        }
        info!("Tiered article cache stopped");
    }

    /// Whether the reclamation task is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.reclaimer
            .lock()
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }
}

impl CacheInner {
    async fn get_articles(&self, ticker: &str) -> Option<Vec<Article>> {
        let start = Instant::now();
        let key = cache_key(ticker);

        // 1. Fast tier
        let now = self.clock.now_millis();
        let fast_hit = {
            let memory = self.memory.read();
            memory
                .get(&key)
                .filter(|entry| entry.is_live(now))
                .map(|entry| entry.value.clone())
        };
        if let Some(articles) = fast_hit {
            tracing::Span::current().record("tier", "fast");
            debug!(ticker = %ticker, "Cache hit (memory)");
            crate::metrics::record_operation("fast", "get", "hit");
            crate::metrics::record_latency("fast", "get", start.elapsed());
            return Some(articles.as_ref().clone());
        }

        // 2. Durable tier
        let stored = match within(self.store_timeout, "get_articles", self.store.get_articles(ticker)).await {
            Ok(Some(stored)) => stored,
            Ok(None) => {
                tracing::Span::current().record("tier", "miss");
                debug!(ticker = %ticker, "Cache miss: not found in memory or storage");
                crate::metrics::record_operation("all", "get", "miss");
                crate::metrics::record_latency("all", "get", start.elapsed());
                return None;
            }
            Err(e @ StorageError::Timeout { .. }) => {
                warn!(ticker = %ticker, error = %e, timeout = ?self.store_timeout, "Storage lookup timed out");
                crate::metrics::record_error("durable", "get", e.kind());
                return None;
            }
            Err(e) => {
                error!(ticker = %ticker, error = %e, "Error retrieving articles from storage");
                crate::metrics::record_error("durable", "get", e.kind());
                return None;
            }
        };

        // 3. Decode and promote
        let articles = match decode_articles(&stored.payload) {
            Ok(articles) => articles,
            Err(e) => {
                error!(ticker = %ticker, error = %e, "Error decoding articles from storage");
                crate::metrics::record_error("durable", "get", "codec");
                return None;
            }
        };

        // A write that landed while the durable read was in flight wins.
        let now = self.clock.now_millis();
        let (articles, size) = {
            let mut memory = self.memory.write();
            let articles = match memory.entry(key) {
                Entry::Occupied(slot)
                    if slot.get().is_live(now) && slot.get().expires_at >= stored.expires_at =>
                {
                    debug!(ticker = %ticker, "Newer fast-tier entry present, skipping promotion");
                    slot.get().value.as_ref().clone()
                }
                Entry::Occupied(mut slot) => {
                    slot.insert(CacheEntry::new(articles.clone(), stored.expires_at));
                    articles
                }
                Entry::Vacant(slot) => {
                    slot.insert(CacheEntry::new(articles.clone(), stored.expires_at));
                    articles
                }
            };
            (articles, memory.len())
        };
        crate::metrics::set_fast_tier_entries(size);

        tracing::Span::current().record("tier", "durable");
        debug!(ticker = %ticker, expires_at = stored.expires_at, "Cache hit (storage), promoted to memory");
        crate::metrics::record_operation("durable", "get", "hit");
        crate::metrics::record_latency("durable", "get", start.elapsed());
        Some(articles)
    }

    async fn set_articles(&self, ticker: &str, articles: Vec<Article>) {
        let expires_at = self.clock.now_millis().saturating_add(ttl_millis(self.ttl));

        // Fast tier first, unconditionally
        let entry = CacheEntry::new(articles, expires_at);
        let value = entry.value.clone();
        let size = {
            let mut memory = self.memory.write();
            memory.insert(cache_key(ticker), entry);
            memory.len()
        };
        crate::metrics::set_fast_tier_entries(size);
        crate::metrics::record_operation("fast", "set", "ok");

        let payload = match encode_articles(&value) {
            Ok(payload) => payload,
            Err(e) => {
                error!(ticker = %ticker, error = %e, "Error encoding articles for storage");
                crate::metrics::record_error("durable", "set", "codec");
                return;
            }
        };

        let save = self.store.save_articles(ticker, &payload, expires_at);
        match within(self.store_timeout, "save_articles", save).await {
            Ok(()) => {
                debug!(ticker = %ticker, "Articles saved to storage");
                crate::metrics::record_operation("durable", "set", "ok");
            }
            Err(e @ StorageError::Timeout { .. }) => {
                warn!(ticker = %ticker, error = %e, timeout = ?self.store_timeout, "Storage write timed out");
                crate::metrics::record_error("durable", "set", e.kind());
            }
            Err(e) => {
                error!(ticker = %ticker, error = %e, "Error saving articles to storage");
                crate::metrics::record_error("durable", "set", e.kind());
            }
        }
    }
}
