// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use super::traits::{ArticleStore, StorageError, StoredArticles};

#[derive(Debug, Clone)]
struct Record {
    payload: Vec<u8>,
    expires_at: i64,
}

/// Volatile [`ArticleStore`]. Nothing survives a restart.
///
/// Selected with the `memory:` storage URL and used throughout the tests.
pub struct InMemoryStore {
    records: Mutex<HashMap<String, Record>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Number of physically present records, expired or not
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Whether a record for `ticker` is physically present, ignoring expiry
    #[must_use]
    pub fn contains(&self, ticker: &str) -> bool {
        self.records.lock().contains_key(ticker)
    }

    /// Overwrite a record's payload in place (for corruption tests)
    pub fn corrupt(&self, ticker: &str, payload: &[u8]) {
        if let Some(record) = self.records.lock().get_mut(ticker) {
            record.payload = payload.to_vec();
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArticleStore for InMemoryStore {
    async fn save_articles(&self, ticker: &str, payload: &[u8], expires_at: i64) -> Result<(), StorageError> {
        let record = Record {
            payload: payload.to_vec(),
            expires_at,
        };
        self.records.lock().insert(ticker.to_string(), record);
        Ok(())
    }

    async fn get_articles(&self, ticker: &str) -> Result<Option<StoredArticles>, StorageError> {
        let now = self.clock.now_millis();
        Ok(self
            .records
            .lock()
            .get(ticker)
            .filter(|r| r.expires_at > now)
            .map(|r| StoredArticles {
                payload: r.payload.clone(),
                expires_at: r.expires_at,
            }))
    }

    async fn delete_expired(&self) -> Result<u64, StorageError> {
        let now = self.clock.now_millis();
        let mut records = self.records.lock();
        let before = records.len();
        records.retain(|_, r| r.expires_at > now);
        Ok((before - records.len()) as u64)
    }

    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::time::Duration;

    fn store_at(start: i64) -> (InMemoryStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start));
        (InMemoryStore::with_clock(clock.clone()), clock)
    }

    #[tokio::test]
    async fn test_new_store_is_empty() {
        let store = InMemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_save_and_get() {
        let (store, _clock) = store_at(1_000);
        store.save_articles("AAPL", b"[]", 5_000).await.unwrap();

        let found = store.get_articles("AAPL").await.unwrap().unwrap();
        assert_eq!(found.payload, b"[]");
        assert_eq!(found.expires_at, 5_000);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let store = InMemoryStore::new();
        assert!(store.get_articles("NOPE").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_replaces() {
        let (store, _clock) = store_at(0);
        store.save_articles("MSFT", b"[1]", 100).await.unwrap();
        store.save_articles("MSFT", b"[2]", 200).await.unwrap();

        assert_eq!(store.len(), 1);
        let found = store.get_articles("MSFT").await.unwrap().unwrap();
        assert_eq!(found.payload, b"[2]");
        assert_eq!(found.expires_at, 200);
    }

    #[tokio::test]
    async fn test_expired_record_is_absent_before_sweep() {
        let (store, clock) = store_at(0);
        store.save_articles("TSLA", b"[]", 1_000).await.unwrap();

        clock.advance(Duration::from_millis(1_000));
        assert!(store.get_articles("TSLA").await.unwrap().is_none());
        // Still physically there until delete_expired runs
        assert!(store.contains("TSLA"));
    }

    #[tokio::test]
    async fn test_delete_expired_counts() {
        let (store, clock) = store_at(0);
        store.save_articles("OLD1", b"[]", 100).await.unwrap();
        store.save_articles("OLD2", b"[]", 100).await.unwrap();
        store.save_articles("NEW", b"[]", 10_000).await.unwrap();

        clock.set(100);
        assert_eq!(store.delete_expired().await.unwrap(), 2);
        assert!(store.contains("NEW"));

        // Idempotent
        assert_eq!(store.delete_expired().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_saves() {
        let store = Arc::new(InMemoryStore::new());
        let mut handles = vec![];

        for batch in 0..10 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..10 {
                    let ticker = format!("T{}X{}", batch, i);
                    store.save_articles(&ticker, b"[]", i64::MAX).await.unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.len(), 100);
    }
}
