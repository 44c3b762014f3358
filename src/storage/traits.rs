// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to connect to storage: {0}")]
    Connect(String),
    #[error("Storage backend error: {0}")]
    Backend(String),
    #[error("Storage operation '{operation}' timed out")]
    Timeout { operation: &'static str },
}

impl StorageError {
    /// Metric label for this failure.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            StorageError::Connect(_) => "connect",
            StorageError::Backend(_) => "backend",
            StorageError::Timeout { .. } => "timeout",
        }
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        StorageError::Backend(e.to_string())
    }
}

/// A non-expired durable record as returned by [`ArticleStore::get_articles`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArticles {
    /// Opaque encoded article list
    pub payload: Vec<u8>,
    /// Expiration (epoch millis) recorded at write time
    pub expires_at: i64,
}

/// Keyed, expiring byte-blob storage for per-ticker article payloads.
///
/// One record per ticker; a save for an existing ticker replaces it.
/// Absence (including expiry) is `Ok(None)`, never an error.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Upsert the payload for `ticker`. Not retried internally.
    async fn save_articles(&self, ticker: &str, payload: &[u8], expires_at: i64) -> Result<(), StorageError>;

    /// Fetch the payload for `ticker` if a non-expired record exists.
    async fn get_articles(&self, ticker: &str) -> Result<Option<StoredArticles>, StorageError>;

    /// Remove every record whose expiration is at or before now.
    /// Returns the number of records removed; zero is success.
    async fn delete_expired(&self) -> Result<u64, StorageError>;

    /// Release the underlying connection pool. Call once, at shutdown.
    async fn close(&self);
}
