// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Embedded SQLite backend for the durable tier.
//!
//! One row per ticker:
//! ```sql
//! CREATE TABLE articles (
//!   ticker TEXT PRIMARY KEY,
//!   data BLOB NOT NULL,          -- encoded article list
//!   expiration INTEGER NOT NULL, -- epoch millis
//!   created_at INTEGER NOT NULL  -- epoch millis
//! )
//! ```
//!
//! The database file is created on first open and put in WAL journal mode,
//! so readers are not blocked by the occasional write-through.

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous};
use sqlx::Row;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::resilience::retry::{retry, RetryPolicy};
use super::traits::{ArticleStore, StorageError, StoredArticles};

pub struct SqliteStore {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `url`, e.g. `sqlite://news.db`.
    pub async fn new(url: &str) -> Result<Self, StorageError> {
        Self::connect_with(url, Arc::new(SystemClock), &RetryPolicy::startup()).await
    }

    /// Open with an explicit clock and connect policy.
    pub async fn connect_with(
        url: &str,
        clock: Arc<dyn Clock>,
        policy: &RetryPolicy,
    ) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| StorageError::Connect(e.to_string()))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = retry("sqlite_connect", policy, || {
            let options = options.clone();
            async move {
                SqlitePoolOptions::new()
                    .max_connections(8)
                    .acquire_timeout(Duration::from_secs(10))
                    .connect_with(options)
                    .await
                    .map_err(|e| StorageError::Connect(e.to_string()))
            }
        })
        .await?;

        let store = Self { pool, clock };
        store.init_schema(policy).await?;
        info!(url = %url, "SQLite article store ready");
        Ok(store)
    }

    async fn init_schema(&self, policy: &RetryPolicy) -> Result<(), StorageError> {
        retry("sqlite_init_schema", policy, || async {
            sqlx::query(
                r#"
                CREATE TABLE IF NOT EXISTS articles (
                    ticker TEXT NOT NULL PRIMARY KEY,
                    data BLOB NOT NULL,
                    expiration INTEGER NOT NULL,
                    created_at INTEGER NOT NULL
                )
                "#,
            )
            .execute(&self.pool)
            .await?;

            sqlx::query("CREATE INDEX IF NOT EXISTS idx_articles_expiration ON articles(expiration)")
                .execute(&self.pool)
                .await?;

            Ok::<_, StorageError>(())
        })
        .await
    }

    /// Number of rows, expired or not.
    pub async fn count_all(&self) -> Result<u64, StorageError> {
        let row = sqlx::query("SELECT COUNT(*) AS cnt FROM articles")
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = row.try_get("cnt")?;
        Ok(count as u64)
    }
}

#[async_trait]
impl ArticleStore for SqliteStore {
    async fn save_articles(&self, ticker: &str, payload: &[u8], expires_at: i64) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO articles (ticker, data, expiration, created_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(ticker) DO UPDATE SET
                data = excluded.data,
                expiration = excluded.expiration,
                created_at = excluded.created_at",
        )
        .bind(ticker)
        .bind(payload)
        .bind(expires_at)
        .bind(self.clock.now_millis())
        .execute(&self.pool)
        .await?;

        debug!(ticker = %ticker, bytes = payload.len(), "Saved articles to SQLite");
        Ok(())
    }

    async fn get_articles(&self, ticker: &str) -> Result<Option<StoredArticles>, StorageError> {
        let row = sqlx::query("SELECT data, expiration FROM articles WHERE ticker = ? AND expiration > ?")
            .bind(ticker)
            .bind(self.clock.now_millis())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(StoredArticles {
                payload: row.try_get("data")?,
                expires_at: row.try_get("expiration")?,
            })),
            None => {
                debug!(ticker = %ticker, "No live articles in SQLite");
                Ok(None)
            }
        }
    }

    async fn delete_expired(&self) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM articles WHERE expiration <= ?")
            .bind(self.clock.now_millis())
            .execute(&self.pool)
            .await?;

        let count = result.rows_affected();
        if count > 0 {
            info!(count, "Deleted expired articles from SQLite");
        }
        Ok(count)
    }

    async fn close(&self) {
        info!("Closing SQLite article store");
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use tempfile::TempDir;

    async fn open(dir: &TempDir, clock: Arc<ManualClock>) -> SqliteStore {
        let url = format!("sqlite://{}", dir.path().join("articles.db").display());
        SqliteStore::connect_with(&url, clock, &RetryPolicy::once()).await.unwrap()
    }

    #[tokio::test]
    async fn test_save_get_and_upsert() {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(ManualClock::new(1_000));
        let store = open(&dir, clock).await;

        store.save_articles("AAPL", b"[1]", 10_000).await.unwrap();
        store.save_articles("AAPL", b"[2]", 20_000).await.unwrap();

        let found = store.get_articles("AAPL").await.unwrap().unwrap();
        assert_eq!(found.payload, b"[2]");
        assert_eq!(found.expires_at, 20_000);
        assert_eq!(store.count_all().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_filters_expired() {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(ManualClock::new(0));
        let store = open(&dir, clock.clone()).await;

        store.save_articles("IBM", b"[]", 500).await.unwrap();
        assert!(store.get_articles("IBM").await.unwrap().is_some());

        clock.set(500);
        assert!(store.get_articles("IBM").await.unwrap().is_none());
        assert_eq!(store.count_all().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_expired() {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(ManualClock::new(0));
        let store = open(&dir, clock.clone()).await;

        store.save_articles("OLD", b"[]", 100).await.unwrap();
        store.save_articles("NEW", b"[]", 1_000).await.unwrap();

        clock.set(200);
        assert_eq!(store.delete_expired().await.unwrap(), 1);
        assert_eq!(store.delete_expired().await.unwrap(), 0);
        assert!(store.get_articles("NEW").await.unwrap().is_some());
        assert_eq!(store.count_all().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_bad_url_fails_fast() {
        let result = SqliteStore::connect_with(
            "sqlite:///nonexistent-dir/definitely/missing.db",
            Arc::new(SystemClock),
            &RetryPolicy::once(),
        )
        .await;
        assert!(matches!(result, Err(StorageError::Connect(_))));
    }
}
