// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Durable tier backends.
//!
//! All backends implement [`ArticleStore`]. The backend is picked once, from
//! the storage URL scheme, by [`connect`]; the cache only ever sees
//! `Arc<dyn ArticleStore>`.
//!
//! | URL                          | Backend           |
//! |------------------------------|-------------------|
//! | `sqlite://path/to/news.db`   | [`SqliteStore`]   |
//! | `postgres://user@host/db`    | [`PostgresStore`] |
//! | `memory:`                    | [`InMemoryStore`] |

pub mod traits;
pub mod memory;
pub mod sqlite;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use sqlite::SqliteStore;
pub use traits::{ArticleStore, StorageError, StoredArticles};

use std::sync::Arc;

use crate::clock::Clock;
use crate::resilience::retry::RetryPolicy;

/// Open the backend named by `url`.
///
/// This is the only place a storage failure is fatal: if the store cannot be
/// opened and initialized, the cache must not be built.
pub async fn connect(url: &str, clock: Arc<dyn Clock>) -> Result<Arc<dyn ArticleStore>, StorageError> {
    let policy = RetryPolicy::startup();

    if url.starts_with("sqlite:") {
        Ok(Arc::new(SqliteStore::connect_with(url, clock, &policy).await?))
    } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        Ok(Arc::new(PostgresStore::connect_with(url, clock, &policy).await?))
    } else if url == "memory:" {
        Ok(Arc::new(InMemoryStore::with_clock(clock)))
    } else {
        Err(StorageError::Connect(format!(
            "unsupported storage URL scheme: {}",
            redact_url(url)
        )))
    }
}

/// Strip credentials from a connection URL before it is logged.
#[must_use]
pub fn redact_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***@{}", &url[..scheme_end], &url[at + 1..])
        }
        _ => url.to_string(),
    }
}
