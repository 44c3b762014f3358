// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Command-line and environment configuration for the `stocknews` binary.
//!
//! Every flag can also be set through the environment (and a `.env` file,
//! loaded before parsing).

use clap::Parser;
use std::time::Duration;

use crate::config::CacheConfig;
use crate::storage::redact_url;

#[derive(Parser, Debug, Clone)]
#[command(name = "stocknews", version, about = "Ticker news API with a two-tier article cache")]
pub struct Args {
    /// Port to listen on
    #[arg(long, env = "APP_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Full storage URL (sqlite://..., postgres://..., memory:). Overrides
    /// the POSTGRES_* settings.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    #[arg(long, env = "POSTGRES_HOST", default_value = "localhost")]
    pub postgres_host: String,

    #[arg(long, env = "POSTGRES_PORT", default_value_t = 5434)]
    pub postgres_port: u16,

    #[arg(long, env = "POSTGRES_USER", default_value = "postgres")]
    pub postgres_user: String,

    #[arg(long, env = "POSTGRES_PASSWORD", default_value = "postgres", hide_env_values = true)]
    pub postgres_password: String,

    #[arg(long, env = "POSTGRES_DB", default_value = "stocknews")]
    pub postgres_db: String,

    /// Alpha Vantage API key
    #[arg(long, env = "ALPHAVANTAGE_API_KEY", default_value = "", hide_env_values = true)]
    pub alphavantage_api_key: String,

    /// Ollama base URL
    #[arg(long, env = "OLLAMA_URL", default_value = "http://localhost:11434")]
    pub ollama_url: String,

    #[arg(long, env = "OLLAMA_MODEL", default_value = crate::summarize::DEFAULT_MODEL)]
    pub ollama_model: String,

    /// Article time-to-live in seconds
    #[arg(long, env = "CACHE_TTL_SECS", default_value_t = 600)]
    pub cache_ttl_secs: u64,

    /// Reclamation interval in seconds (default: half the TTL)
    #[arg(long, env = "CACHE_CLEANUP_INTERVAL_SECS")]
    pub cache_cleanup_interval_secs: Option<u64>,
}

impl Args {
    /// Storage URL: `DATABASE_URL` if set, otherwise assembled from the
    /// `POSTGRES_*` settings.
    ///
    /// User, password and database name are percent-encoded, so reserved
    /// characters in a password cannot move the host.
    #[must_use]
    pub fn storage_url(&self) -> String {
        match &self.database_url {
            Some(url) if !url.is_empty() => url.clone(),
            _ => format!(
                "postgres://{}:{}@{}:{}/{}",
                urlencoding::encode(&self.postgres_user),
                urlencoding::encode(&self.postgres_password),
                self.postgres_host,
                self.postgres_port,
                urlencoding::encode(&self.postgres_db)
            ),
        }
    }

    /// Storage URL safe to log.
    #[must_use]
    pub fn storage_url_redacted(&self) -> String {
        redact_url(&self.storage_url())
    }

    #[must_use]
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            cleanup_interval_secs: self.cache_cleanup_interval_secs,
            ..CacheConfig::with_ttl(Duration::from_secs(self.cache_ttl_secs))
        }
    }
}
