// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Configuration for the tiered article cache.
//!
//! # Example
//!
//! ```
//! use stocknews::CacheConfig;
//! use std::time::Duration;
//!
//! // Defaults: 10 minute TTL, sweep every 5 minutes
//! let config = CacheConfig::default();
//! assert_eq!(config.ttl(), Duration::from_secs(600));
//! assert_eq!(config.cleanup_interval(), Duration::from_secs(300));
//!
//! // Explicit sweep interval
//! let config = CacheConfig {
//!     ttl_secs: 60,
//!     cleanup_interval_secs: Some(10),
//!     ..Default::default()
//! };
//! assert_eq!(config.cleanup_interval(), Duration::from_secs(10));
//! ```

use serde::Deserialize;
use std::time::Duration;

/// Configuration for [`crate::TieredCache`].
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Time-to-live for every written entry, in seconds (default: 600)
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Reclamation interval in seconds (default: half the TTL)
    #[serde(default)]
    pub cleanup_interval_secs: Option<u64>,

    /// Upper bound on a durable-tier call made from a request path, in millis
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,

    /// Upper bound on the durable-tier expired sweep, in seconds
    #[serde(default = "default_sweep_timeout_secs")]
    pub sweep_timeout_secs: u64,
}

fn default_ttl_secs() -> u64 { 600 }
fn default_store_timeout_ms() -> u64 { 5_000 }
fn default_sweep_timeout_secs() -> u64 { 30 }

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            cleanup_interval_secs: None,
            store_timeout_ms: default_store_timeout_ms(),
            sweep_timeout_secs: default_sweep_timeout_secs(),
        }
    }
}

impl CacheConfig {
    /// Build a config from a TTL, leaving everything else at defaults.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl_secs: ttl.as_secs(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Sweep interval; falls back to TTL/2, never below one second.
    #[must_use]
    pub fn cleanup_interval(&self) -> Duration {
        let secs = self.cleanup_interval_secs.unwrap_or(self.ttl_secs / 2);
        Duration::from_secs(secs.max(1))
    }

    #[must_use]
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    #[must_use]
    pub fn sweep_timeout(&self) -> Duration {
        Duration::from_secs(self.sweep_timeout_secs)
    }
}
