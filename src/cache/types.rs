// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Value types owned by the tiered cache.

use std::sync::Arc;

use crate::article::Article;

/// A fast-tier slot.
///
/// Presence in the map is not validity: an entry is logically gone once
/// `now >= expires_at`, whether or not a sweep has removed it yet.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: Arc<Vec<Article>>,
    /// Epoch millis; identical to the durable record's expiration
    pub expires_at: i64,
}

impl CacheEntry {
    #[must_use]
    pub fn new(value: Vec<Article>, expires_at: i64) -> Self {
        Self {
            value: Arc::new(value),
            expires_at,
        }
    }

    #[must_use]
    pub fn is_live(&self, now: i64) -> bool {
        now < self.expires_at
    }
}

/// Outcome of one reclamation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Entries dropped from the in-process map
    pub fast_tier_evicted: usize,
    /// Rows removed by the durable store; `None` if that call failed or timed out
    pub durable_evicted: Option<u64>,
}
