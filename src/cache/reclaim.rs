// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Background reclamation of expired entries.
//!
//! The two tiers are swept independently. A durable failure is logged and
//! leaves the fast-tier result in place; the next tick retries.

use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::{within, CacheInner, SweepReport};
use crate::storage::StorageError;

/// Tick every cleanup interval until `stop_rx` flips or its sender is dropped.
pub(super) async fn run(inner: Arc<CacheInner>, mut stop_rx: watch::Receiver<bool>) {
    let period = inner.cleanup_interval;
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    debug!(interval = ?period, "Reclamation task started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                inner.sweep().await;
            }
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    break;
                }
            }
        }
    }

    debug!("Reclamation task stopped");
}

impl CacheInner {
    pub(super) async fn sweep(&self) -> SweepReport {
        let now = self.clock.now_millis();

        let (fast_tier_evicted, remaining) = {
            let mut memory = self.memory.write();
            let before = memory.len();
            memory.retain(|_, entry| entry.is_live(now));
            (before - memory.len(), memory.len())
        };
        crate::metrics::set_fast_tier_entries(remaining);
        if fast_tier_evicted > 0 {
            crate::metrics::record_evictions("fast", fast_tier_evicted as u64);
            info!(count = fast_tier_evicted, "Evicted expired entries from memory");
        }

        let durable_evicted = match within(self.sweep_timeout, "delete_expired", self.store.delete_expired()).await {
            Ok(count) => {
                crate::metrics::record_evictions("durable", count);
                crate::metrics::record_operation("durable", "sweep", "ok");
                Some(count)
            }
            Err(e @ StorageError::Timeout { .. }) => {
                warn!(error = %e, timeout = ?self.sweep_timeout, "Storage sweep timed out");
                crate::metrics::record_error("durable", "sweep", e.kind());
                None
            }
            Err(e) => {
                error!(error = %e, "Error deleting expired articles from storage");
                crate::metrics::record_error("durable", "sweep", e.kind());
                None
            }
        };

        SweepReport {
            fast_tier_evicted,
            durable_evicted,
        }
    }
}
