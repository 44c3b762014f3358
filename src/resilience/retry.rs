// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Bounded exponential backoff for opening durable stores.
//!
//! Only startup work (connect, schema creation) is retried. Per-request
//! store calls fail straight back to the cache, which degrades to a miss.
//!
//! # Example
//!
//! ```
//! use stocknews::resilience::retry::RetryPolicy;
//! use std::time::Duration;
//!
//! let startup = RetryPolicy::startup();
//! assert_eq!(startup.max_attempts, 5);
//! assert_eq!(startup.delay_before(2), Duration::from_millis(400));
//! ```

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// How many times to attempt an operation and how long to wait in between.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::startup()
    }
}

impl RetryPolicy {
    /// Five attempts, 200ms doubling to a 2s cap. A misconfigured URL
    /// surfaces within a few seconds instead of hanging startup.
    #[must_use]
    pub fn startup() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(2),
            factor: 2.0,
        }
    }

    /// Single attempt, no waiting.
    #[must_use]
    pub fn once() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            factor: 1.0,
        }
    }

    /// Delay to wait before retry number `retry` (1-based).
    #[must_use]
    pub fn delay_before(&self, retry: u32) -> Duration {
        let scaled = self
            .initial_delay
            .mul_f64(self.factor.powi(retry.saturating_sub(1) as i32));
        scaled.min(self.max_delay)
    }
}

/// Run `operation` until it succeeds or the policy's attempts are used up.
/// The last error is returned.
pub async fn retry<F, Fut, T, E>(
    operation_name: &str,
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt: usize = 0;

    loop {
        attempt += 1;
        match operation().await {
            Ok(val) => {
                if attempt > 1 {
                    info!(operation = operation_name, attempt, "Operation succeeded after retry");
                }
                return Ok(val);
            }
            Err(err) if attempt >= policy.max_attempts => return Err(err),
            Err(err) => {
                let delay = policy.delay_before(attempt as u32);
                warn!(
                    operation = operation_name,
                    attempt,
                    max_attempts = policy.max_attempts,
                    error = %err,
                    ?delay,
                    "Operation failed, retrying"
                );
                sleep(delay).await;
            }
        }
    }
}
