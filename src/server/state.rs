// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use std::sync::Arc;
use std::time::Duration;

use crate::news::NewsProvider;
use crate::summarize::Summarizer;

/// Shared across handlers behind an `Arc`.
pub struct AppState {
    pub news: Arc<dyn NewsProvider>,
    pub summarizer: Arc<dyn Summarizer>,
    /// Deadline for the news fetch and, separately, for the summary call
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(news: Arc<dyn NewsProvider>, summarizer: Arc<dyn Summarizer>) -> Self {
        Self {
            news,
            summarizer,
            request_timeout: Duration::from_secs(10),
        }
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
