// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use thiserror::Error;

/// Failures surfaced by a [`super::NewsProvider`].
///
/// Cache faults never appear here; they are absorbed by the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NewsError {
    #[error("resource not found")]
    NotFound,
    #[error("external service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("internal processing error: {0}")]
    Internal(String),
    #[error("application configuration error: {0}")]
    Configuration(String),
    #[error("request timed out")]
    Timeout,
}

impl NewsError {
    /// Stable label for metrics and logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            NewsError::NotFound => "not_found",
            NewsError::ServiceUnavailable(_) => "unavailable",
            NewsError::Internal(_) => "internal",
            NewsError::Configuration(_) => "configuration",
            NewsError::Timeout => "timeout",
        }
    }
}
