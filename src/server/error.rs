// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::news::NewsError;
use crate::summarize::SummaryError;

/// Handler failures, each mapped to a fixed status and client message.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid ticker format")]
    InvalidTicker,
    #[error("request timed out")]
    Timeout,
    #[error("no news found")]
    NotFound,
    #[error("external service unavailable")]
    Unavailable,
    #[error("internal server error")]
    Internal,
    #[error("unknown error")]
    Unknown,
    #[error("{0}")]
    Summary(String),
}

impl From<NewsError> for ApiError {
    fn from(e: NewsError) -> Self {
        match e {
            NewsError::Timeout => ApiError::Timeout,
            NewsError::NotFound => ApiError::NotFound,
            NewsError::ServiceUnavailable(_) => ApiError::Unavailable,
            NewsError::Internal(_) => ApiError::Internal,
            NewsError::Configuration(_) => ApiError::Unknown,
        }
    }
}

impl From<SummaryError> for ApiError {
    fn from(e: SummaryError) -> Self {
        match e {
            SummaryError::Timeout => ApiError::Timeout,
            other => ApiError::Summary(other.to_string()),
        }
    }
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::InvalidTicker => (StatusCode::BAD_REQUEST, "Invalid ticker format.".into()),
            ApiError::Timeout => (StatusCode::GATEWAY_TIMEOUT, "Request timed out.".into()),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                "No news found for the specified ticker.".into(),
            ),
            ApiError::Unavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "External service unavailable.".into(),
            ),
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.".into()),
            ApiError::Unknown => (StatusCode::INTERNAL_SERVER_ERROR, "Unknown error.".into()),
            ApiError::Summary(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_news_error_status_mapping() {
        let cases = [
            (NewsError::Timeout, StatusCode::GATEWAY_TIMEOUT),
            (NewsError::NotFound, StatusCode::NOT_FOUND),
            (NewsError::ServiceUnavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (NewsError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (NewsError::Configuration("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, expected) in cases {
            assert_eq!(ApiError::from(error).status_and_message().0, expected);
        }
    }

    #[test]
    fn test_configuration_error_is_unknown() {
        let (_, message) = ApiError::from(NewsError::Configuration("no key".into())).status_and_message();
        assert_eq!(message, "Unknown error.");
    }

    #[test]
    fn test_summary_error_carries_message() {
        let (status, message) = ApiError::from(SummaryError::Status(502)).status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(message.contains("502"));
    }
}
