// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! News article record and the codec used for durable payloads.
//!
//! The durable tier stores articles as an opaque byte blob. The cache only
//! ever goes through [`encode_articles`] / [`decode_articles`], so the record
//! schema can change without touching storage code.
//!
//! # Example
//!
//! ```
//! use stocknews::article::{Article, encode_articles, decode_articles};
//!
//! let articles = vec![Article {
//!     title: "Apple beats estimates".into(),
//!     tickers: vec!["AAPL".into()],
//!     ..Default::default()
//! }];
//!
//! let bytes = encode_articles(&articles).unwrap();
//! assert_eq!(decode_articles(&bytes).unwrap(), articles);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single news article.
///
/// Field names on the wire match the upstream news-sentiment feed and are
/// reused for both the durable payload and HTTP responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    pub summary: String,
    #[serde(rename = "banner_image")]
    pub image: String,
    /// Provider timestamp, kept verbatim (e.g. `20240105T133000`).
    #[serde(rename = "time_published")]
    pub published_at: String,
    pub source: String,
    #[serde(rename = "overall_sentiment_label")]
    pub sentiment: String,
    #[serde(default)]
    pub tickers: Vec<String>,
}

#[derive(Error, Debug)]
#[error("article payload codec error: {0}")]
pub struct CodecError(#[from] serde_json::Error);

/// Serialize a list of articles into a durable payload.
pub fn encode_articles(articles: &[Article]) -> Result<Vec<u8>, CodecError> {
    Ok(serde_json::to_vec(articles)?)
}

/// Parse a durable payload back into articles.
///
/// Malformed input yields `Err`, never a panic.
pub fn decode_articles(payload: &[u8]) -> Result<Vec<Article>, CodecError> {
    Ok(serde_json::from_slice(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(title: &str) -> Article {
        Article {
            title: title.to_string(),
            url: format!("https://news.example.com/{}", title),
            summary: "Shares rose after the earnings call".to_string(),
            image: "https://img.example.com/banner.png".to_string(),
            published_at: "20240105T133000".to_string(),
            source: "Reuters".to_string(),
            sentiment: "Bullish".to_string(),
            tickers: vec!["AAPL".to_string(), "MSFT".to_string()],
        }
    }

    #[test]
    fn test_round_trip() {
        let articles = vec![sample("one"), sample("two")];
        let bytes = encode_articles(&articles).unwrap();
        assert_eq!(decode_articles(&bytes).unwrap(), articles);
    }

    #[test]
    fn test_round_trip_empty() {
        let bytes = encode_articles(&[]).unwrap();
        assert_eq!(bytes, b"[]");
        assert!(decode_articles(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_value(sample("x")).unwrap();
        assert_eq!(json["banner_image"], "https://img.example.com/banner.png");
        assert_eq!(json["time_published"], "20240105T133000");
        assert_eq!(json["overall_sentiment_label"], "Bullish");
        assert_eq!(json["tickers"][1], "MSFT");
    }

    #[test]
    fn test_missing_tickers_defaults_to_empty() {
        let payload = br#"[{"title":"t","url":"u","summary":"s","banner_image":"","time_published":"","source":"","overall_sentiment_label":""}]"#;
        let decoded = decode_articles(payload).unwrap();
        assert_eq!(decoded.len(), 1);
        assert!(decoded[0].tickers.is_empty());
    }

    #[test]
    fn test_malformed_payload_is_error() {
        assert!(decode_articles(b"not json").is_err());
        assert!(decode_articles(b"{\"title\":1}").is_err());
        assert!(decode_articles(b"").is_err());
    }
}
