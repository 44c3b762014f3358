//! Property tests for the durable payload codec and ticker validation.

use proptest::prelude::*;

use stocknews::server::is_valid_ticker;
use stocknews::{decode_articles, encode_articles, Article};

fn article_strategy() -> impl Strategy<Value = Article> {
    (
        ".{0,40}",
        ".{0,40}",
        ".{0,200}",
        prop::collection::vec("[A-Z]{1,5}", 0..4),
    )
        .prop_map(|(title, url, summary, tickers)| Article {
            title,
            url,
            summary,
            tickers,
            ..Default::default()
        })
}

proptest! {
    #[test]
    fn codec_round_trips(articles in prop::collection::vec(article_strategy(), 0..8)) {
        let bytes = encode_articles(&articles).unwrap();
        prop_assert_eq!(decode_articles(&bytes).unwrap(), articles);
    }

    #[test]
    fn decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = decode_articles(&bytes);
    }

    #[test]
    fn truncated_payload_is_rejected(articles in prop::collection::vec(article_strategy(), 1..4), cut in 1usize..16) {
        let bytes = encode_articles(&articles).unwrap();
        let end = bytes.len().saturating_sub(cut);
        prop_assert!(decode_articles(&bytes[..end]).is_err());
    }

    #[test]
    fn uppercase_tickers_are_valid(ticker in "[A-Z]{1,10}") {
        prop_assert!(is_valid_ticker(&ticker));
    }

    #[test]
    fn tickers_with_other_chars_are_invalid(ticker in "[A-Z]{0,4}[a-z0-9.\\-]{1,3}[A-Z]{0,3}") {
        prop_assert!(!is_valid_ticker(&ticker));
    }
}
