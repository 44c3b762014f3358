// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use crate::article::Article;

/// Keep articles whose title or summary contains `query`, ignoring case.
///
/// Order is preserved. An empty query keeps everything.
#[must_use]
pub fn filter_by_query(articles: Vec<Article>, query: &str) -> Vec<Article> {
    let needle = query.to_lowercase();
    articles
        .into_iter()
        .filter(|a| a.title.to_lowercase().contains(&needle) || a.summary.to_lowercase().contains(&needle))
        .collect()
}
