// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! stocknews - entry point.

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use stocknews::args::Args;
use stocknews::news::{AlphaVantageClient, AlphaVantageConfig, CachedFetcher, MultiFetcher, NewsProvider};
use stocknews::server::{self, AppState};
use stocknews::summarize::OllamaSummarizer;
use stocknews::{storage, SystemClock, TieredCache};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stocknews=info".into()),
        )
        .init();

    let args = Args::parse();
    info!(
        port = args.port,
        storage = %args.storage_url_redacted(),
        ttl_secs = args.cache_ttl_secs,
        "Starting stocknews"
    );

    let clock = Arc::new(SystemClock);
    let store = storage::connect(&args.storage_url(), clock.clone())
        .await
        .with_context(|| format!("failed to open article store at {}", args.storage_url_redacted()))?;

    let cache = Arc::new(TieredCache::with_clock(store.clone(), args.cache_config(), clock));

    let alphavantage = AlphaVantageClient::new(AlphaVantageConfig::new(args.alphavantage_api_key.clone()))
        .context("failed to build Alpha Vantage client")?;
    let providers: Vec<Arc<dyn NewsProvider>> = vec![Arc::new(CachedFetcher::new(alphavantage, cache.clone()))];
    let news = Arc::new(MultiFetcher::new(providers));
    let summarizer = Arc::new(
        OllamaSummarizer::new(args.ollama_url.clone(), args.ollama_model.clone())
            .context("failed to build Ollama client")?,
    );

    let state = Arc::new(AppState::new(news, summarizer));

    let served = server::serve(state, args.port, shutdown_signal()).await;

    cache.shutdown().await;
    store.close().await;
    info!("Shutdown complete");

    served.context("server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, stopping server gracefully");
}
