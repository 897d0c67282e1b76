//! One-shot demo: build the service from the environment, train the
//! classifier if a corpus is available, and print the recommendation for a
//! symbol (first CLI argument, default AAPL).

use market_sentiment_engine::config::EngineConfig;
use market_sentiment_engine::SentimentService;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("market_sentiment_engine=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op where the environment is already set.
    let _ = dotenvy::dotenv();
    init_tracing();

    let symbol = std::env::args().nth(1).unwrap_or_else(|| "AAPL".to_string());
    let service = SentimentService::from_config(EngineConfig::from_env());

    if let Err(e) = service.train_classifier().await {
        tracing::warn!(error = ?e, "running with lexical fallback");
    }

    let sentiment = service.current_sentiment(&symbol).await?;
    println!("{}", serde_json::to_string_pretty(&sentiment)?);

    let recommendation = service.get_recommendation(&symbol).await?;
    println!("{}", serde_json::to_string_pretty(&recommendation)?);

    Ok(())
}
