//! Corpus-backed paths: the bundled CSV loads, trains the ensemble, and
//! feeds a non-empty trend series.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use market_sentiment_engine::config::EngineConfig;
use market_sentiment_engine::corpus::Corpus;
use market_sentiment_engine::sources::types::{
    Domain, EconomicIndicator, IndicatorProvider, ItemProvider, RawItem,
};
use market_sentiment_engine::{SentimentService, TrendDirection};

struct StaticItems(Domain);

#[async_trait]
impl ItemProvider for StaticItems {
    async fn fetch(&self, _s: &str, _n: Option<&str>) -> Result<Vec<RawItem>> {
        Ok(vec![RawItem {
            title: "markets steady after a calm session".to_string(),
            body: String::new(),
            source: "test".to_string(),
            published_at: Utc::now(),
            engagement_weight: (self.0 == Domain::Social).then_some(5.0),
        }])
    }
    fn domain(&self) -> Domain {
        self.0
    }
    fn name(&self) -> &'static str {
        "static"
    }
}

struct StaticIndicators;

#[async_trait]
impl IndicatorProvider for StaticIndicators {
    async fn fetch(&self) -> Result<Vec<EconomicIndicator>> {
        Ok(vec![EconomicIndicator::new("GDP", 2.2, 2.1)])
    }
    fn name(&self) -> &'static str {
        "static"
    }
}

fn corpus_service() -> SentimentService {
    let corpus = Corpus::load_from_file("data/market_sentiment.csv").expect("bundled corpus");
    assert!(!corpus.is_empty());

    let config = EngineConfig {
        rng_seed: Some(21),
        ..EngineConfig::default()
    };
    SentimentService::with_providers(
        config,
        Arc::new(StaticItems(Domain::News)),
        Arc::new(StaticItems(Domain::Social)),
        Arc::new(StaticIndicators),
        Some(corpus),
    )
}

#[test]
fn bundled_corpus_parses_and_aggregates_daily() {
    let corpus = Corpus::load_from_file("data/market_sentiment.csv").unwrap();
    assert!(corpus.len() >= 40);

    let daily = corpus.daily_sentiment();
    assert!(daily.len() >= 8);
    assert!(daily.windows(2).all(|w| w[0].0 < w[1].0));
    assert!(daily.iter().all(|(_, s)| (-1.0..=1.0).contains(s)));

    assert!(!corpus.recent_texts("news", 10).is_empty());
    assert!(!corpus.recent_texts("twitter", 10).is_empty());
}

#[tokio::test]
async fn service_trains_from_the_bundled_corpus() {
    let service = corpus_service();
    let accuracy = service.train_classifier().await.expect("training succeeds");
    assert!(service.is_classifier_trained());
    assert!((0.0..=1.0).contains(&accuracy));

    // The read path now runs through the trained ensemble.
    let rec = service.get_recommendation("AAPL").await.unwrap();
    assert!((2.0..=5.0).contains(&rec.overall_rating));
}

#[tokio::test]
async fn trend_series_comes_from_the_corpus() {
    let service = corpus_service();

    let week = service.sentiment_trend(7);
    assert!(!week.is_empty());
    assert!(week.len() <= 7);
    assert!(week.iter().all(|p| (0.0..=100.0).contains(&p.score)));

    let dir = service.trend_direction();
    assert!(matches!(
        dir,
        TrendDirection::Up | TrendDirection::Flat | TrendDirection::Down
    ));
}
