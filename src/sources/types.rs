// src/sources/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lexicon::SentimentLabel;

/// Signal domain a score belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    News,
    Social,
    Economic,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::News => "news",
            Domain::Social => "social",
            Domain::Economic => "economic",
        }
    }
}

/// One collected article or post. Immutable once collected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawItem {
    pub title: String,
    pub body: String,
    pub source: String,
    pub published_at: DateTime<Utc>,
    /// Upvotes/likes style weight; only social items carry one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement_weight: Option<f64>,
}

impl RawItem {
    /// Title and body joined for scoring.
    pub fn full_text(&self) -> String {
        format!("{} {}", self.title, self.body)
    }
}

/// A RawItem plus its per-item sentiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub item: RawItem,
    pub polarity: f64,
    pub label: SentimentLabel,
}

/// Per-domain reduction of many item scores onto the 2-5 scale.
/// Constructed once per aggregation cycle; owns its item list exclusively.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainScore {
    pub domain: Domain,
    pub value: f64,
    pub sample_count: usize,
    pub items: Vec<ScoredItem>,
}

/// Direction of an indicator between its last two observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendSign {
    Up,
    Down,
}

/// Which direction of movement is market-positive for an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorPolarity {
    HigherIsBetter,
    LowerIsBetter,
    Neutral,
}

/// One macroeconomic series snapshot. The trend is derived, never set:
/// up iff current > previous.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EconomicIndicator {
    pub name: String,
    pub current: f64,
    pub previous: f64,
    trend: TrendSign,
}

impl EconomicIndicator {
    pub fn new(name: impl Into<String>, current: f64, previous: f64) -> Self {
        Self {
            name: name.into(),
            current,
            previous,
            trend: if current > previous {
                TrendSign::Up
            } else {
                TrendSign::Down
            },
        }
    }

    pub fn trend(&self) -> TrendSign {
        self.trend
    }

    /// Polarity class is domain knowledge keyed on the series name.
    pub fn polarity_class(&self) -> IndicatorPolarity {
        match self.name.to_ascii_uppercase().as_str() {
            "GDP" | "CONSUMER_CONFIDENCE" => IndicatorPolarity::HigherIsBetter,
            "UNEMPLOYMENT" | "INFLATION" => IndicatorPolarity::LowerIsBetter,
            "INTEREST_RATE" => IndicatorPolarity::Neutral,
            // Unknown series default to higher-is-better.
            _ => IndicatorPolarity::HigherIsBetter,
        }
    }

    /// Favorability contribution: 1.0 when the movement is market-positive,
    /// 0.5 for neutral-polarity series regardless of direction, else 0.0.
    pub fn favorable_points(&self) -> f64 {
        match (self.polarity_class(), self.trend) {
            (IndicatorPolarity::Neutral, _) => 0.5,
            (IndicatorPolarity::HigherIsBetter, TrendSign::Up) => 1.0,
            (IndicatorPolarity::LowerIsBetter, TrendSign::Down) => 1.0,
            _ => 0.0,
        }
    }
}

/// External collector of articles/posts for one domain. May be
/// unconfigured or flaky; callers treat both identically.
#[async_trait::async_trait]
pub trait ItemProvider: Send + Sync {
    async fn fetch(&self, symbol: &str, display_name: Option<&str>) -> Result<Vec<RawItem>>;
    fn domain(&self) -> Domain;
    fn name(&self) -> &'static str;
}

/// External collector of macroeconomic indicator snapshots.
#[async_trait::async_trait]
pub trait IndicatorProvider: Send + Sync {
    async fn fetch(&self) -> Result<Vec<EconomicIndicator>>;
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trend_is_derived_from_observations() {
        assert_eq!(EconomicIndicator::new("GDP", 2.1, 2.0).trend(), TrendSign::Up);
        assert_eq!(EconomicIndicator::new("GDP", 2.0, 2.1).trend(), TrendSign::Down);
        // Flat series count as down (strict greater-than).
        assert_eq!(EconomicIndicator::new("GDP", 2.0, 2.0).trend(), TrendSign::Down);
    }

    #[test]
    fn favorability_follows_polarity_class() {
        assert_eq!(EconomicIndicator::new("GDP", 2.1, 2.0).favorable_points(), 1.0);
        assert_eq!(EconomicIndicator::new("UNEMPLOYMENT", 3.7, 4.0).favorable_points(), 1.0);
        assert_eq!(EconomicIndicator::new("UNEMPLOYMENT", 4.2, 4.0).favorable_points(), 0.0);
        assert_eq!(EconomicIndicator::new("INFLATION", 2.1, 2.5).favorable_points(), 1.0);
        assert_eq!(EconomicIndicator::new("INTEREST_RATE", 5.5, 5.0).favorable_points(), 0.5);
        assert_eq!(EconomicIndicator::new("INTEREST_RATE", 5.0, 5.5).favorable_points(), 0.5);
        assert_eq!(EconomicIndicator::new("CONSUMER_CONFIDENCE", 99.0, 101.0).favorable_points(), 0.0);
    }
}
