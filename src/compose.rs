//! # Comprehensive Sentiment Composer
//! Merges the three domain scores into one overall value. Stateless;
//! caching is the serving layer's concern.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::sources::round2;

/// The blended view across domains, all values on the 2-5 scale.
/// Owns copies of the domain values only; item provenance is reported
/// separately for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeSentiment {
    pub news: f64,
    pub social: f64,
    pub economic: f64,
    /// Always `round2(mean(news, social, economic))`.
    pub overall: f64,
    pub timestamp: DateTime<Utc>,
}

/// Compose the three domain values; `overall` is the mean rounded to two
/// decimal places.
pub fn compose(news: f64, social: f64, economic: f64, timestamp: DateTime<Utc>) -> CompositeSentiment {
    CompositeSentiment {
        news,
        social,
        economic,
        overall: round2((news + social + economic) / 3.0),
        timestamp,
    }
}
