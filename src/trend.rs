//! # Trend Calculator
//! Maps the daily sentiment series onto the 0-100 display scale, windows
//! it, and classifies the short-term direction used by the recommendation
//! engine.
//!
//! Short windows get extra Gaussian jitter and long windows a little, a
//! deliberate visual-variety policy carried over from the upstream
//! dashboard; direction is computed from the jittered series the consumer
//! actually sees.

use chrono::NaiveDate;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// One displayable trend observation, clamped to [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Flat,
    Down,
}

/// Jitter applied per window length: more for week views, a little for
/// year views, none in between.
fn jitter_sigma(window_days: usize) -> Option<f64> {
    if window_days <= 7 {
        Some(5.0)
    } else if window_days >= 365 {
        Some(2.0)
    } else {
        None
    }
}

/// Build the trailing display series from date-ascending daily averages on
/// the raw [-1, 1] scale.
pub fn trend_series<R: Rng + ?Sized>(
    daily: &[(NaiveDate, f64)],
    window_days: usize,
    rng: &mut R,
) -> Vec<TrendPoint> {
    let start = daily.len().saturating_sub(window_days);
    let sigma = jitter_sigma(window_days);
    let normal = sigma.map(|s| Normal::new(0.0, s).expect("valid sigma"));

    daily[start..]
        .iter()
        .map(|&(date, sentiment)| {
            let mut score = ((sentiment + 1.0) * 50.0).clamp(0.0, 100.0);
            if let Some(n) = &normal {
                score = (score + n.sample(rng)).clamp(0.0, 100.0);
            }
            TrendPoint { date, score }
        })
        .collect()
}

/// Direction over the last five points: Up iff the last exceeds the first,
/// Down iff below, Flat for fewer than two points or a tie.
pub fn direction(points: &[TrendPoint]) -> TrendDirection {
    let start = points.len().saturating_sub(5);
    let recent = &points[start..];
    if recent.len() < 2 {
        return TrendDirection::Flat;
    }
    let first = recent[0].score;
    let last = recent[recent.len() - 1].score;
    if last > first {
        TrendDirection::Up
    } else if last < first {
        TrendDirection::Down
    } else {
        TrendDirection::Flat
    }
}
