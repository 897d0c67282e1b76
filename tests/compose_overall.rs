//! CompositeSentiment.overall == round2(mean(news, social, economic)) for
//! valid triples on the 2-5 scale.

use chrono::Utc;
use market_sentiment_engine::compose::compose;

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[test]
fn overall_equals_rounded_mean_on_a_dense_grid() {
    let steps: Vec<f64> = (0..=30).map(|i| 2.0 + i as f64 * 0.1).collect();
    for &n in &steps {
        for &s in &steps {
            for &e in &steps {
                let c = compose(n, s, e, Utc::now());
                assert_eq!(c.overall, round2((n + s + e) / 3.0));
                assert!((2.0..=5.0).contains(&c.overall));
                assert_eq!((c.news, c.social, c.economic), (n, s, e));
            }
        }
    }
}

#[test]
fn rounding_is_two_decimal_places() {
    let c = compose(2.0, 2.0, 2.02, Utc::now());
    // mean = 2.006666 -> 2.01
    assert_eq!(c.overall, 2.01);

    let c = compose(4.99, 4.99, 5.0, Utc::now());
    // mean = 4.993333 -> 4.99
    assert_eq!(c.overall, 4.99);
}

#[test]
fn timestamp_is_preserved() {
    let ts = Utc::now();
    let c = compose(3.0, 3.0, 3.0, ts);
    assert_eq!(c.timestamp, ts);
}
