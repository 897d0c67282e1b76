//! Historical corpus input: tabular records carrying text, a numeric
//! sentiment label, and macro columns. Feeds classifier training, the daily
//! trend series, and the last-resort aggregation fallback.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

/// One corpus row. Column names follow the upstream export.
#[derive(Debug, Clone, Deserialize)]
pub struct CorpusRecord {
    #[serde(rename = "title/text")]
    pub text: String,
    pub sentiment: f64,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub unemployment_rate: Option<f64>,
    #[serde(default)]
    pub cpi: Option<f64>,
    #[serde(default)]
    pub sp500: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct Corpus {
    records: Vec<CorpusRecord>,
}

impl Corpus {
    /// Load and timestamp-sort a CSV corpus.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("opening corpus csv at {}", path.display()))?;

        let mut records = Vec::new();
        for row in reader.deserialize::<CorpusRecord>() {
            match row {
                Ok(rec) => records.push(rec),
                // A malformed row is not worth failing the whole load.
                Err(e) => tracing::warn!(error = %e, "skipping malformed corpus row"),
            }
        }
        records.sort_by_key(|r| r.timestamp);

        tracing::info!(rows = records.len(), path = %path.display(), "corpus loaded");
        Ok(Self { records })
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[CorpusRecord] {
        &self.records
    }

    /// `(text, sentiment)` pairs for classifier training.
    pub fn training_samples(&self) -> Vec<(String, f64)> {
        self.records
            .iter()
            .map(|r| (r.text.clone(), r.sentiment))
            .collect()
    }

    /// Date-ascending daily mean sentiment on the raw [-1, 1] scale.
    pub fn daily_sentiment(&self) -> Vec<(NaiveDate, f64)> {
        let mut by_day: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
        for r in &self.records {
            let entry = by_day.entry(r.timestamp.date_naive()).or_insert((0.0, 0));
            entry.0 += r.sentiment;
            entry.1 += 1;
        }
        by_day
            .into_iter()
            .map(|(day, (sum, n))| (day, sum / n as f64))
            .collect()
    }

    /// Most recent `count` texts of one record kind (e.g. "news",
    /// "twitter"), oldest first. Last-resort fallback material.
    pub fn recent_texts(&self, kind: &str, count: usize) -> Vec<&CorpusRecord> {
        let matching: Vec<&CorpusRecord> =
            self.records.iter().filter(|r| r.kind == kind).collect();
        let start = matching.len().saturating_sub(count);
        matching[start..].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_sample_csv() -> tempfile_like::TempCsv {
        let mut f = tempfile_like::TempCsv::new("corpus_test");
        writeln!(
            f.file,
            "title/text,sentiment,timestamp,source,type,unemployment_rate,cpi,sp500"
        )
        .unwrap();
        writeln!(
            f.file,
            "Markets rally on earnings,0.6,2024-01-02T10:00:00Z,Reuters,news,3.8,280.1,4700"
        )
        .unwrap();
        writeln!(
            f.file,
            "Stocks slide on fears,-0.5,2024-01-02T15:00:00Z,Bloomberg,news,3.8,280.1,4690"
        )
        .unwrap();
        writeln!(
            f.file,
            "Feeling bullish today,0.4,2024-01-03T09:00:00Z,reddit,twitter,3.8,280.2,4710"
        )
        .unwrap();
        f
    }

    // Minimal scoped temp-file helper so tests clean up after themselves.
    mod tempfile_like {
        use std::fs::File;
        use std::path::PathBuf;
        use std::sync::atomic::{AtomicUsize, Ordering};

        static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

        pub struct TempCsv {
            pub file: File,
            pub path: PathBuf,
        }

        impl TempCsv {
            pub fn new(tag: &str) -> Self {
                let id = NEXT_ID.fetch_add(1, Ordering::SeqCst);
                let path = std::env::temp_dir().join(format!(
                    "mse_{tag}_{}_{id}.csv",
                    std::process::id()
                ));
                let file = File::create(&path).unwrap();
                Self { file, path }
            }
        }

        impl Drop for TempCsv {
            fn drop(&mut self) {
                let _ = std::fs::remove_file(&self.path);
            }
        }
    }

    #[test]
    fn loads_and_sorts_records() {
        let tmp = write_sample_csv();
        let corpus = Corpus::load_from_file(&tmp.path).unwrap();
        assert_eq!(corpus.len(), 3);
        let ts: Vec<_> = corpus.records().iter().map(|r| r.timestamp).collect();
        assert!(ts.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn daily_sentiment_averages_per_day() {
        let tmp = write_sample_csv();
        let corpus = Corpus::load_from_file(&tmp.path).unwrap();
        let daily = corpus.daily_sentiment();
        assert_eq!(daily.len(), 2);
        // Jan 2: mean(0.6, -0.5) = 0.05
        assert!((daily[0].1 - 0.05).abs() < 1e-9);
        assert!((daily[1].1 - 0.4).abs() < 1e-9);
        assert!(daily[0].0 < daily[1].0);
    }

    #[test]
    fn recent_texts_filters_by_kind() {
        let tmp = write_sample_csv();
        let corpus = Corpus::load_from_file(&tmp.path).unwrap();
        assert_eq!(corpus.recent_texts("news", 10).len(), 2);
        assert_eq!(corpus.recent_texts("twitter", 1).len(), 1);
        assert_eq!(corpus.recent_texts("econ", 5).len(), 0);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Corpus::load_from_file("/definitely/not/here.csv").is_err());
    }
}
