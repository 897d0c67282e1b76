use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Deserialize;

use crate::sources::types::{EconomicIndicator, IndicatorProvider};

/// FRED series tracked for the economic domain score, as
/// `(indicator name, series id)`.
const SERIES: &[(&str, &str)] = &[
    ("GDP", "GDP"),
    ("UNEMPLOYMENT", "UNRATE"),
    ("INFLATION", "CPIAUCSL"),
    ("INTEREST_RATE", "FEDFUNDS"),
    ("CONSUMER_CONFIDENCE", "UMCSENT"),
];

/// Macro indicator provider backed by the FRED observations endpoint.
pub struct FredProvider {
    client: reqwest::Client,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    #[serde(default)]
    observations: Vec<Observation>,
}

#[derive(Debug, Deserialize)]
struct Observation {
    value: String,
}

impl FredProvider {
    pub fn new(client: reqwest::Client, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }

    async fn fetch_series(&self, key: &str, series_id: &str) -> Result<(f64, f64)> {
        let start = (Utc::now() - Duration::days(90)).format("%Y-%m-%d").to_string();
        let resp = self
            .client
            .get("https://api.stlouisfed.org/fred/series/observations")
            .query(&[
                ("series_id", series_id),
                ("api_key", key),
                ("file_type", "json"),
                ("observation_start", start.as_str()),
                ("sort_order", "asc"),
            ])
            .send()
            .await
            .context("fred http get")?
            .error_for_status()
            .context("fred http status")?
            .json::<ObservationsResponse>()
            .await
            .context("fred json decode")?;

        // FRED reports gaps as ".", skip those.
        let values: Vec<f64> = resp
            .observations
            .iter()
            .filter_map(|o| o.value.parse::<f64>().ok())
            .collect();

        match values.as_slice() {
            [] => Err(anyhow!("series {series_id} returned no numeric observations")),
            [only] => Ok((*only, *only)),
            [.., prev, cur] => Ok((*cur, *prev)),
        }
    }
}

#[async_trait]
impl IndicatorProvider for FredProvider {
    async fn fetch(&self) -> Result<Vec<EconomicIndicator>> {
        let Some(key) = self.api_key.clone() else {
            bail!("fred api key not configured");
        };

        let mut indicators = Vec::with_capacity(SERIES.len());
        for (name, series_id) in SERIES {
            match self.fetch_series(&key, series_id).await {
                Ok((current, previous)) => {
                    indicators.push(EconomicIndicator::new(*name, current, previous));
                }
                // Individual series failure is skipped, not fatal.
                Err(e) => {
                    tracing::warn!(error = ?e, series = series_id, "indicator fetch failed");
                }
            }
        }

        Ok(indicators)
    }

    fn name(&self) -> &'static str {
        "fred"
    }
}
