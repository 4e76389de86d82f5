use super::fetch_json;
use crate::feasibility::{Coordinate, TemperatureRange};
use crate::sources::{ClimateSource, SourceError};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

const SERVICE: &str = "open-meteo";

/// Open-Meteo historical archive, reduced to the year's daily extremes.
#[derive(Debug, Clone)]
pub struct OpenMeteoClimateSource {
    client: Client,
    url: String,
}

impl OpenMeteoClimateSource {
    pub fn new(client: Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    daily: DailySeries,
}

#[derive(Debug, Deserialize)]
struct DailySeries {
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
}

fn year_bounds(year: i32) -> Result<(NaiveDate, NaiveDate), SourceError> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1);
    let end = NaiveDate::from_ymd_opt(year, 12, 31);
    start
        .zip(end)
        .ok_or_else(|| SourceError::malformed(SERVICE, format!("unsupported year {year}")))
}

#[async_trait]
impl ClimateSource for OpenMeteoClimateSource {
    async fn annual_range(
        &self,
        point: Coordinate,
        year: i32,
    ) -> Result<TemperatureRange, SourceError> {
        let (start, end) = year_bounds(year)?;
        let latitude = format!("{:.4}", point.latitude());
        let longitude = format!("{:.4}", point.longitude());
        let start = start.format("%Y-%m-%d").to_string();
        let end = end.format("%Y-%m-%d").to_string();
        let request = self.client.get(&self.url).query(&[
            ("latitude", latitude.as_str()),
            ("longitude", longitude.as_str()),
            ("start_date", start.as_str()),
            ("end_date", end.as_str()),
            ("daily", "temperature_2m_max,temperature_2m_min"),
            ("timezone", "UTC"),
        ]);

        let body: ArchiveResponse = fetch_json(SERVICE, request).await?;
        let max_c = body
            .daily
            .temperature_2m_max
            .iter()
            .flatten()
            .copied()
            .reduce(f64::max);
        let min_c = body
            .daily
            .temperature_2m_min
            .iter()
            .flatten()
            .copied()
            .reduce(f64::min);

        match (min_c, max_c) {
            (Some(min_c), Some(max_c)) => Ok(TemperatureRange { min_c, max_c }),
            _ => Err(SourceError::malformed(SERVICE, "no daily temperatures returned")),
        }
    }
}
