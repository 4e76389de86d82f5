use super::{endpoint, fetch_json};
use crate::feasibility::Coordinate;
use crate::sources::{ElevationSource, SourceError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const SERVICE: &str = "open-elevation";

/// Open-Elevation point lookup (`/api/v1/lookup?locations=lat,lon`).
#[derive(Debug, Clone)]
pub struct OpenElevationSource {
    client: Client,
    base_url: String,
}

impl OpenElevationSource {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    results: Vec<LookupResult>,
}

#[derive(Debug, Deserialize)]
struct LookupResult {
    elevation: Option<f64>,
}

#[async_trait]
impl ElevationSource for OpenElevationSource {
    async fn elevation(&self, point: Coordinate) -> Result<f64, SourceError> {
        let locations = format!("{},{}", point.latitude(), point.longitude());
        let request = self
            .client
            .get(endpoint(&self.base_url, "api/v1/lookup"))
            .query(&[("locations", locations.as_str())]);

        let body: LookupResponse = fetch_json(SERVICE, request).await?;
        body.results
            .first()
            .and_then(|result| result.elevation)
            .ok_or_else(|| SourceError::malformed(SERVICE, "no elevation in results"))
    }
}
