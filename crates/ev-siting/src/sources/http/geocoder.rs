use super::{endpoint, fetch_json};
use crate::feasibility::Coordinate;
use crate::sources::{Geocoder, SourceError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const SERVICE: &str = "nominatim";

/// Nominatim search API (`/search?format=json`), first match only.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn resolve(&self, address: &str) -> Result<Option<Coordinate>, SourceError> {
        let request = self
            .client
            .get(endpoint(&self.base_url, "search"))
            .query(&[("q", address), ("format", "json"), ("limit", "1")]);

        let places: Vec<NominatimPlace> = fetch_json(SERVICE, request).await?;
        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        let latitude = place
            .lat
            .trim()
            .parse::<f64>()
            .map_err(|_| SourceError::malformed(SERVICE, format!("latitude '{}'", place.lat)))?;
        let longitude = place
            .lon
            .trim()
            .parse::<f64>()
            .map_err(|_| SourceError::malformed(SERVICE, format!("longitude '{}'", place.lon)))?;

        Coordinate::new(latitude, longitude)
            .map(Some)
            .map_err(|err| SourceError::malformed(SERVICE, err.to_string()))
    }
}
