use super::{endpoint, fetch_json};
use crate::feasibility::{Coordinate, FloodReading};
use crate::sources::{FloodZoneSource, SourceError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};

const SERVICE: &str = "fema-nfhl";

/// FEMA National Flood Hazard Layer, queried as an ArcGIS point intersection.
#[derive(Debug, Clone)]
pub struct FemaFloodSource {
    client: Client,
    layer_url: String,
}

impl FemaFloodSource {
    pub fn new(client: Client, layer_url: &str) -> Self {
        Self {
            client,
            layer_url: layer_url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    features: Option<Vec<Feature>>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    attributes: Map<String, Value>,
}

#[async_trait]
impl FloodZoneSource for FemaFloodSource {
    async fn flood_zone(&self, point: Coordinate) -> Result<FloodReading, SourceError> {
        let geometry = format!("{},{}", point.longitude(), point.latitude());
        let request = self
            .client
            .get(endpoint(&self.layer_url, "query"))
            .query(&[
                ("geometry", geometry.as_str()),
                ("geometryType", "esriGeometryPoint"),
                ("inSR", "4326"),
                ("spatialRel", "esriSpatialRelIntersects"),
                ("outFields", "*"),
                ("returnGeometry", "false"),
                ("f", "json"),
            ]);

        let body: QueryResponse = fetch_json(SERVICE, request).await?;
        // ArcGIS reports query errors with HTTP 200 and no feature list.
        let features = body
            .features
            .ok_or_else(|| SourceError::malformed(SERVICE, "response is missing features"))?;

        let zone_code = features
            .iter()
            .find_map(|feature| feature.attributes.get("FLD_ZONE"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(FloodReading {
            in_hazard_layer: !features.is_empty(),
            zone_code,
        })
    }
}
