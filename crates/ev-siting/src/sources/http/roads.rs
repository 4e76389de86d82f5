use super::fetch_json;
use crate::feasibility::Coordinate;
use crate::sources::{RoadProximitySource, SourceError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

const SERVICE: &str = "overpass";

/// Counts OpenStreetMap ways tagged `highway` around the point via Overpass QL.
#[derive(Debug, Clone)]
pub struct OverpassRoadSource {
    client: Client,
    url: String,
}

impl OverpassRoadSource {
    pub fn new(client: Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }
}

pub(crate) fn road_count_query(point: &Coordinate, radius_km: f64) -> String {
    let radius_m = (radius_km * 1000.0).round().max(0.0);
    format!(
        "[out:json][timeout:25];way(around:{radius_m:.0},{:.6},{:.6})[highway];out count;",
        point.latitude(),
        point.longitude()
    )
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<CountElement>,
}

#[derive(Debug, Deserialize)]
struct CountElement {
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[async_trait]
impl RoadProximitySource for OverpassRoadSource {
    async fn has_road_within(
        &self,
        point: Coordinate,
        radius_km: f64,
    ) -> Result<bool, SourceError> {
        let query = road_count_query(&point, radius_km);
        let request = self.client.get(&self.url).query(&[("data", query.as_str())]);

        let body: OverpassResponse = fetch_json(SERVICE, request).await?;
        let ways = body
            .elements
            .first()
            .and_then(|element| element.tags.get("ways").or_else(|| element.tags.get("total")))
            .ok_or_else(|| SourceError::malformed(SERVICE, "count element missing"))?;

        let count = ways
            .trim()
            .parse::<u64>()
            .map_err(|_| SourceError::malformed(SERVICE, format!("way count '{ways}'")))?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_uses_meters() {
        let point = Coordinate::new(39.96, -82.99).expect("valid");
        let query = road_count_query(&point, 0.5);
        assert!(query.contains("around:500,39.960000,-82.990000"));
        assert!(query.ends_with("out count;"));
    }
}
