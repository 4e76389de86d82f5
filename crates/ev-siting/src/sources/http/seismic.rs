use super::fetch_json;
use crate::feasibility::{Coordinate, RiskCategory, SiteClass};
use crate::sources::{SeismicHazardSource, SourceError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const SERVICE: &str = "usgs-designmaps";

/// USGS seismic design maps (ASCE 7-16), returning the `Ss` parameter.
#[derive(Debug, Clone)]
pub struct UsgsSeismicSource {
    client: Client,
    url: String,
}

impl UsgsSeismicSource {
    pub fn new(client: Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DesignMapsResponse {
    response: DesignMapsBody,
}

#[derive(Debug, Deserialize)]
struct DesignMapsBody {
    data: DesignMapsData,
}

#[derive(Debug, Deserialize)]
struct DesignMapsData {
    ss: Option<f64>,
}

#[async_trait]
impl SeismicHazardSource for UsgsSeismicSource {
    async fn design_parameter(
        &self,
        point: Coordinate,
        risk_category: RiskCategory,
        site_class: SiteClass,
    ) -> Result<f64, SourceError> {
        let latitude = format!("{:.6}", point.latitude());
        let longitude = format!("{:.6}", point.longitude());
        let title = format!("{latitude},{longitude}");
        let request = self.client.get(&self.url).query(&[
            ("latitude", latitude.as_str()),
            ("longitude", longitude.as_str()),
            ("riskCategory", risk_category.as_param()),
            ("siteClass", site_class.as_param()),
            ("title", title.as_str()),
        ]);

        let body: DesignMapsResponse = fetch_json(SERVICE, request).await?;
        body.response
            .data
            .ss
            .ok_or_else(|| SourceError::malformed(SERVICE, "ss missing from response data"))
    }
}
