//! Collaborators that supply facts about a site.
//!
//! Network-backed sources return `Result<_, SourceError>`; the service turns errors into
//! unknown readings so no single source can abort an evaluation. Local sources always
//! resolve.

pub mod http;
pub mod local;

use crate::config::SourcesConfig;
use crate::feasibility::{
    Coordinate, FeasibilityConfig, FloodReading, RiskCategory, SiteClass, TemperatureRange,
};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve free-form address text, `Ok(None)` when nothing matches.
    async fn resolve(&self, address: &str) -> Result<Option<Coordinate>, SourceError>;
}

#[async_trait]
pub trait ElevationSource: Send + Sync {
    async fn elevation(&self, point: Coordinate) -> Result<f64, SourceError>;
}

#[async_trait]
pub trait FloodZoneSource: Send + Sync {
    async fn flood_zone(&self, point: Coordinate) -> Result<FloodReading, SourceError>;
}

#[async_trait]
pub trait SeismicHazardSource: Send + Sync {
    /// Short-period spectral acceleration (`Ss`) for the point.
    async fn design_parameter(
        &self,
        point: Coordinate,
        risk_category: RiskCategory,
        site_class: SiteClass,
    ) -> Result<f64, SourceError>;
}

#[async_trait]
pub trait RoadProximitySource: Send + Sync {
    async fn has_road_within(&self, point: Coordinate, radius_km: f64)
        -> Result<bool, SourceError>;
}

#[async_trait]
pub trait ClimateSource: Send + Sync {
    async fn annual_range(
        &self,
        point: Coordinate,
        year: i32,
    ) -> Result<TemperatureRange, SourceError>;
}

pub trait PopulationDensitySource: Send + Sync {
    fn estimate(&self, point: &Coordinate) -> f64;

    /// Whether the estimate is a placeholder rather than census data.
    fn is_placeholder(&self) -> bool {
        true
    }
}

pub trait ZoningClassifier: Send + Sync {
    fn is_compatible(&self, address: &str) -> bool;
}

pub trait UtilityAvailabilitySource: Send + Sync {
    fn available(&self, point: &Coordinate) -> bool;

    fn is_placeholder(&self) -> bool {
        true
    }
}

/// Failure talking to an external source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("{service} request failed: {detail}")]
    Transport {
        service: &'static str,
        detail: String,
    },
    #[error("{service} returned HTTP {status}")]
    Status { service: &'static str, status: u16 },
    #[error("{service} response malformed: {detail}")]
    Malformed {
        service: &'static str,
        detail: String,
    },
    #[error("http client unavailable: {0}")]
    Client(String),
}

impl SourceError {
    pub(crate) fn malformed(service: &'static str, detail: impl Into<String>) -> Self {
        SourceError::Malformed {
            service,
            detail: detail.into(),
        }
    }
}

/// Full set of collaborators consulted during one evaluation.
#[derive(Clone)]
pub struct SiteSources {
    pub geocoder: Arc<dyn Geocoder>,
    pub elevation: Arc<dyn ElevationSource>,
    pub flood: Arc<dyn FloodZoneSource>,
    pub seismic: Arc<dyn SeismicHazardSource>,
    pub roads: Arc<dyn RoadProximitySource>,
    pub climate: Arc<dyn ClimateSource>,
    pub population: Arc<dyn PopulationDensitySource>,
    pub zoning: Arc<dyn ZoningClassifier>,
    pub utilities: Arc<dyn UtilityAvailabilitySource>,
}

impl SiteSources {
    /// Wire the public HTTP services plus the local stubs.
    pub fn public(
        sources: &SourcesConfig,
        feasibility: &FeasibilityConfig,
    ) -> Result<Self, SourceError> {
        let client = http::build_client(sources)?;

        Ok(Self {
            geocoder: Arc::new(http::NominatimGeocoder::new(
                client.clone(),
                &sources.geocoder_url,
            )),
            elevation: Arc::new(http::OpenElevationSource::new(
                client.clone(),
                &sources.elevation_url,
            )),
            flood: Arc::new(http::FemaFloodSource::new(client.clone(), &sources.flood_url)),
            seismic: Arc::new(http::UsgsSeismicSource::new(
                client.clone(),
                &sources.seismic_url,
            )),
            roads: Arc::new(http::OverpassRoadSource::new(
                client.clone(),
                &sources.overpass_url,
            )),
            climate: Arc::new(http::OpenMeteoClimateSource::new(
                client,
                &sources.climate_url,
            )),
            population: Arc::new(local::StubPopulationDensity::new(
                feasibility.population_stub,
            )),
            zoning: Arc::new(local::KeywordZoningClassifier::new(
                feasibility.zoning_keywords.clone(),
            )),
            utilities: Arc::new(local::StubUtilityAvailability),
        })
    }
}

impl std::fmt::Debug for SiteSources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteSources").finish_non_exhaustive()
    }
}
