use async_trait::async_trait;
use ev_siting::feasibility::{
    Coordinate, FeasibilityConfig, FloodReading, RiskCategory, SiteClass,
    SiteFeasibilityService, TemperatureRange,
};
use ev_siting::sources::local::{
    KeywordZoningClassifier, StubPopulationDensity, StubUtilityAvailability,
};
use ev_siting::sources::{
    ClimateSource, ElevationSource, FloodZoneSource, Geocoder, RoadProximitySource,
    SeismicHazardSource, SiteSources, SourceError,
};
use std::sync::Arc;

pub(crate) const KNOWN_ADDRESS: &str = "400 Logistics Dr, Industrial Park, Columbus OH";

struct SingleAddressGeocoder;

#[async_trait]
impl Geocoder for SingleAddressGeocoder {
    async fn resolve(&self, address: &str) -> Result<Option<Coordinate>, SourceError> {
        if address == KNOWN_ADDRESS {
            Ok(Coordinate::new(39.96, -82.99).ok())
        } else {
            Ok(None)
        }
    }
}

struct FixedHazards;

#[async_trait]
impl ElevationSource for FixedHazards {
    async fn elevation(&self, _point: Coordinate) -> Result<f64, SourceError> {
        Ok(275.0)
    }
}

#[async_trait]
impl FloodZoneSource for FixedHazards {
    async fn flood_zone(&self, _point: Coordinate) -> Result<FloodReading, SourceError> {
        Ok(FloodReading {
            in_hazard_layer: false,
            zone_code: None,
        })
    }
}

#[async_trait]
impl SeismicHazardSource for FixedHazards {
    async fn design_parameter(
        &self,
        _point: Coordinate,
        _risk_category: RiskCategory,
        _site_class: SiteClass,
    ) -> Result<f64, SourceError> {
        Ok(0.15)
    }
}

#[async_trait]
impl RoadProximitySource for FixedHazards {
    async fn has_road_within(
        &self,
        _point: Coordinate,
        _radius_km: f64,
    ) -> Result<bool, SourceError> {
        Ok(true)
    }
}

#[async_trait]
impl ClimateSource for FixedHazards {
    async fn annual_range(
        &self,
        _point: Coordinate,
        _year: i32,
    ) -> Result<TemperatureRange, SourceError> {
        Err(SourceError::Status {
            service: "fixed-climate",
            status: 503,
        })
    }
}

/// Service backed by in-process sources that only recognise [`KNOWN_ADDRESS`].
pub(crate) fn fixture_service() -> SiteFeasibilityService {
    let config = FeasibilityConfig::default();
    let hazards = Arc::new(FixedHazards);
    let sources = SiteSources {
        geocoder: Arc::new(SingleAddressGeocoder),
        elevation: hazards.clone(),
        flood: hazards.clone(),
        seismic: hazards.clone(),
        roads: hazards.clone(),
        climate: hazards,
        population: Arc::new(StubPopulationDensity::new(config.population_stub)),
        zoning: Arc::new(KeywordZoningClassifier::new(config.zoning_keywords.clone())),
        utilities: Arc::new(StubUtilityAvailability),
    };
    SiteFeasibilityService::new(sources, config)
}
