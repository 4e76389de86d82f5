use super::domain::{Coordinate, Profile, RiskCategory, SiteClass, TemperatureRange};
use serde::{Deserialize, Serialize};

/// Thresholds and default-table choices applied by the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityConfig {
    pub profile: Profile,
    pub max_elevation_m: f64,
    pub fallback_elevation_m: f64,
    pub temperature: TemperatureStrategy,
    pub flood_unknown: FloodUnknownPolicy,
    pub seismic_ss_threshold: f64,
    pub seismic_risk_category: RiskCategory,
    pub seismic_site_class: SiteClass,
    pub road_radius_km: f64,
    pub population_density_threshold: f64,
    pub population_stub: PopulationStub,
    pub zoning_keywords: Vec<String>,
}

impl Default for FeasibilityConfig {
    fn default() -> Self {
        Self {
            profile: Profile::Minimal,
            max_elevation_m: 2400.0,
            fallback_elevation_m: 1000.0,
            temperature: TemperatureStrategy::default(),
            flood_unknown: FloodUnknownPolicy::AssumeClear,
            seismic_ss_threshold: 1.0,
            seismic_risk_category: RiskCategory::III,
            seismic_site_class: SiteClass::D,
            road_radius_km: 0.5,
            population_density_threshold: 1000.0,
            population_stub: PopulationStub::default(),
            zoning_keywords: vec!["commercial".to_string(), "industrial".to_string()],
        }
    }
}

/// Latitude/longitude rectangle with inclusive edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn contains(&self, point: &Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.latitude())
            && (self.min_lon..=self.max_lon).contains(&point.longitude())
    }

    /// Southwest desert band (SE California, SW Arizona, S Nevada).
    pub fn southwest_heat_zone() -> Self {
        Self {
            min_lat: 33.0,
            max_lat: 37.0,
            min_lon: -118.0,
            max_lon: -112.0,
        }
    }
}

/// How the temperature check is decided. Exactly one strategy is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum TemperatureStrategy {
    /// Fails when the site lies inside the high-heat box.
    HeatZoneBox { zone: BoundingBox },
    /// Fails when the annual min/max leave the operating band (inclusive).
    ClimateRange {
        band: TemperatureRange,
        reference_year: i32,
        unknown: ClimateUnknownPolicy,
    },
}

impl TemperatureStrategy {
    pub fn heat_zone_box() -> Self {
        TemperatureStrategy::HeatZoneBox {
            zone: BoundingBox::southwest_heat_zone(),
        }
    }

    pub fn climate_range() -> Self {
        TemperatureStrategy::ClimateRange {
            band: TemperatureRange {
                min_c: -20.0,
                max_c: 50.0,
            },
            reference_year: 2023,
            unknown: ClimateUnknownPolicy::AssumePass,
        }
    }
}

impl Default for TemperatureStrategy {
    fn default() -> Self {
        Self::heat_zone_box()
    }
}

/// Default applied when the flood layer cannot be queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloodUnknownPolicy {
    /// Treat the site as outside any flood zone. Favors availability over safety.
    AssumeClear,
    AssumeFlooded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClimateUnknownPolicy {
    AssumePass,
    AssumeFail,
}

/// Placeholder population estimator: one dense rectangle, a low constant elsewhere.
///
/// This is not a real estimator and exists only so the full profile can run
/// without a census collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationStub {
    pub dense_area: BoundingBox,
    pub dense_value: f64,
    pub fallback_value: f64,
}

impl PopulationStub {
    pub fn estimate(&self, point: &Coordinate) -> f64 {
        if self.dense_area.contains(point) {
            self.dense_value
        } else {
            self.fallback_value
        }
    }
}

impl Default for PopulationStub {
    fn default() -> Self {
        Self {
            dense_area: BoundingBox {
                min_lat: 40.5,
                max_lat: 41.0,
                min_lon: -74.3,
                max_lon: -73.7,
            },
            dense_value: 10_000.0,
            fallback_value: 500.0,
        }
    }
}
