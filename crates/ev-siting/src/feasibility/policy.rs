//! Default table for readings a collaborator could not supply.
//!
//! Every substitution goes through this module so the defaults are applied the same
//! way for every check and always leave a `Provenance::Defaulted` trail.

use super::config::{FeasibilityConfig, FloodUnknownPolicy};
use super::domain::{
    CheckKind, FloodReading, Provenance, Reading, SiteObservations, TemperatureRange,
};
use super::rules::matches_zoning_keyword;
use tracing::debug;

/// Value a check is decided on, after defaults have been applied.
pub(crate) struct Resolved<T> {
    pub(crate) value: T,
    pub(crate) provenance: Provenance,
    pub(crate) default_reason: Option<String>,
}

impl<T> Resolved<T> {
    fn with(value: T, provenance: Provenance) -> Self {
        Self {
            value,
            provenance,
            default_reason: None,
        }
    }

    fn defaulted(check: CheckKind, value: T, reason: &str) -> Self {
        debug!(check = check.label(), %reason, "applying default reading");
        Self {
            value,
            provenance: Provenance::Defaulted,
            default_reason: Some(reason.to_string()),
        }
    }
}

fn measured_or<T: Clone>(
    check: CheckKind,
    reading: &Reading<T>,
    fallback: impl FnOnce() -> T,
) -> Resolved<T> {
    match reading {
        Reading::Measured { value } => Resolved::with(value.clone(), Provenance::Measured),
        Reading::Unknown { reason } => Resolved::defaulted(check, fallback(), reason),
    }
}

pub(crate) fn elevation(observations: &SiteObservations, config: &FeasibilityConfig) -> Resolved<f64> {
    measured_or(CheckKind::Elevation, &observations.elevation_m, || {
        config.fallback_elevation_m
    })
}

pub(crate) fn climate(observations: &SiteObservations) -> Resolved<Option<TemperatureRange>> {
    match &observations.climate {
        Reading::Measured { value } => Resolved::with(Some(*value), Provenance::Measured),
        Reading::Unknown { reason } => Resolved::defaulted(CheckKind::Temperature, None, reason),
    }
}

pub(crate) fn flood(
    observations: &SiteObservations,
    config: &FeasibilityConfig,
) -> Resolved<FloodReading> {
    measured_or(CheckKind::FloodZone, &observations.flood, || FloodReading {
        in_hazard_layer: matches!(config.flood_unknown, FloodUnknownPolicy::AssumeFlooded),
        zone_code: None,
    })
}

/// An unknown `Ss` is carried as `None` and treated as below the risk threshold.
pub(crate) fn seismic(observations: &SiteObservations) -> Resolved<Option<f64>> {
    match &observations.seismic_ss {
        Reading::Measured { value } => Resolved::with(Some(*value), Provenance::Measured),
        Reading::Unknown { reason } => Resolved::defaulted(CheckKind::SeismicZone, None, reason),
    }
}

pub(crate) fn road(observations: &SiteObservations) -> Resolved<bool> {
    measured_or(CheckKind::RoadProximity, &observations.road_nearby, || false)
}

pub(crate) fn population(
    observations: &SiteObservations,
    config: &FeasibilityConfig,
) -> Resolved<f64> {
    match observations.population_density {
        Some(sourced) => Resolved::with(sourced.value, sourced.provenance),
        None => Resolved::with(
            config.population_stub.estimate(&observations.coordinate),
            Provenance::Stubbed,
        ),
    }
}

pub(crate) fn zoning(observations: &SiteObservations, config: &FeasibilityConfig) -> Resolved<bool> {
    match observations.zoning_compatible {
        Some(sourced) => Resolved::with(sourced.value, sourced.provenance),
        None => Resolved::with(
            matches_zoning_keyword(&observations.address, &config.zoning_keywords),
            Provenance::Derived,
        ),
    }
}

pub(crate) fn utility(observations: &SiteObservations) -> Resolved<bool> {
    match observations.utility_available {
        Some(sourced) => Resolved::with(sourced.value, sourced.provenance),
        None => Resolved::with(true, Provenance::Stubbed),
    }
}
