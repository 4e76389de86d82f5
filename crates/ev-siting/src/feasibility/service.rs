use super::domain::{
    CheckKind, Coordinate, EvaluationOutcome, Profile, Provenance, Reading, SiteObservations,
    Sourced, UnresolvedReason,
};
use super::{FeasibilityConfig, FeasibilityEvaluator, TemperatureStrategy};
use crate::sources::{SiteSources, SourceError};
use tracing::{debug, info, warn};

/// Service composing the geocoder, hazard sources, and the evaluator.
#[derive(Debug, Clone)]
pub struct SiteFeasibilityService {
    sources: SiteSources,
    evaluator: FeasibilityEvaluator,
}

impl SiteFeasibilityService {
    pub fn new(sources: SiteSources, config: FeasibilityConfig) -> Self {
        Self {
            sources,
            evaluator: FeasibilityEvaluator::new(config),
        }
    }

    pub fn evaluator(&self) -> &FeasibilityEvaluator {
        &self.evaluator
    }

    pub fn default_profile(&self) -> Profile {
        self.evaluator.config().profile
    }

    /// Evaluate an address under the configured default profile.
    pub async fn evaluate(&self, address: &str) -> EvaluationOutcome {
        self.evaluate_profile(address, self.default_profile()).await
    }

    pub async fn evaluate_profile(&self, address: &str, profile: Profile) -> EvaluationOutcome {
        let address = address.trim();
        if address.is_empty() {
            return unresolved(address, UnresolvedReason::EmptyAddress);
        }

        let coordinate = match self.sources.geocoder.resolve(address).await {
            Ok(Some(coordinate)) => coordinate,
            Ok(None) => return unresolved(address, UnresolvedReason::NotFound),
            Err(err) => {
                warn!(%address, error = %err, "geocoding failed");
                return unresolved(
                    address,
                    UnresolvedReason::GeocoderUnavailable(err.to_string()),
                );
            }
        };

        let observations = self.observe(address, coordinate, profile).await;
        let verdict = self.evaluator.evaluate_profile(&observations, profile);

        info!(
            %address,
            %coordinate,
            profile = profile.label(),
            feasible = verdict.feasible(),
            defaulted = verdict.defaulted_checks().len(),
            "site evaluated"
        );

        EvaluationOutcome::Evaluated(verdict)
    }

    /// Query every collaborator the profile needs. Calls run concurrently and each
    /// resolves to a reading before the evaluator sees it.
    pub async fn observe(
        &self,
        address: &str,
        coordinate: Coordinate,
        profile: Profile,
    ) -> SiteObservations {
        let config = self.evaluator.config();
        let sources = &self.sources;

        let elevation = async {
            into_reading(
                CheckKind::Elevation,
                sources.elevation.elevation(coordinate).await,
            )
        };
        let flood = async {
            into_reading(
                CheckKind::FloodZone,
                sources.flood.flood_zone(coordinate).await,
            )
        };
        let seismic = async {
            into_reading(
                CheckKind::SeismicZone,
                sources
                    .seismic
                    .design_parameter(
                        coordinate,
                        config.seismic_risk_category,
                        config.seismic_site_class,
                    )
                    .await,
            )
        };
        let climate = async {
            match &config.temperature {
                TemperatureStrategy::ClimateRange { reference_year, .. } => {
                    Some(into_reading(
                        CheckKind::Temperature,
                        sources
                            .climate
                            .annual_range(coordinate, *reference_year)
                            .await,
                    ))
                }
                TemperatureStrategy::HeatZoneBox { .. } => None,
            }
        };
        let roads = async {
            if profile.includes(CheckKind::RoadProximity) {
                Some(into_reading(
                    CheckKind::RoadProximity,
                    sources
                        .roads
                        .has_road_within(coordinate, config.road_radius_km)
                        .await,
                ))
            } else {
                None
            }
        };

        let (elevation_m, flood, seismic_ss, climate, road_nearby) =
            tokio::join!(elevation, flood, seismic, climate, roads);

        let mut observations = SiteObservations::new(address, coordinate);
        observations.elevation_m = elevation_m;
        observations.flood = flood;
        observations.seismic_ss = seismic_ss;
        if let Some(climate) = climate {
            observations.climate = climate;
        }
        if let Some(road_nearby) = road_nearby {
            observations.road_nearby = road_nearby;
        }

        if profile == Profile::Full {
            observations.population_density = Some(Sourced {
                value: sources.population.estimate(&coordinate),
                provenance: placeholder_provenance(sources.population.is_placeholder()),
            });
            observations.zoning_compatible = Some(Sourced {
                value: sources.zoning.is_compatible(address),
                provenance: Provenance::Derived,
            });
            observations.utility_available = Some(Sourced {
                value: sources.utilities.available(&coordinate),
                provenance: placeholder_provenance(sources.utilities.is_placeholder()),
            });
        }

        debug!(?observations, "site observations collected");
        observations
    }
}

fn unresolved(address: &str, reason: UnresolvedReason) -> EvaluationOutcome {
    info!(%address, reason = %reason.summary(), "address not evaluated");
    EvaluationOutcome::Unresolved {
        address: address.to_string(),
        reason,
    }
}

fn into_reading<T>(check: CheckKind, result: Result<T, SourceError>) -> Reading<T> {
    if let Err(err) = &result {
        warn!(check = check.label(), error = %err, "source unavailable, default applies");
    }
    Reading::from_result(result)
}

fn placeholder_provenance(placeholder: bool) -> Provenance {
    if placeholder {
        Provenance::Stubbed
    } else {
        Provenance::Measured
    }
}
