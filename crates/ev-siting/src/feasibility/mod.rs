//! Site feasibility screening for EV charging deployments.
//!
//! The evaluator is a pure function of already-resolved readings. The service wraps it
//! with geocoding and collaborator fan-out, and the batch runner drives the service over
//! a CSV of addresses.

pub mod batch;
mod config;
pub mod domain;
mod policy;
pub(crate) mod rules;
pub mod service;

pub use batch::{BatchError, BatchRunner, BatchSummary};
pub use config::{
    BoundingBox, ClimateUnknownPolicy, FeasibilityConfig, FloodUnknownPolicy, PopulationStub,
    TemperatureStrategy,
};
pub use domain::{
    CheckKind, CheckResult, CheckValue, Coordinate, CoordinateError, EvaluationOutcome,
    FeasibilityVerdict, FloodReading, Profile, Provenance, Reading, RiskCategory, SiteClass,
    SiteObservations, Sourced, TemperatureRange, UnresolvedReason,
};
pub use service::SiteFeasibilityService;

/// Stateless evaluator that applies the configured thresholds to site observations.
#[derive(Debug, Clone)]
pub struct FeasibilityEvaluator {
    config: FeasibilityConfig,
}

impl FeasibilityEvaluator {
    pub fn new(config: FeasibilityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FeasibilityConfig {
        &self.config
    }

    /// Evaluate under the configured default profile.
    pub fn evaluate(&self, observations: &SiteObservations) -> FeasibilityVerdict {
        self.evaluate_profile(observations, self.config.profile)
    }

    pub fn evaluate_profile(
        &self,
        observations: &SiteObservations,
        profile: Profile,
    ) -> FeasibilityVerdict {
        let checks = profile
            .checks()
            .iter()
            .map(|check| rules::run_check(*check, observations, &self.config))
            .collect();

        FeasibilityVerdict::new(
            observations.address.clone(),
            profile,
            observations.coordinate,
            checks,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinate(latitude: f64, longitude: f64) -> Coordinate {
        Coordinate::new(latitude, longitude).expect("valid coordinate")
    }

    /// Observations that pass every check of the full profile.
    fn passing_site() -> SiteObservations {
        let mut site = SiteObservations::new(
            "400 Logistics Dr, Industrial Park, Columbus OH",
            coordinate(39.96, -82.99),
        );
        site.elevation_m = Reading::measured(275.0);
        site.flood = Reading::measured(FloodReading {
            in_hazard_layer: false,
            zone_code: None,
        });
        site.seismic_ss = Reading::measured(0.12);
        site.road_nearby = Reading::measured(true);
        site.population_density = Some(Sourced {
            value: 2500.0,
            provenance: Provenance::Measured,
        });
        site
    }

    fn evaluator() -> FeasibilityEvaluator {
        FeasibilityEvaluator::new(FeasibilityConfig::default())
    }

    #[test]
    fn all_checks_passing_is_feasible() {
        let verdict = evaluator().evaluate_profile(&passing_site(), Profile::Full);

        assert!(verdict.feasible());
        assert_eq!(verdict.checks().len(), Profile::Full.checks().len());
        assert!(verdict.defaulted_checks().is_empty());
    }

    /// Passing site with exactly one reading changed so that `check` fails.
    fn site_failing(check: CheckKind) -> SiteObservations {
        let mut site = passing_site();
        match check {
            CheckKind::Elevation => site.elevation_m = Reading::measured(3000.0),
            CheckKind::Temperature => site.coordinate = coordinate(35.0, -115.0),
            CheckKind::FloodZone => {
                site.flood = Reading::measured(FloodReading {
                    in_hazard_layer: true,
                    zone_code: Some("AE".to_string()),
                })
            }
            CheckKind::SeismicZone => site.seismic_ss = Reading::measured(1.5),
            CheckKind::RoadProximity => site.road_nearby = Reading::measured(false),
            CheckKind::PopulationDensity => {
                site.population_density = Some(Sourced {
                    value: 1000.0,
                    provenance: Provenance::Measured,
                })
            }
            CheckKind::Zoning => site.address = "12 Elm St, Suburbia".to_string(),
            CheckKind::UtilityAvailability => {
                site.utility_available = Some(Sourced {
                    value: false,
                    provenance: Provenance::Measured,
                })
            }
        }
        site
    }

    #[test]
    fn any_single_failure_makes_site_infeasible() {
        for check in Profile::Full.checks() {
            let site = site_failing(*check);
            let verdict = evaluator().evaluate_profile(&site, Profile::Full);

            assert!(!verdict.feasible(), "{check:?} failure should be infeasible");
            let failed: Vec<_> = verdict
                .checks()
                .iter()
                .filter(|result| !result.passed)
                .map(|result| result.check)
                .collect();
            assert_eq!(failed, vec![*check]);
        }
    }

    #[test]
    fn elevation_at_threshold_fails() {
        let mut site = passing_site();
        site.elevation_m = Reading::measured(2400.0);

        let verdict = evaluator().evaluate(&site);

        assert!(!verdict.elevation_ok());
        assert_eq!(verdict.elevation_m(), Some(2400.0));
        assert!(!verdict.feasible());
    }

    #[test]
    fn heat_zone_boundary_counts_as_inside() {
        let mut site = passing_site();
        site.coordinate = coordinate(33.0, -118.0);

        let verdict = evaluator().evaluate(&site);

        assert!(!verdict.temperature_range_ok());
        let result = verdict.check(CheckKind::Temperature).expect("temperature check");
        assert_eq!(result.provenance, Provenance::Derived);
        assert_eq!(result.value, CheckValue::HeatZone { inside_box: true });
    }

    #[test]
    fn seismic_threshold_is_inclusive() {
        let mut site = passing_site();
        site.seismic_ss = Reading::measured(1.0);
        assert!(!evaluator().evaluate(&site).in_high_seismic_zone());

        site.seismic_ss = Reading::measured(1.0001);
        assert!(evaluator().evaluate(&site).in_high_seismic_zone());
    }

    #[test]
    fn population_must_exceed_threshold() {
        let mut site = passing_site();
        site.population_density = Some(Sourced {
            value: 1000.0,
            provenance: Provenance::Measured,
        });
        let verdict = evaluator().evaluate_profile(&site, Profile::Full);
        assert_eq!(verdict.passed(CheckKind::PopulationDensity), Some(false));
        assert_eq!(verdict.population_density(), Some(1000.0));
    }

    #[test]
    fn unknown_readings_default_and_are_flagged() {
        let site = SiteObservations::new("9 Ridge Rd", coordinate(44.0, -100.0));

        let verdict = evaluator().evaluate(&site);

        assert_eq!(verdict.elevation_m(), Some(1000.0));
        assert!(verdict.elevation_ok());
        assert!(!verdict.in_flood_zone());
        assert!(!verdict.in_high_seismic_zone());
        assert!(verdict.feasible());
        assert_eq!(
            verdict.defaulted_checks(),
            vec![
                CheckKind::Elevation,
                CheckKind::FloodZone,
                CheckKind::SeismicZone
            ]
        );
        let elevation = verdict.check(CheckKind::Elevation).expect("elevation");
        assert!(elevation.notes.contains("defaulted"));
    }

    #[test]
    fn unknown_road_reading_fails_full_profile() {
        let mut site = passing_site();
        site.road_nearby = Reading::unknown("overpass timed out");

        let verdict = evaluator().evaluate_profile(&site, Profile::Full);

        assert_eq!(verdict.near_road(), Some(false));
        assert!(!verdict.feasible());
        assert_eq!(verdict.defaulted_checks(), vec![CheckKind::RoadProximity]);
    }

    #[test]
    fn minimal_profile_ignores_full_only_checks() {
        let mut site = passing_site();
        site.road_nearby = Reading::measured(false);
        site.address = "12 Elm St, Suburbia".to_string();

        let verdict = evaluator().evaluate_profile(&site, Profile::Minimal);

        assert!(verdict.feasible());
        assert_eq!(verdict.near_road(), None);
        assert_eq!(verdict.zoning_compatible(), None);
    }

    #[test]
    fn zoning_follows_address_keywords() {
        let mut site = passing_site();
        site.address = "123 Main St, Commercial Park".to_string();
        let verdict = evaluator().evaluate_profile(&site, Profile::Full);
        assert_eq!(verdict.zoning_compatible(), Some(true));

        site.address = "123 Main St, Suburbia".to_string();
        let verdict = evaluator().evaluate_profile(&site, Profile::Full);
        assert_eq!(verdict.zoning_compatible(), Some(false));
    }

    #[test]
    fn climate_strategy_checks_operating_band() {
        let config = FeasibilityConfig {
            temperature: TemperatureStrategy::climate_range(),
            ..FeasibilityConfig::default()
        };
        let evaluator = FeasibilityEvaluator::new(config);
        let mut site = passing_site();
        site.coordinate = coordinate(35.0, -115.0);

        site.climate = Reading::measured(TemperatureRange {
            min_c: -5.0,
            max_c: 49.0,
        });
        assert!(evaluator.evaluate(&site).temperature_range_ok());

        site.climate = Reading::measured(TemperatureRange {
            min_c: -5.0,
            max_c: 51.5,
        });
        assert!(!evaluator.evaluate(&site).temperature_range_ok());

        site.climate = Reading::unknown("archive unavailable");
        let verdict = evaluator.evaluate(&site);
        assert!(verdict.temperature_range_ok());
        assert_eq!(verdict.defaulted_checks(), vec![CheckKind::Temperature]);
    }

    #[test]
    fn unknown_climate_fails_when_policy_assumes_fail() {
        let config = FeasibilityConfig {
            temperature: TemperatureStrategy::ClimateRange {
                band: TemperatureRange {
                    min_c: -20.0,
                    max_c: 50.0,
                },
                reference_year: 2023,
                unknown: ClimateUnknownPolicy::AssumeFail,
            },
            ..FeasibilityConfig::default()
        };
        let evaluator = FeasibilityEvaluator::new(config);
        let mut site = passing_site();
        site.climate = Reading::unknown("archive unavailable");

        let verdict = evaluator.evaluate(&site);

        assert!(!verdict.temperature_range_ok());
        assert!(!verdict.feasible());
        let check = verdict.check(CheckKind::Temperature).expect("temperature check");
        assert_eq!(check.provenance, Provenance::Defaulted);
        assert!(check.notes.contains("archive unavailable"));
    }

    #[test]
    fn identical_inputs_serialize_identically() {
        let site = passing_site();
        let first = serde_json::to_string(&evaluator().evaluate_profile(&site, Profile::Full))
            .expect("serializes");
        let second = serde_json::to_string(&evaluator().evaluate_profile(&site, Profile::Full))
            .expect("serializes");
        assert_eq!(first, second);
    }
}
