use super::config::{ClimateUnknownPolicy, FeasibilityConfig, TemperatureStrategy};
use super::domain::{
    CheckKind, CheckResult, CheckValue, FloodReading, Provenance, SiteObservations,
};
use super::policy::{self, Resolved};

pub(crate) fn matches_zoning_keyword(address: &str, keywords: &[String]) -> bool {
    let haystack = address.to_lowercase();
    keywords
        .iter()
        .map(|keyword| keyword.trim().to_lowercase())
        .any(|keyword| !keyword.is_empty() && haystack.contains(&keyword))
}

pub(crate) fn run_check(
    check: CheckKind,
    observations: &SiteObservations,
    config: &FeasibilityConfig,
) -> CheckResult {
    match check {
        CheckKind::Elevation => elevation(policy::elevation(observations, config), config),
        CheckKind::Temperature => temperature(observations, config),
        CheckKind::FloodZone => flood(policy::flood(observations, config)),
        CheckKind::SeismicZone => seismic(policy::seismic(observations), config),
        CheckKind::RoadProximity => road(policy::road(observations), config),
        CheckKind::PopulationDensity => {
            population(policy::population(observations, config), config)
        }
        CheckKind::Zoning => zoning(policy::zoning(observations, config)),
        CheckKind::UtilityAvailability => utility(policy::utility(observations)),
    }
}

fn finish<T>(
    check: CheckKind,
    passed: bool,
    resolved: &Resolved<T>,
    value: CheckValue,
    notes: String,
) -> CheckResult {
    let notes = match &resolved.default_reason {
        Some(reason) => format!("{notes} (defaulted: {reason})"),
        None => notes,
    };

    CheckResult {
        check,
        passed,
        provenance: resolved.provenance,
        value,
        notes,
    }
}

fn elevation(resolved: Resolved<f64>, config: &FeasibilityConfig) -> CheckResult {
    let meters = resolved.value;
    let passed = meters < config.max_elevation_m;
    let notes = if passed {
        format!(
            "elevation {meters:.1} m below limit {:.1} m",
            config.max_elevation_m
        )
    } else {
        format!(
            "elevation {meters:.1} m at or above limit {:.1} m",
            config.max_elevation_m
        )
    };

    finish(
        CheckKind::Elevation,
        passed,
        &resolved,
        CheckValue::Elevation { meters },
        notes,
    )
}

fn temperature(observations: &SiteObservations, config: &FeasibilityConfig) -> CheckResult {
    match &config.temperature {
        TemperatureStrategy::HeatZoneBox { zone } => {
            let inside_box = zone.contains(&observations.coordinate);
            let notes = if inside_box {
                "site inside designated high-heat zone".to_string()
            } else {
                "site outside designated high-heat zone".to_string()
            };
            CheckResult {
                check: CheckKind::Temperature,
                passed: !inside_box,
                provenance: Provenance::Derived,
                value: CheckValue::HeatZone { inside_box },
                notes,
            }
        }
        TemperatureStrategy::ClimateRange { band, unknown, .. } => {
            let resolved = policy::climate(observations);
            let (passed, notes) = match resolved.value {
                Some(range) => {
                    let within = range.min_c >= band.min_c && range.max_c <= band.max_c;
                    let notes = format!(
                        "annual range {:.1}..{:.1} C {} operating band {:.1}..{:.1} C",
                        range.min_c,
                        range.max_c,
                        if within { "within" } else { "outside" },
                        band.min_c,
                        band.max_c
                    );
                    (within, notes)
                }
                None => (
                    matches!(unknown, ClimateUnknownPolicy::AssumePass),
                    "annual temperature range unavailable".to_string(),
                ),
            };

            finish(
                CheckKind::Temperature,
                passed,
                &resolved,
                CheckValue::Climate {
                    range: resolved.value,
                },
                notes,
            )
        }
    }
}

fn flood(resolved: Resolved<FloodReading>) -> CheckResult {
    let FloodReading {
        in_hazard_layer,
        zone_code,
    } = resolved.value.clone();
    let notes = match (&zone_code, in_hazard_layer) {
        (Some(code), true) => format!("intersects flood hazard layer (zone {code})"),
        (None, true) => "intersects flood hazard layer".to_string(),
        (_, false) => "outside mapped flood hazard areas".to_string(),
    };

    finish(
        CheckKind::FloodZone,
        !in_hazard_layer,
        &resolved,
        CheckValue::Flood {
            in_hazard_layer,
            zone_code,
        },
        notes,
    )
}

fn seismic(resolved: Resolved<Option<f64>>, config: &FeasibilityConfig) -> CheckResult {
    let threshold = config.seismic_ss_threshold;
    let (passed, notes) = match resolved.value {
        Some(ss) if ss <= threshold => (
            true,
            format!("Ss {ss:.3} within threshold {threshold:.3}"),
        ),
        Some(ss) => (false, format!("Ss {ss:.3} exceeds threshold {threshold:.3}")),
        None => (true, "Ss unavailable, not flagged as high risk".to_string()),
    };

    finish(
        CheckKind::SeismicZone,
        passed,
        &resolved,
        CheckValue::Seismic { ss: resolved.value },
        notes,
    )
}

fn road(resolved: Resolved<bool>, config: &FeasibilityConfig) -> CheckResult {
    let within_radius = resolved.value;
    let notes = if within_radius {
        format!("roadway within {:.2} km", config.road_radius_km)
    } else {
        format!("no roadway found within {:.2} km", config.road_radius_km)
    };

    finish(
        CheckKind::RoadProximity,
        within_radius,
        &resolved,
        CheckValue::Road {
            within_radius,
            radius_km: config.road_radius_km,
        },
        notes,
    )
}

fn population(resolved: Resolved<f64>, config: &FeasibilityConfig) -> CheckResult {
    let density = resolved.value;
    let threshold = config.population_density_threshold;
    let passed = density > threshold;
    let notes = format!(
        "estimated density {density:.0} {} threshold {threshold:.0}",
        if passed { "above" } else { "not above" }
    );

    finish(
        CheckKind::PopulationDensity,
        passed,
        &resolved,
        CheckValue::Population { density },
        notes,
    )
}

fn zoning(resolved: Resolved<bool>) -> CheckResult {
    let compatible = resolved.value;
    let notes = if compatible {
        "address matches a compatible zoning keyword".to_string()
    } else {
        "address matches no compatible zoning keyword".to_string()
    };

    finish(
        CheckKind::Zoning,
        compatible,
        &resolved,
        CheckValue::Zoning { compatible },
        notes,
    )
}

fn utility(resolved: Resolved<bool>) -> CheckResult {
    let available = resolved.value;
    let notes = if available {
        "utility service assumed available".to_string()
    } else {
        "utility service unavailable".to_string()
    };

    finish(
        CheckKind::UtilityAvailability,
        available,
        &resolved,
        CheckValue::Utility { available },
        notes,
    )
}
