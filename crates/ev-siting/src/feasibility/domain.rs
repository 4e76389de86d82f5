use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Geographic point in decimal degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::Latitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::Longitude(longitude));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
}

/// Value supplied by a collaborator, or an explicit marker that it could not supply one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Reading<T> {
    Measured { value: T },
    Unknown { reason: String },
}

impl<T> Reading<T> {
    pub fn measured(value: T) -> Self {
        Reading::Measured { value }
    }

    pub fn unknown(reason: impl Into<String>) -> Self {
        Reading::Unknown {
            reason: reason.into(),
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Reading::Measured { value } => Some(value),
            Reading::Unknown { .. } => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Reading::Unknown { .. })
    }

    pub fn from_result<E: fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Reading::measured(value),
            Err(err) => Reading::unknown(err.to_string()),
        }
    }
}

impl<T> Default for Reading<T> {
    fn default() -> Self {
        Reading::unknown("not queried")
    }
}

/// Value produced without a network call, tagged with where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sourced<T> {
    pub value: T,
    pub provenance: Provenance,
}

/// Flood-hazard layer lookup for a single point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloodReading {
    pub in_hazard_layer: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_code: Option<String>,
}

/// Annual air temperature extremes in degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRange {
    pub min_c: f64,
    pub max_c: f64,
}

/// ASCE 7 risk category passed to the seismic design-map lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskCategory {
    I,
    II,
    III,
    IV,
}

impl RiskCategory {
    pub fn as_param(&self) -> &'static str {
        match self {
            RiskCategory::I => "I",
            RiskCategory::II => "II",
            RiskCategory::III => "III",
            RiskCategory::IV => "IV",
        }
    }
}

impl FromStr for RiskCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "I" => Ok(RiskCategory::I),
            "II" => Ok(RiskCategory::II),
            "III" => Ok(RiskCategory::III),
            "IV" => Ok(RiskCategory::IV),
            other => Err(format!("unknown risk category '{other}'")),
        }
    }
}

/// Soil site class passed to the seismic design-map lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiteClass {
    A,
    B,
    C,
    D,
    E,
}

impl SiteClass {
    pub fn as_param(&self) -> &'static str {
        match self {
            SiteClass::A => "A",
            SiteClass::B => "B",
            SiteClass::C => "C",
            SiteClass::D => "D",
            SiteClass::E => "E",
        }
    }
}

impl FromStr for SiteClass {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(SiteClass::A),
            "B" => Ok(SiteClass::B),
            "C" => Ok(SiteClass::C),
            "D" => Ok(SiteClass::D),
            "E" => Ok(SiteClass::E),
            other => Err(format!("unknown site class '{other}'")),
        }
    }
}

/// Named subset of checks included in an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    #[default]
    Minimal,
    Full,
}

impl Profile {
    pub fn checks(&self) -> &'static [CheckKind] {
        const MINIMAL: &[CheckKind] = &[
            CheckKind::Elevation,
            CheckKind::Temperature,
            CheckKind::FloodZone,
            CheckKind::SeismicZone,
        ];
        const FULL: &[CheckKind] = &[
            CheckKind::Elevation,
            CheckKind::Temperature,
            CheckKind::FloodZone,
            CheckKind::SeismicZone,
            CheckKind::RoadProximity,
            CheckKind::PopulationDensity,
            CheckKind::Zoning,
            CheckKind::UtilityAvailability,
        ];

        match self {
            Profile::Minimal => MINIMAL,
            Profile::Full => FULL,
        }
    }

    pub fn includes(&self, check: CheckKind) -> bool {
        self.checks().contains(&check)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Profile::Minimal => "minimal",
            Profile::Full => "full",
        }
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "minimal" => Ok(Profile::Minimal),
            "full" => Ok(Profile::Full),
            other => Err(format!("unknown profile '{other}' (expected minimal or full)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    Elevation,
    Temperature,
    FloodZone,
    SeismicZone,
    RoadProximity,
    PopulationDensity,
    Zoning,
    UtilityAvailability,
}

impl CheckKind {
    pub fn label(&self) -> &'static str {
        match self {
            CheckKind::Elevation => "Elevation",
            CheckKind::Temperature => "Temperature range",
            CheckKind::FloodZone => "Flood zone",
            CheckKind::SeismicZone => "Seismic zone",
            CheckKind::RoadProximity => "Road proximity",
            CheckKind::PopulationDensity => "Population density",
            CheckKind::Zoning => "Zoning",
            CheckKind::UtilityAvailability => "Utility availability",
        }
    }
}

/// Where the value behind a check came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Returned by a collaborator.
    Measured,
    /// Collaborator could not answer; the default table supplied the value.
    Defaulted,
    /// Placeholder estimator or constant stub.
    Stubbed,
    /// Computed locally from the coordinate or the address text.
    Derived,
}

/// Value that drove a check, in the check's natural unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckValue {
    Elevation {
        meters: f64,
    },
    HeatZone {
        inside_box: bool,
    },
    Climate {
        #[serde(skip_serializing_if = "Option::is_none")]
        range: Option<TemperatureRange>,
    },
    Flood {
        in_hazard_layer: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        zone_code: Option<String>,
    },
    Seismic {
        #[serde(skip_serializing_if = "Option::is_none")]
        ss: Option<f64>,
    },
    Road {
        within_radius: bool,
        radius_km: f64,
    },
    Population {
        density: f64,
    },
    Zoning {
        compatible: bool,
    },
    Utility {
        available: bool,
    },
}

/// Outcome of a single check, kept for audit alongside the overall verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub check: CheckKind,
    pub passed: bool,
    pub provenance: Provenance,
    pub value: CheckValue,
    pub notes: String,
}

/// Facts about a resolved site handed to the evaluator.
///
/// Fields left at their defaults are treated as unavailable and pass through the
/// default table like any other unknown reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteObservations {
    pub address: String,
    pub coordinate: Coordinate,
    pub elevation_m: Reading<f64>,
    pub climate: Reading<TemperatureRange>,
    pub flood: Reading<FloodReading>,
    pub seismic_ss: Reading<f64>,
    pub road_nearby: Reading<bool>,
    pub population_density: Option<Sourced<f64>>,
    pub zoning_compatible: Option<Sourced<bool>>,
    pub utility_available: Option<Sourced<bool>>,
}

impl SiteObservations {
    pub fn new(address: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            address: address.into(),
            coordinate,
            elevation_m: Reading::default(),
            climate: Reading::default(),
            flood: Reading::default(),
            seismic_ss: Reading::default(),
            road_nearby: Reading::default(),
            population_density: None,
            zoning_compatible: None,
            utility_available: None,
        }
    }
}

/// Immutable result of evaluating one resolved address.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeasibilityVerdict {
    address: String,
    profile: Profile,
    coordinate: Coordinate,
    checks: Vec<CheckResult>,
    feasible: bool,
}

impl FeasibilityVerdict {
    pub(crate) fn new(
        address: String,
        profile: Profile,
        coordinate: Coordinate,
        checks: Vec<CheckResult>,
    ) -> Self {
        let feasible = checks.iter().all(|check| check.passed);
        Self {
            address,
            profile,
            coordinate,
            checks,
            feasible,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn checks(&self) -> &[CheckResult] {
        &self.checks
    }

    pub fn feasible(&self) -> bool {
        self.feasible
    }

    pub fn check(&self, kind: CheckKind) -> Option<&CheckResult> {
        self.checks.iter().find(|check| check.check == kind)
    }

    pub fn passed(&self, kind: CheckKind) -> Option<bool> {
        self.check(kind).map(|check| check.passed)
    }

    /// Checks whose value came from the default table rather than a collaborator.
    pub fn defaulted_checks(&self) -> Vec<CheckKind> {
        self.checks
            .iter()
            .filter(|check| check.provenance == Provenance::Defaulted)
            .map(|check| check.check)
            .collect()
    }

    pub fn elevation_m(&self) -> Option<f64> {
        match self.check(CheckKind::Elevation).map(|check| &check.value) {
            Some(CheckValue::Elevation { meters }) => Some(*meters),
            _ => None,
        }
    }

    pub fn elevation_ok(&self) -> bool {
        self.passed(CheckKind::Elevation).unwrap_or(false)
    }

    pub fn temperature_range_ok(&self) -> bool {
        self.passed(CheckKind::Temperature).unwrap_or(false)
    }

    pub fn in_flood_zone(&self) -> bool {
        match self.check(CheckKind::FloodZone).map(|check| &check.value) {
            Some(CheckValue::Flood {
                in_hazard_layer, ..
            }) => *in_hazard_layer,
            _ => false,
        }
    }

    pub fn in_high_seismic_zone(&self) -> bool {
        !self.passed(CheckKind::SeismicZone).unwrap_or(true)
    }

    pub fn near_road(&self) -> Option<bool> {
        self.passed(CheckKind::RoadProximity)
    }

    pub fn population_density(&self) -> Option<f64> {
        match self.check(CheckKind::PopulationDensity).map(|check| &check.value) {
            Some(CheckValue::Population { density }) => Some(*density),
            _ => None,
        }
    }

    pub fn zoning_compatible(&self) -> Option<bool> {
        self.passed(CheckKind::Zoning)
    }

    pub fn utility_available(&self) -> Option<bool> {
        self.passed(CheckKind::UtilityAvailability)
    }
}

/// Why an address never reached the evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "detail", rename_all = "snake_case")]
pub enum UnresolvedReason {
    EmptyAddress,
    NotFound,
    GeocoderUnavailable(String),
}

impl UnresolvedReason {
    pub fn summary(&self) -> String {
        match self {
            UnresolvedReason::EmptyAddress => "address is empty".to_string(),
            UnresolvedReason::NotFound => "address could not be resolved".to_string(),
            UnresolvedReason::GeocoderUnavailable(detail) => {
                format!("geocoder unavailable: {detail}")
            }
        }
    }
}

/// Either a computed verdict or an explicit "could not evaluate".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EvaluationOutcome {
    Evaluated(FeasibilityVerdict),
    Unresolved {
        address: String,
        reason: UnresolvedReason,
    },
}

impl EvaluationOutcome {
    pub fn verdict(&self) -> Option<&FeasibilityVerdict> {
        match self {
            EvaluationOutcome::Evaluated(verdict) => Some(verdict),
            EvaluationOutcome::Unresolved { .. } => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, EvaluationOutcome::Evaluated(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_rejects_out_of_range_values() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert_eq!(
            Coordinate::new(90.5, 0.0),
            Err(CoordinateError::Latitude(90.5))
        );
        assert_eq!(
            Coordinate::new(0.0, -180.01),
            Err(CoordinateError::Longitude(-180.01))
        );
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn full_profile_extends_minimal() {
        for check in Profile::Minimal.checks() {
            assert!(Profile::Full.includes(*check));
        }
        assert!(!Profile::Minimal.includes(CheckKind::Zoning));
        assert_eq!(Profile::Full.checks().len(), 8);
    }

    #[test]
    fn profile_parses_case_insensitively() {
        assert_eq!("FULL".parse::<Profile>(), Ok(Profile::Full));
        assert_eq!(" minimal ".parse::<Profile>(), Ok(Profile::Minimal));
        assert!("partial".parse::<Profile>().is_err());
    }

    #[test]
    fn reading_from_result_keeps_error_text() {
        let reading: Reading<f64> = Reading::from_result(Err::<f64, _>("timed out"));
        assert_eq!(reading, Reading::unknown("timed out"));
        assert!(reading.is_unknown());
        assert_eq!(Reading::measured(4.0).value(), Some(&4.0));
    }
}
