use super::domain::{CheckKind, EvaluationOutcome, Profile};
use super::service::SiteFeasibilityService;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use tracing::info;

#[derive(Debug)]
pub enum BatchError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for BatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchError::Io(err) => write!(f, "failed to access batch file: {}", err),
            BatchError::Csv(err) => write!(f, "invalid address CSV data: {}", err),
        }
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchError::Io(err) => Some(err),
            BatchError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for BatchError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for BatchError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Counts reported after a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub evaluated: usize,
    pub feasible: usize,
    pub unresolved: usize,
}

/// Evaluates every `address` row of a CSV and writes one report row per address.
///
/// Addresses are processed one after another; public geocoders throttle bursts.
pub struct BatchRunner<'a> {
    service: &'a SiteFeasibilityService,
    profile: Profile,
}

impl<'a> BatchRunner<'a> {
    pub fn new(service: &'a SiteFeasibilityService, profile: Profile) -> Self {
        Self { service, profile }
    }

    pub async fn run<R: Read, W: Write>(
        &self,
        reader: R,
        writer: W,
    ) -> Result<BatchSummary, BatchError> {
        let addresses = parse_addresses(reader)?;
        let mut csv_writer = csv::Writer::from_writer(writer);
        let mut summary = BatchSummary::default();

        for address in addresses {
            let outcome = self.service.evaluate_profile(&address, self.profile).await;
            match outcome.verdict() {
                Some(verdict) => {
                    summary.evaluated += 1;
                    if verdict.feasible() {
                        summary.feasible += 1;
                    }
                }
                None => summary.unresolved += 1,
            }
            csv_writer.serialize(ReportRow::from_outcome(&address, &outcome))?;
        }

        csv_writer.flush()?;
        info!(
            evaluated = summary.evaluated,
            feasible = summary.feasible,
            unresolved = summary.unresolved,
            "batch complete"
        );
        Ok(summary)
    }
}

fn parse_addresses<R: Read>(reader: R) -> Result<Vec<String>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut addresses = Vec::new();
    for record in csv_reader.deserialize::<AddressRow>() {
        addresses.push(record?.address);
    }
    Ok(addresses)
}

#[derive(Debug, Deserialize)]
struct AddressRow {
    #[serde(alias = "Address")]
    address: String,
}

#[derive(Debug, Serialize)]
struct ReportRow {
    address: String,
    status: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    elevation_m: Option<f64>,
    elevation_ok: Option<bool>,
    temperature_range_ok: Option<bool>,
    in_flood_zone: Option<bool>,
    in_high_seismic_zone: Option<bool>,
    near_road: Option<bool>,
    population_density: Option<f64>,
    zoning_compatible: Option<bool>,
    utility_available: Option<bool>,
    defaulted_checks: String,
    feasible: Option<bool>,
}

impl ReportRow {
    fn from_outcome(address: &str, outcome: &EvaluationOutcome) -> Self {
        match outcome {
            EvaluationOutcome::Evaluated(verdict) => Self {
                address: address.to_string(),
                status: "evaluated".to_string(),
                latitude: Some(verdict.coordinate().latitude()),
                longitude: Some(verdict.coordinate().longitude()),
                elevation_m: verdict.elevation_m(),
                elevation_ok: Some(verdict.elevation_ok()),
                temperature_range_ok: Some(verdict.temperature_range_ok()),
                in_flood_zone: Some(verdict.in_flood_zone()),
                in_high_seismic_zone: Some(verdict.in_high_seismic_zone()),
                near_road: verdict.near_road(),
                population_density: verdict.population_density(),
                zoning_compatible: verdict.zoning_compatible(),
                utility_available: verdict.utility_available(),
                defaulted_checks: join_checks(&verdict.defaulted_checks()),
                feasible: Some(verdict.feasible()),
            },
            EvaluationOutcome::Unresolved { reason, .. } => Self {
                address: address.to_string(),
                status: reason.summary(),
                latitude: None,
                longitude: None,
                elevation_m: None,
                elevation_ok: None,
                temperature_range_ok: None,
                in_flood_zone: None,
                in_high_seismic_zone: None,
                near_road: None,
                population_density: None,
                zoning_compatible: None,
                utility_available: None,
                defaulted_checks: String::new(),
                feasible: None,
            },
        }
    }
}

fn join_checks(checks: &[CheckKind]) -> String {
    checks
        .iter()
        .map(|check| check.label())
        .collect::<Vec<_>>()
        .join("; ")
}
