use super::{PopulationDensitySource, UtilityAvailabilitySource, ZoningClassifier};
use crate::feasibility::rules::matches_zoning_keyword;
use crate::feasibility::{Coordinate, PopulationStub};

/// Placeholder density estimate backed by [`PopulationStub`].
#[derive(Debug, Clone, Copy)]
pub struct StubPopulationDensity {
    stub: PopulationStub,
}

impl StubPopulationDensity {
    pub fn new(stub: PopulationStub) -> Self {
        Self { stub }
    }
}

impl PopulationDensitySource for StubPopulationDensity {
    fn estimate(&self, point: &Coordinate) -> f64 {
        self.stub.estimate(point)
    }
}

/// Treats an address as compatible when it mentions one of the keywords.
#[derive(Debug, Clone)]
pub struct KeywordZoningClassifier {
    keywords: Vec<String>,
}

impl KeywordZoningClassifier {
    pub fn new(keywords: Vec<String>) -> Self {
        Self { keywords }
    }
}

impl ZoningClassifier for KeywordZoningClassifier {
    fn is_compatible(&self, address: &str) -> bool {
        matches_zoning_keyword(address, &self.keywords)
    }
}

/// Utility availability is not looked up; every site is reported as served.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubUtilityAvailability;

impl UtilityAvailabilitySource for StubUtilityAvailability {
    fn available(&self, _point: &Coordinate) -> bool {
        true
    }
}
