pub mod config;
pub mod error;
pub mod feasibility;
pub mod sources;
pub mod telemetry;
