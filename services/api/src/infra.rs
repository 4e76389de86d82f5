use ev_siting::config::AppConfig;
use ev_siting::error::AppError;
use ev_siting::feasibility::{Profile, SiteFeasibilityService};
use ev_siting::sources::SiteSources;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wire the public data sources into a service using the loaded configuration.
pub(crate) fn build_service(config: &AppConfig) -> Result<SiteFeasibilityService, AppError> {
    let sources = SiteSources::public(&config.sources, &config.feasibility)?;
    Ok(SiteFeasibilityService::new(
        sources,
        config.feasibility.clone(),
    ))
}

pub(crate) fn parse_profile(raw: &str) -> Result<Profile, String> {
    raw.parse::<Profile>()
}
